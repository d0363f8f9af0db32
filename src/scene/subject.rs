//! Subjects: boxes in the scene that instructions frame.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{CameraError, Result};
use crate::geometry;
use crate::io::wire;

/// Classification tag of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubjectClass {
    /// A chair.
    Chair,
    /// A table.
    Table,
    /// A laptop.
    Laptop,
    /// A book.
    Book,
    /// A tree.
    Tree,
    /// Anything else.
    #[default]
    Other,
}

impl SubjectClass {
    /// Every class.
    pub const ALL: [SubjectClass; 6] = [
        SubjectClass::Chair,
        SubjectClass::Table,
        SubjectClass::Laptop,
        SubjectClass::Book,
        SubjectClass::Tree,
        SubjectClass::Other,
    ];

    /// Typical extents (width, height, depth) of an object of this class.
    pub fn nominal_size(self) -> Vector3<f64> {
        match self {
            SubjectClass::Chair => Vector3::new(0.5, 1.0, 0.5),
            SubjectClass::Table => Vector3::new(1.5, 1.0, 0.75),
            SubjectClass::Laptop => Vector3::new(0.35, 0.25, 0.25),
            SubjectClass::Book => Vector3::new(0.2, 0.15, 0.03),
            SubjectClass::Tree => Vector3::new(1.0, 2.0, 1.0),
            SubjectClass::Other => Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// One sample of a moving subject's track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubjectFrame {
    /// Base position at this frame.
    #[serde(with = "wire::point")]
    pub position: Point3<f64>,
}

/// An object in the scene.
///
/// `position` is the centre of the subject's base, `size` is
/// (width, height, depth) in the subject's own frame and `rotation` turns
/// that frame into the world. Subjects face their local +Z axis.
///
/// A subject with a non-empty `frames` track is animated: frame `i` of an
/// instruction sees the subject at `frames[i]`, and frames past the end of
/// the track hold its last entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Base position.
    #[serde(with = "wire::point")]
    pub position: Point3<f64>,
    /// Width, height and depth.
    #[serde(with = "wire::vector")]
    pub size: Vector3<f64>,
    /// Orientation of the subject.
    #[serde(with = "wire::rotation", default = "wire::identity_rotation")]
    pub rotation: UnitQuaternion<f64>,
    /// Classification tag.
    #[serde(default, rename = "objectClass")]
    pub class: SubjectClass,
    /// Per-frame track of an animated subject.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<SubjectFrame>,
}

impl Subject {
    /// Create an axis-aligned subject.
    ///
    /// Fails if any size component is not finite and strictly positive.
    pub fn new(position: Point3<f64>, size: Vector3<f64>) -> Result<Self> {
        let subject = Subject {
            position,
            size,
            rotation: UnitQuaternion::identity(),
            class: SubjectClass::Other,
            frames: Vec::new(),
        };
        subject.validate(0)?;
        Ok(subject)
    }

    /// Create a subject with the nominal size of `class`.
    pub fn of_class(class: SubjectClass, position: Point3<f64>) -> Self {
        Subject {
            position,
            size: class.nominal_size(),
            rotation: UnitQuaternion::identity(),
            class,
            frames: Vec::new(),
        }
    }

    /// Set the orientation.
    pub fn with_rotation(mut self, rotation: UnitQuaternion<f64>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the classification tag.
    pub fn with_class(mut self, class: SubjectClass) -> Self {
        self.class = class;
        self
    }

    /// Animate the subject along `positions`, one per frame.
    pub fn with_frames<I>(mut self, positions: I) -> Self
    where
        I: IntoIterator<Item = Point3<f64>>,
    {
        self.frames = positions.into_iter().map(|position| SubjectFrame { position }).collect();
        self
    }

    /// Whether the subject moves during a shot.
    #[inline]
    pub fn is_animated(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Base position at `frame` of an instruction.
    pub fn position_at(&self, frame: usize) -> Point3<f64> {
        match self.frames.get(frame).or(self.frames.last()) {
            Some(sample) => sample.position,
            None => self.position,
        }
    }

    /// Visual centre at `frame` of an instruction.
    pub fn center_at(&self, frame: usize) -> Point3<f64> {
        self.center() + (self.position_at(frame) - self.position)
    }

    /// The subject as it stands at `frame`, without a track.
    pub fn at_frame(&self, frame: usize) -> Subject {
        Subject {
            position: self.position_at(frame),
            size: self.size,
            rotation: self.rotation,
            class: self.class,
            frames: Vec::new(),
        }
    }

    /// The three unit cubes used when no scene is supplied.
    pub fn default_set() -> Vec<Subject> {
        [0.0, 3.0, -3.0]
            .iter()
            .map(|&x| Subject::of_class(SubjectClass::Other, Point3::new(x, 0.0, 0.0)))
            .collect()
    }

    /// Check the subject's invariants, reporting failures against `index`.
    pub fn validate(&self, index: usize) -> Result<()> {
        let finite = self.position.iter().all(|c| c.is_finite())
            && self.rotation.coords.iter().all(|c| c.is_finite());
        if !finite {
            return Err(CameraError::non_finite(format!("subject {index} transform")));
        }
        if let Some(frame) = self
            .frames
            .iter()
            .position(|f| !f.position.iter().all(|c| c.is_finite()))
        {
            return Err(CameraError::non_finite(format!("subject {index} track frame {frame}")));
        }
        if !self.size.iter().all(|c| c.is_finite()) {
            return Err(CameraError::InvalidSubject {
                index,
                reason: "size is not finite",
            });
        }
        if self.size.iter().any(|&c| c <= 0.0) {
            return Err(CameraError::InvalidSubject {
                index,
                reason: "size must be positive",
            });
        }
        Ok(())
    }

    /// Visual centre (base raised by half the height).
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        geometry::subject_center(self)
    }

    /// Height of the subject.
    #[inline]
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Width of the subject.
    #[inline]
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Depth of the subject.
    #[inline]
    pub fn depth(&self) -> f64 {
        self.size.z
    }

    /// Largest dimension.
    #[inline]
    pub fn extent(&self) -> f64 {
        self.size.max()
    }

    /// The direction the subject faces (local +Z in world space).
    #[inline]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// The subject's right-hand side in world space.
    #[inline]
    pub fn right(&self) -> Vector3<f64> {
        self.rotation * -Vector3::x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_new_validates_size() {
        assert!(Subject::new(Point3::origin(), Vector3::new(1.0, 2.0, 1.0)).is_ok());

        let zero = Subject::new(Point3::origin(), Vector3::new(1.0, 0.0, 1.0));
        assert!(matches!(zero, Err(CameraError::InvalidSubject { .. })));

        let nan = Subject::new(Point3::origin(), Vector3::new(f64::NAN, 1.0, 1.0));
        assert!(matches!(nan, Err(CameraError::InvalidSubject { .. })));
    }

    #[test]
    fn test_center_follows_rotation() {
        let s = Subject::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 2.0, 1.0)).unwrap();
        assert_eq!(s.center(), Point3::new(1.0, 1.0, 0.0));

        // Lying on its side: the "up" half-height now points along -X.
        let tipped = s.with_rotation(UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2));
        assert!((tipped.center() - Point3::new(0.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_forward_and_right() {
        let s = Subject::of_class(SubjectClass::Chair, Point3::origin());
        assert_eq!(s.forward(), Vector3::z());
        assert_eq!(s.right(), -Vector3::x());
        assert_eq!(s.extent(), 1.0);
    }

    #[test]
    fn test_track_holds_last_frame() {
        let s = Subject::of_class(SubjectClass::Other, Point3::origin())
            .with_frames((0..3).map(|i| Point3::new(i as f64, 0.0, 0.0)));
        assert!(s.is_animated());
        assert_eq!(s.position_at(1), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(s.position_at(10), Point3::new(2.0, 0.0, 0.0));
        assert_eq!(s.center_at(2), Point3::new(2.0, 0.5, 0.0));

        let posed = s.at_frame(1);
        assert!(!posed.is_animated());
        assert_eq!(posed.center(), s.center_at(1));

        let still = Subject::of_class(SubjectClass::Other, Point3::new(4.0, 0.0, 0.0));
        assert_eq!(still.position_at(7), still.position);
    }

    #[test]
    fn test_track_must_be_finite() {
        let s = Subject::of_class(SubjectClass::Other, Point3::origin())
            .with_frames([Point3::origin(), Point3::new(f64::NAN, 0.0, 0.0)]);
        assert!(matches!(s.validate(2), Err(CameraError::NonFinite { .. })));
    }

    #[test]
    fn test_default_set() {
        let set = Subject::default_set();
        assert_eq!(set.len(), 3);
        assert_eq!(set[1].position, Point3::new(3.0, 0.0, 0.0));
        for (i, s) in set.iter().enumerate() {
            assert!(s.validate(i).is_ok());
        }
    }

    #[test]
    fn test_nominal_sizes_are_valid() {
        for class in SubjectClass::ALL {
            let s = Subject::of_class(class, Point3::origin());
            assert!(s.validate(0).is_ok(), "{class:?}");
        }
    }

    #[test]
    fn test_serde_shape() {
        let s = Subject::of_class(SubjectClass::Table, Point3::new(1.0, 0.0, -2.0));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["position"]["z"], -2.0);
        assert_eq!(json["size"]["x"], 1.5);
        assert_eq!(json["objectClass"], "table");

        let back: Subject = serde_json::from_value(json).unwrap();
        assert_eq!(back.position, s.position);
        assert_eq!(back.class, SubjectClass::Table);
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{"position":{"x":0,"y":0,"z":0},"size":{"x":1,"y":1,"z":1}}"#;
        let s: Subject = serde_json::from_str(json).unwrap();
        assert_eq!(s.rotation, UnitQuaternion::identity());
        assert_eq!(s.class, SubjectClass::Other);
    }
}
