//! Camera pose.

use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::geometry::{self, SENSOR_HEIGHT_MM};
use crate::io::wire::FrameRecord;

/// Default focal length in millimetres.
pub const DEFAULT_FOCAL_LENGTH: f64 = 50.0;

/// Default aspect ratio (16:9).
pub const DEFAULT_ASPECT_RATIO: f64 = 16.0 / 9.0;

/// The camera state for one frame.
///
/// Orientation is always a unit quaternion; Euler angles and look-at points
/// only appear at the interchange boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "FrameRecord", into = "FrameRecord")]
pub struct CameraPose {
    /// Camera position in world space.
    pub position: Point3<f64>,
    /// Camera orientation (local -Z is forward).
    pub orientation: UnitQuaternion<f64>,
    /// Focal length in millimetres.
    pub focal_length: f64,
    /// Width over height, if known.
    pub aspect_ratio: Option<f64>,
}

impl Default for CameraPose {
    /// Ten units back on +Z, looking at the origin through a 50mm lens.
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 10.0),
            orientation: UnitQuaternion::identity(),
            focal_length: DEFAULT_FOCAL_LENGTH,
            aspect_ratio: Some(DEFAULT_ASPECT_RATIO),
        }
    }
}

impl CameraPose {
    /// Create a pose without an aspect ratio.
    pub fn new(position: Point3<f64>, orientation: UnitQuaternion<f64>, focal_length: f64) -> Self {
        Self {
            position,
            orientation,
            focal_length,
            aspect_ratio: None,
        }
    }

    /// A pose at `position` looking at `target`.
    ///
    /// If the two points coincide the orientation is identity.
    pub fn looking_at(position: Point3<f64>, target: &Point3<f64>, focal_length: f64) -> Self {
        let orientation = geometry::look_at_or(&position, target, &UnitQuaternion::identity());
        Self::new(position, orientation, focal_length)
    }

    /// A pose from XYZ Euler angles (radians).
    pub fn from_euler(position: Point3<f64>, euler: Vector3<f64>, focal_length: f64) -> Self {
        Self::new(
            position,
            UnitQuaternion::from_euler_angles(euler.x, euler.y, euler.z),
            focal_length,
        )
    }

    /// Set the aspect ratio.
    pub fn with_aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = Some(aspect_ratio);
        self
    }

    /// Orientation as XYZ Euler angles (radians).
    pub fn euler(&self) -> Vector3<f64> {
        let (x, y, z) = self.orientation.euler_angles();
        Vector3::new(x, y, z)
    }

    /// Viewing direction.
    #[inline]
    pub fn forward(&self) -> Vector3<f64> {
        self.orientation * -Vector3::z()
    }

    /// Screen-up direction.
    #[inline]
    pub fn up(&self) -> Vector3<f64> {
        self.orientation * Vector3::y()
    }

    /// Screen-right direction.
    #[inline]
    pub fn right(&self) -> Vector3<f64> {
        self.orientation * Vector3::x()
    }

    /// Screen-right as a unit axis, for rotations about it.
    #[inline]
    pub fn right_axis(&self) -> Unit<Vector3<f64>> {
        self.orientation * Vector3::x_axis()
    }

    /// The point `distance` units in front of the camera.
    #[inline]
    pub fn look_target(&self, distance: f64) -> Point3<f64> {
        self.position + self.forward() * distance
    }

    /// Vertical field of view in radians on the reference sensor.
    #[inline]
    pub fn field_of_view(&self) -> f64 {
        geometry::field_of_view(self.focal_length, SENSOR_HEIGHT_MM)
    }

    /// Whether every component is finite and the focal length is positive.
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
            && self.orientation.coords.iter().all(|c| c.is_finite())
            && self.focal_length.is_finite()
            && self.focal_length > 0.0
            && self.aspect_ratio.is_none_or(|a| a.is_finite() && a > 0.0)
    }

    /// Interpolate toward `other`: position and focal length linearly,
    /// orientation along the shortest arc. The aspect ratio is taken from
    /// `self`.
    pub fn interpolate(&self, other: &CameraPose, t: f64) -> CameraPose {
        CameraPose {
            position: geometry::lerp_point(&self.position, &other.position, t),
            orientation: geometry::slerp_orientation(&self.orientation, &other.orientation, t),
            focal_length: geometry::lerp(self.focal_length, other.focal_length, t),
            aspect_ratio: self.aspect_ratio,
        }
    }

    /// Largest of the position distance, orientation angle and focal length
    /// difference between two poses.
    pub fn max_difference(&self, other: &CameraPose) -> f64 {
        (self.position - other.position)
            .norm()
            .max(geometry::angle_between(&self.orientation, &other.orientation))
            .max((self.focal_length - other.focal_length).abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_at_origin() {
        let pose = CameraPose::default();
        assert!((pose.forward() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
        let target = pose.look_target(10.0);
        assert!((target - Point3::origin()).norm() < 1e-12);
        assert_eq!(pose.focal_length, 50.0);
        assert!(pose.is_finite());
    }

    #[test]
    fn test_looking_at() {
        let pose = CameraPose::looking_at(Point3::new(4.0, 3.0, 0.0), &Point3::origin(), 35.0);
        let expected = Vector3::new(-4.0, -3.0, 0.0).normalize();
        assert!((pose.forward() - expected).norm() < 1e-12);
        assert!(pose.right().y.abs() < 1e-12);
    }

    #[test]
    fn test_euler_round_trip() {
        let euler = Vector3::new(0.1, -0.4, 1.2);
        let pose = CameraPose::from_euler(Point3::origin(), euler, 50.0);
        assert!((pose.euler() - euler).norm() < 1e-12);
    }

    #[test]
    fn test_is_finite() {
        let mut pose = CameraPose::default();
        pose.position.x = f64::NAN;
        assert!(!pose.is_finite());

        let mut pose = CameraPose::default();
        pose.focal_length = 0.0;
        assert!(!pose.is_finite());
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = CameraPose::default();
        let b = CameraPose::looking_at(Point3::new(5.0, 1.0, 0.0), &Point3::origin(), 85.0);
        assert!(a.interpolate(&b, 0.0).max_difference(&a) < 1e-12);
        assert!(a.interpolate(&b, 1.0).max_difference(&b) < 1e-9);

        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.focal_length, 67.5);
    }

    #[test]
    fn test_field_of_view() {
        let pose = CameraPose::default();
        let expected = 2.0 * (24.0f64 / 100.0).atan();
        assert!((pose.field_of_view() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_serde_record() {
        let pose = CameraPose::looking_at(Point3::new(1.0, 2.0, 3.0), &Point3::origin(), 35.0)
            .with_aspect_ratio(1.5);
        let json = serde_json::to_value(pose).unwrap();
        assert_eq!(json["position"]["y"], 2.0);
        assert_eq!(json["focalLength"], 35.0);
        assert_eq!(json["aspectRatio"], 1.5);
        assert!(json["rotation"].is_object());
        assert!(json["lookAt"].is_object());

        let back: CameraPose = serde_json::from_value(json).unwrap();
        assert_eq!(back.position, pose.position);
        assert!(geometry::angle_between(&back.orientation, &pose.orientation) < 1e-12);
    }

    #[test]
    fn test_deserialize_look_at_only() {
        let json = r#"{"position":{"x":0,"y":0,"z":5},"lookAt":{"x":0,"y":0,"z":0},"focalLength":50}"#;
        let pose: CameraPose = serde_json::from_str(json).unwrap();
        assert!(geometry::angle_between(&pose.orientation, &UnitQuaternion::identity()) < 1e-12);
        assert_eq!(pose.aspect_ratio, None);
    }
}
