//! Camera instructions: one authored shot each.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::{CameraAngle, CameraPose, Movement, ShotType};
use crate::easing::Easing;
use crate::error::{CameraError, Result};
use crate::geometry;
use crate::io::wire;

/// Where an overridden pose looks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Aim {
    /// Look at a world-space point.
    LookAt(#[serde(with = "wire::point")] Point3<f64>),
    /// Use an explicit orientation (XYZ Euler angles on the wire).
    Rotation(#[serde(with = "wire::rotation")] UnitQuaternion<f64>),
}

impl Aim {
    /// Orientation for a camera at `position`, or `None` if a look-at
    /// target coincides with the position.
    pub fn orientation(&self, position: &Point3<f64>) -> Option<UnitQuaternion<f64>> {
        match self {
            Aim::LookAt(target) => geometry::look_at(position, target, &geometry::world_up()),
            Aim::Rotation(q) => Some(*q),
        }
    }

    fn is_finite(&self) -> bool {
        match self {
            Aim::LookAt(p) => p.iter().all(|c| c.is_finite()),
            Aim::Rotation(q) => q.coords.iter().all(|c| c.is_finite()),
        }
    }
}

/// Explicit values that replace the computed ones at one end of a shot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoseOverride {
    /// Camera position.
    #[serde(with = "wire::opt_point", skip_serializing_if = "Option::is_none")]
    pub position: Option<Point3<f64>>,
    /// Orientation or look-at target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aim: Option<Aim>,
    /// Focal length in millimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<f64>,
}

impl PoseOverride {
    /// Whether nothing is overridden.
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.aim.is_none() && self.focal_length.is_none()
    }

    /// Replace the overridden components of `pose`.
    ///
    /// The aim is resolved from the overridden position. A degenerate look-at
    /// keeps the orientation of `pose`.
    pub fn apply(&self, pose: CameraPose) -> CameraPose {
        let mut out = pose;
        if let Some(position) = self.position {
            out.position = position;
        }
        if let Some(aim) = &self.aim {
            match aim.orientation(&out.position) {
                Some(q) => out.orientation = q,
                None => log::warn!("override look-at target coincides with the camera position"),
            }
        }
        if let Some(focal_length) = self.focal_length {
            out.focal_length = focal_length;
        }
        out
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.position.is_some_and(|p| !p.iter().all(|c| c.is_finite())) {
            return Err(CameraError::non_finite(format!("{field}.position")));
        }
        if self.aim.is_some_and(|a| !a.is_finite()) {
            return Err(CameraError::non_finite(format!("{field}.aim")));
        }
        if let Some(focal) = self.focal_length {
            if !focal.is_finite() {
                return Err(CameraError::non_finite(format!("{field}.focalLength")));
            }
            if focal <= 0.0 {
                return Err(CameraError::invalid_param(
                    "focalLength",
                    focal,
                    "must be positive",
                ));
            }
        }
        Ok(())
    }
}

/// Camera height for an initial setup, relative to its distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAngle {
    /// Below the subject.
    Low,
    /// Level with the subject.
    #[default]
    Eye,
    /// Above the subject.
    High,
    /// Well above the subject.
    Overhead,
    /// As high as the camera is far.
    BirdsEye,
}

impl VerticalAngle {
    /// Height offset per unit of setup distance.
    pub fn height_factor(self) -> f64 {
        match self {
            VerticalAngle::Low => -0.3,
            VerticalAngle::Eye => 0.0,
            VerticalAngle::High => 0.3,
            VerticalAngle::Overhead => 0.7,
            VerticalAngle::BirdsEye => 1.0,
        }
    }
}

/// Which side of the subject an initial setup starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubjectView {
    /// In front of the subject.
    #[default]
    Front,
    /// Behind the subject.
    Back,
    /// On the subject's left.
    Left,
    /// On the subject's right.
    Right,
    /// Between front and left.
    ThreeQuarterLeft,
    /// Between front and right.
    ThreeQuarterRight,
}

impl SubjectView {
    /// Every view.
    pub const ALL: [SubjectView; 6] = [
        SubjectView::Front,
        SubjectView::Back,
        SubjectView::Left,
        SubjectView::Right,
        SubjectView::ThreeQuarterLeft,
        SubjectView::ThreeQuarterRight,
    ];

    /// Horizontal unit direction from the subject to the camera, in the
    /// subject's own frame (the subject faces +Z).
    pub fn direction(self) -> Vector3<f64> {
        let d = std::f64::consts::FRAC_1_SQRT_2;
        match self {
            SubjectView::Front => Vector3::new(0.0, 0.0, 1.0),
            SubjectView::Back => Vector3::new(0.0, 0.0, -1.0),
            SubjectView::Left => Vector3::new(-1.0, 0.0, 0.0),
            SubjectView::Right => Vector3::new(1.0, 0.0, 0.0),
            SubjectView::ThreeQuarterLeft => Vector3::new(-d, 0.0, d),
            SubjectView::ThreeQuarterRight => Vector3::new(d, 0.0, d),
        }
    }
}

fn default_setup_distance() -> f64 {
    5.0
}

/// Compositional framing of a shot's first frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialSetup {
    /// Distance from the subject.
    #[serde(default = "default_setup_distance")]
    pub distance: f64,
    /// Camera height.
    #[serde(default)]
    pub vertical_angle: VerticalAngle,
    /// Optional shot size applied after placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_size: Option<ShotType>,
    /// Side of the subject to start from.
    #[serde(default)]
    pub subject_view: SubjectView,
    /// Point to look at instead of the subject centre.
    #[serde(
        default,
        with = "wire::opt_point",
        skip_serializing_if = "Option::is_none"
    )]
    pub focus_point: Option<Point3<f64>>,
}

impl Default for InitialSetup {
    fn default() -> Self {
        Self {
            distance: default_setup_distance(),
            vertical_angle: VerticalAngle::default(),
            shot_size: None,
            subject_view: SubjectView::default(),
            focus_point: None,
        }
    }
}

impl InitialSetup {
    /// Set the distance.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Set the vertical angle.
    pub fn with_vertical_angle(mut self, vertical_angle: VerticalAngle) -> Self {
        self.vertical_angle = vertical_angle;
        self
    }

    /// Set the shot size.
    pub fn with_shot_size(mut self, shot_size: ShotType) -> Self {
        self.shot_size = Some(shot_size);
        self
    }

    /// Set the subject view.
    pub fn with_subject_view(mut self, subject_view: SubjectView) -> Self {
        self.subject_view = subject_view;
        self
    }

    /// Set the focus point.
    pub fn with_focus_point(mut self, focus_point: Point3<f64>) -> Self {
        self.focus_point = Some(focus_point);
        self
    }
}

/// Allowed camera-to-subject distance band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceRange {
    /// Closest the camera may get to the subject centre.
    pub min_distance: f64,
    /// Farthest the camera may get from the subject centre.
    pub max_distance: f64,
}

impl DistanceRange {
    /// A band from `min_distance` to `max_distance`.
    pub fn new(min_distance: f64, max_distance: f64) -> Self {
        Self {
            min_distance,
            max_distance,
        }
    }
}

/// When the subject must be in view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    /// In view on every frame.
    VisibleAtAllTimes,
    /// In view on the first frame.
    VisibleAtStart,
}

/// Limits every frame of a shot must respect.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Distance band around the subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceRange>,
    /// Subject visibility.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

impl Constraints {
    /// Whether no constraint is set.
    pub fn is_empty(&self) -> bool {
        self.distance.is_none() && self.visibility.is_none()
    }

    fn validate(&self, index: usize) -> Result<()> {
        let Some(range) = self.distance else {
            return Ok(());
        };
        if !(range.min_distance.is_finite() && range.max_distance.is_finite()) {
            return Err(CameraError::non_finite(format!(
                "instruction {index} constraints.distance"
            )));
        }
        if range.min_distance < 0.0 {
            return Err(CameraError::invalid_param(
                "constraints.distance.minDistance",
                range.min_distance,
                "must not be negative",
            ));
        }
        if range.min_distance > range.max_distance {
            return Err(CameraError::invalid_param(
                "constraints.distance.maxDistance",
                range.max_distance,
                "must not be below minDistance",
            ));
        }
        Ok(())
    }
}

/// One camera shot.
///
/// An instruction with no movement, camera angle, shot type or end override
/// is a static hold: every frame equals its start pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// Number of frames the shot lasts.
    pub frame_count: usize,
    /// Easing of the shot's progress.
    #[serde(default, rename = "movementEasing")]
    pub easing: Easing,
    /// Index of the framed subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_index: Option<usize>,
    /// Explicit start values.
    #[serde(default, skip_serializing_if = "PoseOverride::is_empty")]
    pub start: PoseOverride,
    /// Explicit end values.
    #[serde(default, skip_serializing_if = "PoseOverride::is_empty")]
    pub end: PoseOverride,
    /// Compositional start framing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_setup: Option<InitialSetup>,
    /// End camera angle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_angle: Option<CameraAngle>,
    /// End shot type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_type: Option<ShotType>,
    /// Camera movement.
    #[serde(default, skip_serializing_if = "Movement::is_empty")]
    pub movement: Movement,
    /// Distance and visibility limits.
    #[serde(default, skip_serializing_if = "Constraints::is_empty")]
    pub constraints: Constraints,
}

impl Instruction {
    /// A static, linear instruction of `frame_count` frames.
    pub fn new(frame_count: usize) -> Self {
        Self {
            frame_count,
            easing: Easing::Linear,
            subject_index: None,
            start: PoseOverride::default(),
            end: PoseOverride::default(),
            initial_setup: None,
            camera_angle: None,
            shot_type: None,
            movement: Movement::default(),
            constraints: Constraints::default(),
        }
    }

    /// Set the easing curve.
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Frame the subject at `index`.
    pub fn with_subject(mut self, index: usize) -> Self {
        self.subject_index = Some(index);
        self
    }

    /// Override the start position.
    pub fn with_start_position(mut self, position: Point3<f64>) -> Self {
        self.start.position = Some(position);
        self
    }

    /// Override the start aim.
    pub fn with_start_aim(mut self, aim: Aim) -> Self {
        self.start.aim = Some(aim);
        self
    }

    /// Override the start focal length.
    pub fn with_start_focal_length(mut self, focal_length: f64) -> Self {
        self.start.focal_length = Some(focal_length);
        self
    }

    /// Override the end position.
    pub fn with_end_position(mut self, position: Point3<f64>) -> Self {
        self.end.position = Some(position);
        self
    }

    /// Override the end aim.
    pub fn with_end_aim(mut self, aim: Aim) -> Self {
        self.end.aim = Some(aim);
        self
    }

    /// Override the end focal length.
    pub fn with_end_focal_length(mut self, focal_length: f64) -> Self {
        self.end.focal_length = Some(focal_length);
        self
    }

    /// Set the compositional start framing.
    pub fn with_initial_setup(mut self, setup: InitialSetup) -> Self {
        self.initial_setup = Some(setup);
        self
    }

    /// Set the end camera angle.
    pub fn with_camera_angle(mut self, angle: CameraAngle) -> Self {
        self.camera_angle = Some(angle);
        self
    }

    /// Set the end shot type.
    pub fn with_shot_type(mut self, shot: ShotType) -> Self {
        self.shot_type = Some(shot);
        self
    }

    /// Set the movement.
    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    /// Keep the camera between `min_distance` and `max_distance` of the
    /// subject centre.
    pub fn with_distance_range(mut self, min_distance: f64, max_distance: f64) -> Self {
        self.constraints.distance = Some(DistanceRange::new(min_distance, max_distance));
        self
    }

    /// Require the subject to be in view.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.constraints.visibility = Some(visibility);
        self
    }

    /// Whether every frame of this instruction equals its start pose.
    pub fn is_static_hold(&self) -> bool {
        self.movement.is_empty()
            && self.camera_angle.is_none()
            && self.shot_type.is_none()
            && self.end.is_empty()
            && self.constraints.is_empty()
    }

    /// Check the instruction at position `index` against the subject list
    /// length and a minimum frame count.
    pub fn validate(&self, index: usize, subject_count: usize, min_frame_count: usize) -> Result<()> {
        let minimum = min_frame_count.max(1);
        if self.frame_count < minimum {
            return Err(CameraError::InvalidFrameCount {
                instruction: index,
                frame_count: self.frame_count,
                minimum,
            });
        }
        if let Some(subject) = self.subject_index {
            if subject >= subject_count {
                return Err(CameraError::SubjectOutOfRange {
                    instruction: index,
                    index: subject,
                    subject_count,
                });
            }
        }
        self.start.validate(&format!("instruction {index} start"))?;
        self.end.validate(&format!("instruction {index} end"))?;
        if let Some(setup) = &self.initial_setup {
            if !setup.distance.is_finite() {
                return Err(CameraError::non_finite(format!(
                    "instruction {index} initialSetup.distance"
                )));
            }
            if setup.distance <= 0.0 {
                return Err(CameraError::invalid_param(
                    "initialSetup.distance",
                    setup.distance,
                    "must be positive",
                ));
            }
            if setup
                .focus_point
                .is_some_and(|p| !p.iter().all(|c| c.is_finite()))
            {
                return Err(CameraError::non_finite(format!(
                    "instruction {index} initialSetup.focusPoint"
                )));
            }
        }
        self.constraints.validate(index)
    }
}
