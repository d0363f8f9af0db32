//! Core scene data model.
//!
//! This module holds the value types that flow through synthesis:
//!
//! - [`Subject`] - an object in the scene the camera frames
//! - [`CameraPose`] - position, orientation and focal length of the camera
//! - [`Instruction`] - one authored camera shot
//! - [`Movement`] - the compositional movement vocabulary of an instruction
//! - [`CameraAngle`] and [`ShotType`] - symbolic framing descriptors
//!
//! All of them serialize to the JSON interchange shape used by [`crate::io`].
//!
//! # Example
//!
//! ```
//! use cinecam::scene::{Instruction, Movement, MovementScale, RotationKind, ShotType};
//! use cinecam::easing::Easing;
//!
//! let shot = Instruction::new(100)
//!     .with_subject(0)
//!     .with_easing(Easing::EaseInOutCubic)
//!     .with_shot_type(ShotType::MediumShot)
//!     .with_movement(Movement::new().with_rotation(RotationKind::ArcLeft, MovementScale::Full));
//!
//! assert!(!shot.is_static_hold());
//! ```

mod framing;
mod instruction;
mod movement;
mod pose;
mod subject;

pub use framing::{CameraAngle, ShotType};
pub use instruction::{
    Aim, Constraints, DistanceRange, InitialSetup, Instruction, PoseOverride, SubjectView,
    VerticalAngle, Visibility,
};
pub use movement::{
    DistanceKind, Movement, MovementScale, MovementStep, RigKind, RotationKind, TiltKind,
    TranslationKind, ZoomKind,
};
pub use pose::{CameraPose, DEFAULT_ASPECT_RATIO, DEFAULT_FOCAL_LENGTH};
pub use subject::{Subject, SubjectClass, SubjectFrame};
