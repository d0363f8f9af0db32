//! # cinecam
//!
//! Deterministic cinematographic camera trajectories.
//!
//! cinecam turns a sequence of authored camera instructions (shot size,
//! camera angle, movement, easing) over a set of 3D subjects into one camera
//! pose per frame: position, orientation and focal length, ready for a
//! renderer or for export.
//!
//! ## Features
//!
//! - **Easing**: 31 named curves, from linear to elastic, bounce and handheld
//! - **Resolvers**: shot sizes, camera angles and a compositional movement
//!   vocabulary (truck, pedestal, dolly, pan, arc, whip pan, tilt, zoom and
//!   crane, tracking, drone, handheld and steadicam rigs)
//! - **Continuity**: each instruction continues from the last frame of the
//!   previous one
//! - **Quaternion orientations**: slerp everywhere, Euler angles only at the
//!   JSON boundary
//! - **Interchange**: JSON export and import, playback of imported frames
//!
//! ## Quick Start
//!
//! ```
//! use cinecam::prelude::*;
//! use nalgebra::Point3;
//!
//! let subjects = vec![Subject::of_class(SubjectClass::Chair, Point3::origin())];
//!
//! let instructions = vec![
//!     // Hold on the opening pose for a second.
//!     Instruction::new(24),
//!     // Arc a quarter turn around the chair, settling into a medium shot.
//!     Instruction::new(96)
//!         .with_subject(0)
//!         .with_easing(Easing::EaseInOutCubic)
//!         .with_shot_type(ShotType::MediumShot)
//!         .with_movement(Movement::new().with_rotation(RotationKind::ArcLeft, MovementScale::Full)),
//! ];
//!
//! let frames = synthesize(&subjects, &instructions, &CameraPose::default()).unwrap();
//! assert_eq!(frames.len(), 120);
//! assert_eq!(frames[0], CameraPose::default());
//! ```
//!
//! ## Authoring With a Store
//!
//! ```
//! use cinecam::prelude::*;
//!
//! let mut store = InstructionStore::new(StoreOptions::default());
//! store.add(Instruction::new(50).with_end_focal_length(100.0)).unwrap();
//!
//! let frames = store
//!     .synthesize(&[], &CameraPose::default(), &SynthesisOptions::default())
//!     .unwrap();
//! let playback = Playback::new(frames).unwrap();
//! assert_eq!(playback.frame(49).unwrap().focal_length, 100.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod easing;
pub mod error;
pub mod geometry;
pub mod io;
pub mod playback;
pub mod resolve;
pub mod scene;
pub mod store;
pub mod synth;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use cinecam::prelude::*;
/// ```
pub mod prelude {
    pub use crate::easing::{ease, Easing};
    pub use crate::error::{CameraError, Result};
    pub use crate::playback::Playback;
    pub use crate::scene::{
        Aim, CameraAngle, CameraPose, Constraints, DistanceKind, InitialSetup, Instruction,
        Movement, MovementScale, RigKind, RotationKind, ShotType, Subject, SubjectClass,
        SubjectView, TiltKind, TranslationKind, VerticalAngle, Visibility, ZoomKind,
    };
    pub use crate::store::{InstructionStore, StoreOptions};
    pub use crate::synth::{
        synthesize, synthesize_batch, synthesize_with_options, Continuity, Scene,
        SynthesisOptions,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_two_shot_sequence() {
        let subjects = Subject::default_set();
        let instructions = vec![
            Instruction::new(30)
                .with_subject(0)
                .with_camera_angle(CameraAngle::HighAngle)
                .with_shot_type(ShotType::FullShot),
            Instruction::new(30)
                .with_subject(1)
                .with_easing(Easing::EaseOutQuad)
                .with_movement(
                    Movement::new()
                        .with_distance(DistanceKind::DollyIn, MovementScale::Short)
                        .with_rotation(RotationKind::PanRight, MovementScale::Short),
                ),
        ];

        let frames = synthesize(&subjects, &instructions, &CameraPose::default()).unwrap();
        assert_eq!(frames.len(), 60);
        assert!(frames.iter().all(|f| f.is_finite()));

        // The second shot picks up exactly where the first one ended.
        assert!(frames[30].max_difference(&frames[29]) < 1e-9);

        // The first shot ends high and framing subject 0.
        let end = frames[29];
        assert!(end.position.y > subjects[0].center().y);
        let to_center = (subjects[0].center() - end.position).normalize();
        assert!((end.forward() - to_center).norm() < 1e-9);

        // Dolly in moves toward subject 1.
        let d0 = (frames[30].position - subjects[1].center()).norm();
        let d1 = (frames[59].position - subjects[1].center()).norm();
        assert!(d1 < d0);
    }
}
