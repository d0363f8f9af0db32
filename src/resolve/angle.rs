//! Camera-angle resolver.
//!
//! Places and aims the camera for a [`CameraAngle`] relative to the framed
//! subject. Without a subject, or without an angle, the pose is returned
//! unchanged.

use nalgebra::{Point3, Vector3};

use crate::geometry::{self, world_up, EPSILON};
use crate::scene::{CameraAngle, CameraPose, Subject};

/// Roll of a Dutch angle, in degrees.
pub const DUTCH_ROLL_DEGREES: f64 = 15.0;

/// Camera height over the subject base, per unit of subject height.
const EYE_HEIGHT: f64 = 0.9;
const LOW_HEIGHT: f64 = 0.3;
const HIGH_HEIGHT: f64 = 1.5;
const BIRDS_EYE_HEIGHT: f64 = 3.0;

/// Apply `angle` to `pose`.
pub fn apply_camera_angle(
    angle: Option<CameraAngle>,
    subject: Option<&Subject>,
    pose: CameraPose,
) -> CameraPose {
    let (Some(angle), Some(subject)) = (angle, subject) else {
        return pose;
    };
    log::trace!("resolving camera angle {angle:?}");

    let center = subject.center();
    let base = subject.position;
    let h = subject.height();

    match angle {
        CameraAngle::EyeLevel => at_height(&pose, subject, EYE_HEIGHT),
        CameraAngle::LowAngle => at_height(&pose, subject, LOW_HEIGHT),
        CameraAngle::HighAngle => at_height(&pose, subject, HIGH_HEIGHT),
        CameraAngle::DutchAngle => {
            let aimed = geometry::look_at_or(&pose.position, &center, &pose.orientation);
            CameraPose {
                orientation: geometry::with_roll(&aimed, DUTCH_ROLL_DEGREES.to_radians()),
                ..pose
            }
        }
        CameraAngle::BirdsEye => {
            let position = Point3::new(center.x, base.y + BIRDS_EYE_HEIGHT * h, center.z);
            // The old heading becomes screen-up, so the view keeps its bearing.
            let heading = horizontal(pose.forward())
                .or_else(|| horizontal(-subject.forward()))
                .unwrap_or_else(|| -Vector3::z());
            let orientation = geometry::look_at(&position, &center, &heading)
                .unwrap_or(pose.orientation);
            CameraPose {
                position,
                orientation,
                ..pose
            }
        }
        CameraAngle::WormsEye => {
            let bearing = horizontal(pose.position - center)
                .or_else(|| horizontal(subject.forward()))
                .unwrap_or_else(Vector3::z);
            let ground = Point3::new(center.x, base.y, center.z);
            let position = ground + bearing * (0.5 * subject.depth() + 0.1 * h);
            let top = Point3::new(center.x, base.y + h, center.z);
            CameraPose {
                position,
                orientation: geometry::look_at_or(&position, &top, &pose.orientation),
                ..pose
            }
        }
        CameraAngle::OverTheShoulder => {
            let (w, d) = (subject.width(), subject.depth());
            // Subject frame: -X is the subject's right, +Z its facing.
            let position = base + subject.rotation * Vector3::new(-0.5 * w, 0.8 * h, -d);
            let past = base + subject.rotation * Vector3::new(0.0, 0.6 * h, 3.0 * d);
            CameraPose {
                position,
                orientation: geometry::look_at_or(&position, &past, &pose.orientation),
                ..pose
            }
        }
        CameraAngle::PointOfView => {
            let position = base
                + subject.rotation * Vector3::new(0.0, EYE_HEIGHT * h, 0.5 * subject.depth());
            let facing = subject.forward();
            let orientation = if facing.norm() > EPSILON {
                geometry::look_along(&facing, &world_up())
            } else {
                pose.orientation
            };
            CameraPose {
                position,
                orientation,
                ..pose
            }
        }
    }
}

fn at_height(pose: &CameraPose, subject: &Subject, factor: f64) -> CameraPose {
    let mut position = pose.position;
    position.y = subject.position.y + factor * subject.height();
    CameraPose {
        position,
        orientation: geometry::look_at_or(&position, &subject.center(), &pose.orientation),
        ..*pose
    }
}

fn horizontal(v: Vector3<f64>) -> Option<Vector3<f64>> {
    let flat = Vector3::new(v.x, 0.0, v.z);
    let len = flat.norm();
    (len > EPSILON).then(|| flat / len)
}
