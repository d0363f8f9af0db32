//! Shot-type resolver.
//!
//! A shot size is a framed vertical extent (a fraction of the subject's
//! height) seen through a particular focal length. The camera keeps its
//! bearing from the subject, moves to the distance at which that extent
//! fills the frame, and is re-aimed at the subject with its roll preserved.
//!
//! | Shot | Framed height | Focal length |
//! |------|---------------|--------------|
//! | extreme close-up | 0.15 h | 100 mm |
//! | close-up | 0.35 h | 85 mm |
//! | medium close-up | 0.5 h | 70 mm |
//! | medium | 0.8 h | 50 mm |
//! | medium long | 1.2 h | 40 mm |
//! | full | 1.6 h | 35 mm |
//! | long | 2.5 h | 28 mm |
//! | extreme long | 6 h | 20 mm |
//!
//! The resulting distance grows strictly from extreme close-up to extreme
//! long shot.

use nalgebra::Vector3;

use crate::geometry::{self, world_up};
use crate::scene::{CameraPose, ShotType, Subject};

/// Framed height (fraction of subject height) and focal length of a shot.
pub fn framing(shot: ShotType) -> (f64, f64) {
    match shot {
        ShotType::ExtremeCloseUp => (0.15, 100.0),
        ShotType::CloseUp => (0.35, 85.0),
        ShotType::MediumCloseUp => (0.5, 70.0),
        ShotType::MediumShot => (0.8, 50.0),
        ShotType::MediumLongShot => (1.2, 40.0),
        ShotType::FullShot => (1.6, 35.0),
        ShotType::LongShot => (2.5, 28.0),
        ShotType::ExtremeLongShot => (6.0, 20.0),
        ShotType::TwoShot => (1.6, 45.0),
        ShotType::GroupShot => (2.5, 35.0),
        ShotType::Insert => (0.1, 100.0),
        ShotType::Cutaway => (1.0, 50.0),
        ShotType::Establishing => (8.0, 24.0),
    }
}

/// Camera-to-subject distance of a shot.
pub fn shot_distance(shot: ShotType, subject: &Subject) -> f64 {
    let (fraction, focal_length) = framing(shot);
    geometry::required_distance(subject.height() * fraction, focal_length)
}

/// Apply `shot` to `pose`.
pub fn apply_shot_type(
    shot: Option<ShotType>,
    subject: Option<&Subject>,
    pose: CameraPose,
) -> CameraPose {
    let (Some(shot), Some(subject)) = (shot, subject) else {
        return pose;
    };

    let center = subject.center();
    let roll = geometry::roll_of(&pose.orientation);
    let (_, focal_length) = framing(shot);
    let (w, h, d) = (subject.width(), subject.height(), subject.depth());

    let (position, target) = match shot {
        ShotType::Cutaway => (pose.position + Vector3::new(2.0 * w, h, d), center),
        _ => {
            let bearing = geometry::direction(&center, &pose.position).unwrap_or_else(|| {
                log::warn!("camera sits on the subject centre; framing along the subject's facing");
                subject.forward()
            });
            let distance = shot_distance(shot, subject);
            let target = match shot {
                ShotType::TwoShot => center + horizontal_right(&pose) * (0.5 * w),
                ShotType::GroupShot => center + world_up() * (0.5 * h),
                _ => center,
            };
            let lift = match shot {
                ShotType::Establishing => world_up() * (2.0 * h),
                _ => Vector3::zeros(),
            };
            (target + bearing * distance + lift, target)
        }
    };
    log::trace!("shot {shot:?}: camera at {position:?}, {focal_length}mm");

    let aimed = geometry::look_at_or(&position, &target, &pose.orientation);
    CameraPose {
        position,
        orientation: geometry::with_roll(&aimed, roll),
        focal_length,
        ..pose
    }
}

fn horizontal_right(pose: &CameraPose) -> Vector3<f64> {
    let r = pose.right();
    let flat = Vector3::new(r.x, 0.0, r.z);
    if flat.norm() > geometry::EPSILON {
        flat.normalize()
    } else {
        Vector3::x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn subject() -> Subject {
        Subject::new(Point3::origin(), Vector3::new(1.0, 2.0, 1.0)).unwrap()
    }

    fn front() -> CameraPose {
        CameraPose::looking_at(Point3::new(0.0, 1.0, 5.0), &Point3::new(0.0, 1.0, 0.0), 50.0)
    }

    #[test]
    fn test_identity_without_subject_or_shot() {
        for shot in ShotType::ALL {
            assert_eq!(apply_shot_type(Some(shot), None, front()), front());
        }
        assert_eq!(apply_shot_type(None, Some(&subject()), front()), front());
    }

    #[test]
    fn test_sizes_strictly_widen() {
        let s = subject();
        let distances: Vec<f64> = ShotType::SIZES.iter().map(|&shot| shot_distance(shot, &s)).collect();
        for pair in distances.windows(2) {
            assert!(pair[0] < pair[1], "{distances:?}");
        }
    }

    #[test]
    fn test_sizes_place_camera_on_bearing() {
        let s = subject();
        for shot in ShotType::SIZES {
            let pose = apply_shot_type(Some(shot), Some(&s), front());
            let offset = pose.position - s.center();
            assert!((offset.norm() - shot_distance(shot, &s)).abs() < 1e-9, "{shot:?}");
            assert!(offset.x.abs() < 1e-12 && offset.y.abs() < 1e-12);
            assert!((pose.forward() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-9);
            assert_eq!(pose.focal_length, framing(shot).1);
        }
    }

    #[test]
    fn test_medium_shot_distance() {
        // 0.8 * 2 = 1.6 units of height at 50mm on a 24mm sensor.
        let d = shot_distance(ShotType::MediumShot, &subject());
        assert!((d - 1.6 * 50.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn test_roll_is_preserved() {
        let s = subject();
        let mut dutch = front();
        dutch.orientation = geometry::with_roll(&dutch.orientation, 0.25);
        let pose = apply_shot_type(Some(ShotType::CloseUp), Some(&s), dutch);
        assert!((geometry::roll_of(&pose.orientation) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_bearing_uses_subject_facing() {
        let s = subject();
        let inside = CameraPose::new(s.center(), front().orientation, 50.0);
        let pose = apply_shot_type(Some(ShotType::FullShot), Some(&s), inside);
        assert!(pose.position.z > 0.0);
        assert!(pose.is_finite());
    }

    #[test]
    fn test_special_shots() {
        let s = subject();
        let establishing = apply_shot_type(Some(ShotType::Establishing), Some(&s), front());
        assert!(establishing.position.y > s.center().y + 3.0);
        assert!(establishing.forward().y < 0.0);

        let cutaway = apply_shot_type(Some(ShotType::Cutaway), Some(&s), front());
        assert!((cutaway.position - Point3::new(2.0, 3.0, 6.0)).norm() < 1e-12);

        let two = apply_shot_type(Some(ShotType::TwoShot), Some(&s), front());
        assert!(two.position.x > 0.0);
    }
}
