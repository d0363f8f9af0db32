//! Geometry utilities for camera poses.
//!
//! Positions are [`Point3<f64>`], directions are [`Vector3<f64>`] and
//! orientations are [`UnitQuaternion<f64>`]. Cameras follow the usual
//! right-handed convention: local −Z is the viewing direction, +Y is up and
//! +X is right.
//!
//! # Example
//!
//! ```
//! use cinecam::geometry::{look_at, world_up};
//! use nalgebra::{Point3, Vector3};
//!
//! let q = look_at(&Point3::new(0.0, 0.0, 10.0), &Point3::origin(), &world_up()).unwrap();
//! let forward = q * -Vector3::z();
//! assert!((forward - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12);
//! ```

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::scene::Subject;

/// Height of the reference sensor in millimetres (full-frame 35mm).
pub const SENSOR_HEIGHT_MM: f64 = 24.0;

/// Directions shorter than this are treated as degenerate.
pub const EPSILON: f64 = 1e-9;

/// The world up axis (+Y).
#[inline]
pub fn world_up() -> Vector3<f64> {
    Vector3::y()
}

/// Scalar linear interpolation.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Componentwise linear interpolation between two points.
#[inline]
pub fn lerp_point(a: &Point3<f64>, b: &Point3<f64>, t: f64) -> Point3<f64> {
    a + (b - a) * t
}

/// Spherical linear interpolation between two orientations.
///
/// Interpolates along the shortest arc. Orientations that are numerically
/// identical (where slerp is ill-conditioned) fall back to a normalized lerp,
/// so the result is always a valid unit quaternion.
pub fn slerp_orientation(
    a: &UnitQuaternion<f64>,
    b: &UnitQuaternion<f64>,
    t: f64,
) -> UnitQuaternion<f64> {
    if let Some(q) = a.try_slerp(b, t, EPSILON) {
        return q;
    }

    let b = if a.coords.dot(&b.coords) < 0.0 {
        UnitQuaternion::new_unchecked(-b.into_inner())
    } else {
        *b
    };
    a.nlerp(&b, t)
}

/// Angle in radians of the rotation taking `a` to `b`.
///
/// Stays accurate for nearly equal orientations, where
/// [`UnitQuaternion::angle_to`] loses precision.
pub fn angle_between(a: &UnitQuaternion<f64>, b: &UnitQuaternion<f64>) -> f64 {
    let delta = a.rotation_to(b);
    let q = delta.quaternion();
    2.0 * q.imag().norm().atan2(q.scalar().abs())
}

/// Orientation whose forward axis points from `from` toward `to`.
///
/// Returns `None` when the two points coincide. When the viewing direction is
/// parallel to `up` (looking straight up or down) an alternate up axis is
/// used so that the result is still well defined.
pub fn look_at(
    from: &Point3<f64>,
    to: &Point3<f64>,
    up: &Vector3<f64>,
) -> Option<UnitQuaternion<f64>> {
    let forward = direction(from, to)?;
    Some(look_along(&forward, up))
}

/// Orientation whose forward axis is `forward` (must be non-zero).
pub fn look_along(forward: &Vector3<f64>, up: &Vector3<f64>) -> UnitQuaternion<f64> {
    let forward = forward.normalize();
    let up = if forward.cross(up).norm() < 1e-6 {
        alternate_up(&forward)
    } else {
        *up
    };
    // face_towards maps local +Z onto its argument; the camera looks down -Z.
    UnitQuaternion::face_towards(&-forward, &up)
}

/// Like [`look_at`] with world up, falling back to `fallback` when the
/// direction is degenerate.
pub fn look_at_or(
    from: &Point3<f64>,
    to: &Point3<f64>,
    fallback: &UnitQuaternion<f64>,
) -> UnitQuaternion<f64> {
    match look_at(from, to, &world_up()) {
        Some(q) => q,
        None => {
            log::warn!(
                "degenerate look-at from {:?} to {:?}; keeping previous orientation",
                from,
                to
            );
            *fallback
        }
    }
}

/// Unit vector from `from` to `to`, or `None` if the points coincide.
pub fn direction(from: &Point3<f64>, to: &Point3<f64>) -> Option<Vector3<f64>> {
    let d = to - from;
    let len = d.norm();
    if len > EPSILON {
        Some(d / len)
    } else {
        None
    }
}

fn alternate_up(forward: &Vector3<f64>) -> Vector3<f64> {
    // Looking straight down, screen-up points toward world -Z.
    if forward.z.abs() < 0.9 {
        -Vector3::z()
    } else {
        Vector3::x()
    }
}

/// Roll of `orientation` around its own forward axis, relative to a level
/// camera looking the same way (radians, positive is counter-clockwise as
/// seen by the camera).
pub fn roll_of(orientation: &UnitQuaternion<f64>) -> f64 {
    let forward = orientation * -Vector3::z();
    let level = look_along(&forward, &world_up());
    let up = orientation * Vector3::y();
    let level_up = level * Vector3::y();
    let level_right = level * Vector3::x();
    (-up.dot(&level_right)).atan2(up.dot(&level_up))
}

/// Apply `roll` radians about the camera's own forward axis.
pub fn with_roll(orientation: &UnitQuaternion<f64>, roll: f64) -> UnitQuaternion<f64> {
    if roll == 0.0 {
        return *orientation;
    }
    orientation * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll)
}

/// Rotation of `angle` radians about the world up axis.
#[inline]
pub fn yaw(angle: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angle)
}

/// Vertical field of view (radians) for a focal length on a sensor.
#[inline]
pub fn field_of_view(focal_length: f64, sensor_height: f64) -> f64 {
    2.0 * (sensor_height / (2.0 * focal_length)).atan()
}

/// Camera-to-subject distance that makes `extent` fill the frame height at
/// `focal_length`, on the 24mm reference sensor.
#[inline]
pub fn required_distance(extent: f64, focal_length: f64) -> f64 {
    required_distance_with_sensor(extent, focal_length, SENSOR_HEIGHT_MM)
}

/// Camera-to-subject distance that makes `extent` fill the frame height.
///
/// `distance = extent / (2 * tan(fov / 2))` with
/// `fov = 2 * atan(sensor / (2 * focal))`.
pub fn required_distance_with_sensor(extent: f64, focal_length: f64, sensor_height: f64) -> f64 {
    let fov = field_of_view(focal_length, sensor_height);
    extent / (2.0 * (fov / 2.0).tan())
}

/// Visual centre of a subject: its base position raised by half its height,
/// following the subject's own orientation.
pub fn subject_center(subject: &Subject) -> Point3<f64> {
    subject.position + subject.rotation * Vector3::new(0.0, subject.size.y * 0.5, 0.0)
}

/// Rotate `point` about the vertical axis through `pivot`.
pub fn orbit_point(point: &Point3<f64>, pivot: &Point3<f64>, angle: f64) -> Point3<f64> {
    let axis_point = Point3::new(pivot.x, point.y, pivot.z);
    axis_point + yaw(angle) * (point - axis_point)
}
