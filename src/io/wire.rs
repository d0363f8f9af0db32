//! Serde adapters for the JSON interchange shapes.
//!
//! Points, vectors and Euler angles are written as `{ "x", "y", "z" }`
//! objects. Orientations travel as XYZ Euler angles in radians (see
//! [`CameraPose::euler`](crate::scene::CameraPose::euler)).

use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geometry;
use crate::scene::CameraPose;

/// A `{x, y, z}` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl From<Point3<f64>> for Xyz {
    fn from(p: Point3<f64>) -> Self {
        Xyz { x: p.x, y: p.y, z: p.z }
    }
}

impl From<Vector3<f64>> for Xyz {
    fn from(v: Vector3<f64>) -> Self {
        Xyz { x: v.x, y: v.y, z: v.z }
    }
}

impl From<Xyz> for Point3<f64> {
    fn from(v: Xyz) -> Self {
        Point3::new(v.x, v.y, v.z)
    }
}

impl From<Xyz> for Vector3<f64> {
    fn from(v: Xyz) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

/// Orientation as XYZ Euler angles.
pub fn euler_of(q: &UnitQuaternion<f64>) -> Xyz {
    let (x, y, z) = q.euler_angles();
    Xyz { x, y, z }
}

/// Orientation from XYZ Euler angles.
pub fn from_euler(e: Xyz) -> UnitQuaternion<f64> {
    UnitQuaternion::from_euler_angles(e.x, e.y, e.z)
}

pub(crate) fn identity_rotation() -> UnitQuaternion<f64> {
    UnitQuaternion::identity()
}

pub(crate) mod point {
    use super::*;

    pub fn serialize<S: Serializer>(p: &Point3<f64>, s: S) -> Result<S::Ok, S::Error> {
        Xyz::from(*p).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Point3<f64>, D::Error> {
        Xyz::deserialize(d).map(Point3::from)
    }
}

pub(crate) mod opt_point {
    use super::*;

    pub fn serialize<S: Serializer>(p: &Option<Point3<f64>>, s: S) -> Result<S::Ok, S::Error> {
        p.map(Xyz::from).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Point3<f64>>, D::Error> {
        Option::<Xyz>::deserialize(d).map(|v| v.map(Point3::from))
    }
}

pub(crate) mod vector {
    use super::*;

    pub fn serialize<S: Serializer>(v: &Vector3<f64>, s: S) -> Result<S::Ok, S::Error> {
        Xyz::from(*v).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vector3<f64>, D::Error> {
        Xyz::deserialize(d).map(Vector3::from)
    }
}

pub(crate) mod rotation {
    use super::*;

    pub fn serialize<S: Serializer>(q: &UnitQuaternion<f64>, s: S) -> Result<S::Ok, S::Error> {
        euler_of(q).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<UnitQuaternion<f64>, D::Error> {
        Xyz::deserialize(d).map(from_euler)
    }
}

/// Interchange form of one camera frame.
///
/// Both `rotation` and `lookAt` are written; on input `rotation` wins and
/// `lookAt` is used when only a target point is given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    /// Camera position.
    pub position: Xyz,
    /// Orientation as XYZ Euler angles (radians).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Xyz>,
    /// A point one unit in front of the camera.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_at: Option<Xyz>,
    /// Focal length in millimetres.
    pub focal_length: f64,
    /// Width over height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
}

impl From<CameraPose> for FrameRecord {
    fn from(pose: CameraPose) -> Self {
        FrameRecord {
            position: pose.position.into(),
            rotation: Some(euler_of(&pose.orientation)),
            look_at: Some(pose.look_target(1.0).into()),
            focal_length: pose.focal_length,
            aspect_ratio: pose.aspect_ratio,
        }
    }
}

impl From<FrameRecord> for CameraPose {
    fn from(record: FrameRecord) -> Self {
        let position = Point3::from(record.position);
        let orientation = match (record.rotation, record.look_at) {
            (Some(euler), _) => from_euler(euler),
            (None, Some(target)) => geometry::look_at_or(
                &position,
                &Point3::from(target),
                &UnitQuaternion::identity(),
            ),
            (None, None) => UnitQuaternion::identity(),
        };
        CameraPose {
            position,
            orientation,
            focal_length: record.focal_length,
            aspect_ratio: record.aspect_ratio,
        }
    }
}
