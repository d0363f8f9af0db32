//! Movement resolver.
//!
//! Every slot kind implements [`Recipe`]: given the pose produced by the
//! earlier slots at the same instant, it returns the pose after its own
//! contribution. Every recipe is the identity at `t = 0`, so the first frame
//! of a moving shot is always its start pose.
//!
//! | Slot | Kind | Full-scale move |
//! |------|------|-----------------|
//! | translation | truck left/right | 2 units along camera right |
//! | translation | pedestal up/down | 2 units along world up |
//! | distance | dolly in/out | 3 units toward the subject centre |
//! | rotation | pan left/right | 90° yaw |
//! | rotation | arc left/right | 90° orbit about the subject |
//! | rotation | whip pan left/right | 180° yaw, eased in-out quint |
//! | tilt | tilt up/down | 90° pitch |
//! | zoom | zoom in/out | ±35 mm (floor 12 mm) |
//! | rig | crane, tracking, drone, handheld, steadicam | see [`RigKind`] |

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::easing::Easing;
use crate::geometry::{self, world_up, EPSILON};
use crate::scene::{
    CameraPose, DistanceKind, Movement, MovementStep, RigKind, RotationKind, Subject, TiltKind,
    TranslationKind, ZoomKind,
};

/// Full-scale truck and pedestal distance.
pub const TRANSLATION_DISTANCE: f64 = 2.0;
/// Full-scale dolly distance.
pub const DOLLY_DISTANCE: f64 = 3.0;
/// A dolly in never gets closer than this fraction of the starting distance.
pub const DOLLY_MIN_FRACTION: f64 = 0.1;
/// Full-scale focal length change.
pub const ZOOM_RANGE: f64 = 35.0;
/// Shortest focal length a zoom out reaches.
pub const MIN_FOCAL_LENGTH: f64 = 12.0;
/// Handheld position jitter amplitude.
pub const HANDHELD_POSITION_JITTER: f64 = 0.025;
/// Handheld rotation jitter amplitude (radians).
pub const HANDHELD_ROTATION_JITTER: f64 = 0.0025;
/// Steadicam drift toward the subject at full scale.
pub const STEADICAM_DRIFT: f64 = 0.1;

/// The instant a recipe is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Frame index within the instruction.
    pub frame: usize,
    /// Linear progress in `[0, 1]`.
    pub raw: f64,
    /// Eased progress.
    pub eased: f64,
}

impl FrameTime {
    /// Progress of `frame` out of `frame_count`, eased with `easing`.
    ///
    /// `t = frame / (frame_count - 1)`; a single-frame instruction is at `t = 0`.
    pub fn at(frame: usize, frame_count: usize, easing: Easing) -> Self {
        let raw = if frame_count > 1 {
            (frame as f64 / (frame_count - 1) as f64).min(1.0)
        } else {
            0.0
        };
        Self {
            frame,
            raw,
            eased: easing.apply(raw),
        }
    }

    /// The last frame of a `frame_count`-frame shot, at exactly `t = 1`.
    pub fn end(frame_count: usize) -> Self {
        Self {
            frame: frame_count.saturating_sub(1),
            raw: 1.0,
            eased: 1.0,
        }
    }

    /// The same instant with a different easing curve.
    pub fn reeased(self, easing: Easing) -> Self {
        Self {
            eased: easing.apply(self.raw),
            ..self
        }
    }
}

/// What a recipe may depend on besides the pose.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveContext<'a> {
    /// The framed subject, if any.
    pub subject: Option<&'a Subject>,
    /// Seed of the handheld jitter.
    pub seed: u64,
}

impl<'a> MoveContext<'a> {
    /// Create a context.
    pub fn new(subject: Option<&'a Subject>, seed: u64) -> Self {
        Self { subject, seed }
    }

    /// The subject where it stands at `frame`, if it moves.
    pub fn posed_subject(&self, frame: usize) -> Option<Subject> {
        self.subject
            .filter(|s| s.is_animated())
            .map(|s| s.at_frame(frame))
    }
}

/// A movement kind's transform.
pub trait Recipe {
    /// The pose after this recipe's contribution at `time`, scaled by
    /// `scale` (0.3, 0.6 or 1.0).
    fn apply(
        &self,
        pose: &CameraPose,
        ctx: &MoveContext<'_>,
        time: FrameTime,
        scale: f64,
    ) -> CameraPose;

    /// Easing that replaces the instruction's easing for this recipe.
    fn easing_override(&self) -> Option<Easing> {
        None
    }

    /// Whether the recipe does nothing without a subject.
    fn requires_subject(&self) -> bool {
        false
    }
}

impl<K: Recipe> MovementStep<K> {
    /// Apply the step at `time`.
    pub fn apply(&self, pose: &CameraPose, ctx: &MoveContext<'_>, time: FrameTime) -> CameraPose {
        if self.kind.requires_subject() && ctx.subject.is_none() {
            log::trace!("movement step skipped: no subject");
            return *pose;
        }
        let time = match self.kind.easing_override() {
            Some(easing) => time.reeased(easing),
            None => time,
        };
        self.kind.apply(pose, ctx, time, self.scale.factor())
    }
}

fn apply_slot<K: Recipe>(
    step: &Option<MovementStep<K>>,
    pose: CameraPose,
    ctx: &MoveContext<'_>,
    time: FrameTime,
) -> CameraPose {
    match step {
        Some(step) => step.apply(&pose, ctx, time),
        None => pose,
    }
}

impl Movement {
    /// Apply every filled slot to `pose` at `time`, in slot order.
    ///
    /// An animated subject is seen where it stands at `time.frame`.
    pub fn apply(&self, pose: &CameraPose, ctx: &MoveContext<'_>, time: FrameTime) -> CameraPose {
        let posed = ctx.posed_subject(time.frame);
        let ctx = &MoveContext {
            subject: posed.as_ref().or(ctx.subject),
            seed: ctx.seed,
        };
        let pose = apply_slot(&self.translation, *pose, ctx, time);
        let pose = apply_slot(&self.distance, pose, ctx, time);
        let pose = apply_slot(&self.rotation, pose, ctx, time);
        let pose = apply_slot(&self.tilt, pose, ctx, time);
        let pose = apply_slot(&self.zoom, pose, ctx, time);
        apply_slot(&self.rig, pose, ctx, time)
    }
}

impl Recipe for TranslationKind {
    fn apply(&self, pose: &CameraPose, _: &MoveContext<'_>, time: FrameTime, scale: f64) -> CameraPose {
        let amount = TRANSLATION_DISTANCE * scale * time.eased;
        let offset = match self {
            TranslationKind::TruckLeft => -pose.right() * amount,
            TranslationKind::TruckRight => pose.right() * amount,
            TranslationKind::PedestalUp => world_up() * amount,
            TranslationKind::PedestalDown => -world_up() * amount,
        };
        CameraPose {
            position: pose.position + offset,
            ..*pose
        }
    }
}

impl Recipe for DistanceKind {
    fn apply(&self, pose: &CameraPose, ctx: &MoveContext<'_>, time: FrameTime, scale: f64) -> CameraPose {
        let Some(subject) = ctx.subject else {
            return *pose;
        };
        let center = subject.center();
        let Some(toward) = geometry::direction(&pose.position, &center) else {
            log::warn!("dolly from the subject centre has no direction; holding position");
            return *pose;
        };
        let mut amount = DOLLY_DISTANCE * scale * time.eased;
        if *self == DistanceKind::DollyIn {
            let limit = (center - pose.position).norm() * (1.0 - DOLLY_MIN_FRACTION);
            amount = amount.min(limit);
        } else {
            amount = -amount;
        }
        CameraPose {
            position: pose.position + toward * amount,
            ..*pose
        }
    }

    fn requires_subject(&self) -> bool {
        true
    }
}

impl Recipe for RotationKind {
    fn apply(&self, pose: &CameraPose, ctx: &MoveContext<'_>, time: FrameTime, scale: f64) -> CameraPose {
        let quarter = FRAC_PI_2 * scale * time.eased;
        match self {
            RotationKind::PanLeft => yawed(pose, quarter),
            RotationKind::PanRight => yawed(pose, -quarter),
            RotationKind::WhipPanLeft => yawed(pose, 2.0 * quarter),
            RotationKind::WhipPanRight => yawed(pose, -2.0 * quarter),
            RotationKind::ArcLeft | RotationKind::ArcRight => {
                let Some(subject) = ctx.subject else {
                    return *pose;
                };
                // Positive yaw carries a camera in front of the subject to its right.
                let angle = if *self == RotationKind::ArcLeft { -quarter } else { quarter };
                CameraPose {
                    position: geometry::orbit_point(&pose.position, &subject.position, angle),
                    orientation: geometry::yaw(angle) * pose.orientation,
                    ..*pose
                }
            }
        }
    }

    fn easing_override(&self) -> Option<Easing> {
        match self {
            RotationKind::WhipPanLeft | RotationKind::WhipPanRight => Some(Easing::EaseInOutQuint),
            _ => None,
        }
    }

    fn requires_subject(&self) -> bool {
        matches!(self, RotationKind::ArcLeft | RotationKind::ArcRight)
    }
}

fn yawed(pose: &CameraPose, angle: f64) -> CameraPose {
    CameraPose {
        orientation: geometry::yaw(angle) * pose.orientation,
        ..*pose
    }
}

impl Recipe for TiltKind {
    fn apply(&self, pose: &CameraPose, _: &MoveContext<'_>, time: FrameTime, scale: f64) -> CameraPose {
        let angle = FRAC_PI_2 * scale * time.eased;
        let angle = match self {
            TiltKind::TiltUp => angle,
            TiltKind::TiltDown => -angle,
        };
        let pitch = UnitQuaternion::from_axis_angle(&pose.right_axis(), angle);
        CameraPose {
            orientation: pitch * pose.orientation,
            ..*pose
        }
    }
}

impl Recipe for ZoomKind {
    fn apply(&self, pose: &CameraPose, _: &MoveContext<'_>, time: FrameTime, scale: f64) -> CameraPose {
        let delta = ZOOM_RANGE * scale * time.eased;
        let focal_length = match self {
            ZoomKind::ZoomIn => pose.focal_length + delta,
            ZoomKind::ZoomOut => (pose.focal_length - delta).max(MIN_FOCAL_LENGTH.min(pose.focal_length)),
        };
        CameraPose {
            focal_length,
            ..*pose
        }
    }
}

impl Recipe for RigKind {
    fn apply(&self, pose: &CameraPose, ctx: &MoveContext<'_>, time: FrameTime, scale: f64) -> CameraPose {
        let e = time.eased;
        // Rigs scale with the subject; without one they use a unit box.
        let size = ctx.subject.map_or(Vector3::new(1.0, 1.0, 1.0), |s| s.size);

        match self {
            RigKind::CraneJib => {
                let mut position = pose.position + world_up() * (2.0 * size.y * scale * e);
                if let Some(inward) = ctx.subject.and_then(|s| horizontal_direction(&pose.position, &s.center())) {
                    position += inward * (size.z * scale * e);
                }
                locked(pose, ctx, position, e)
            }
            RigKind::TrackingShot => {
                let position = pose.position + pose.right() * (2.0 * size.x * scale * e);
                locked(pose, ctx, position, e)
            }
            RigKind::DroneShot => {
                let outward = ctx
                    .subject
                    .and_then(|s| horizontal_direction(&s.center(), &pose.position))
                    .or_else(|| horizontal(-pose.forward()))
                    .unwrap_or_else(Vector3::z);
                let drift = (2.0 * PI * e).sin() * 0.1 * size.y * scale;
                let position = pose.position
                    + world_up() * (5.0 * size.y * scale * e)
                    + outward * (2.0 * size.y * scale * e)
                    + pose.right() * drift;
                locked(pose, ctx, position, e)
            }
            RigKind::Handheld => handheld(pose, ctx, time, scale),
            RigKind::Steadicam => {
                let Some(subject) = ctx.subject else {
                    return *pose;
                };
                let center = subject.center();
                let drift = STEADICAM_DRIFT * scale * e;
                let position = geometry::lerp_point(&pose.position, &center, drift);
                let aim = geometry::look_at_or(&position, &center, &pose.orientation);
                CameraPose {
                    position,
                    orientation: geometry::slerp_orientation(&pose.orientation, &aim, drift),
                    ..*pose
                }
            }
        }
    }

    fn requires_subject(&self) -> bool {
        matches!(self, RigKind::TrackingShot | RigKind::Steadicam)
    }
}

fn horizontal(v: Vector3<f64>) -> Option<Vector3<f64>> {
    let flat = Vector3::new(v.x, 0.0, v.z);
    let len = flat.norm();
    (len > EPSILON).then(|| flat / len)
}

fn horizontal_direction(from: &Point3<f64>, to: &Point3<f64>) -> Option<Vector3<f64>> {
    horizontal(to - from)
}

/// Move to `position` while turning to hold the subject centre.
///
/// The offset between the entry orientation and a true look-at is kept at
/// `t = 0` and blended away by `t = 1`, so the move starts exactly on the
/// entry pose and ends fully locked on.
fn locked(entry: &CameraPose, ctx: &MoveContext<'_>, position: Point3<f64>, t: f64) -> CameraPose {
    let orientation = match ctx.subject {
        Some(subject) => {
            let center = subject.center();
            let up = world_up();
            match (
                geometry::look_at(&entry.position, &center, &up),
                geometry::look_at(&position, &center, &up),
            ) {
                (Some(entry_aim), Some(aim)) => {
                    let offset = entry_aim.inverse() * entry.orientation;
                    aim * geometry::slerp_orientation(&offset, &UnitQuaternion::identity(), t)
                }
                _ => {
                    log::warn!("lock-on through the subject centre; keeping orientation");
                    entry.orientation
                }
            }
        }
        None => entry.orientation,
    };
    CameraPose {
        position,
        orientation,
        ..*entry
    }
}

fn handheld(pose: &CameraPose, ctx: &MoveContext<'_>, time: FrameTime, scale: f64) -> CameraPose {
    if time.raw <= 0.0 || time.raw >= 1.0 {
        return *pose;
    }
    let envelope = (PI * time.raw).sin() * scale;
    let frame_seed = ctx.seed ^ (time.frame as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    let mut rng = StdRng::seed_from_u64(frame_seed);
    let mut jitter = |amplitude: f64| (rng.random::<f64>() * 2.0 - 1.0) * amplitude * envelope;

    let offset = Vector3::new(
        jitter(HANDHELD_POSITION_JITTER),
        jitter(HANDHELD_POSITION_JITTER),
        jitter(HANDHELD_POSITION_JITTER),
    );
    let shake = UnitQuaternion::from_euler_angles(
        jitter(HANDHELD_ROTATION_JITTER),
        jitter(HANDHELD_ROTATION_JITTER),
        jitter(HANDHELD_ROTATION_JITTER),
    );
    CameraPose {
        position: pose.position + offset,
        orientation: pose.orientation * shake,
        ..*pose
    }
}
