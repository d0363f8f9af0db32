//! Keyframe calculator.
//!
//! Turns one [`Instruction`] into a start pose, an end pose and a way to
//! sample every pose in between.
//!
//! # Start pose
//!
//! Explicit start overrides win; otherwise the instruction's initial setup
//! frames the subject; otherwise the shot continues from the running pose.
//!
//! # End pose
//!
//! The movement is evaluated at `t = 1`, then the camera angle and shot type
//! resolvers are applied, and finally explicit end overrides replace their
//! components.
//!
//! # In between
//!
//! The movement path is sampled at the eased progress and the framing
//! correction (the difference between the movement's end and the final end
//! pose) is blended in by the same progress. Frame 0 is therefore the start
//! pose and the last frame is the end pose.
//!
//! # Constraints
//!
//! Every pose, the two keyframes included, is pushed back into the
//! instruction's distance band around the subject centre and, when the
//! subject must stay visible, turned just far enough to bring the centre
//! inside the vertical field of view. An animated subject is seen where it
//! stands at the frame being computed.

use nalgebra::{Point3, UnitQuaternion};

use super::movement::{FrameTime, MoveContext};
use super::{angle, shot};
use crate::geometry;
use crate::scene::{
    CameraPose, Constraints, DistanceRange, InitialSetup, Instruction, Movement, Subject,
    Visibility,
};

/// Resolved endpoints of one instruction.
#[derive(Debug, Clone, Copy)]
pub struct Keyframes<'a> {
    /// First pose of the shot.
    pub start: CameraPose,
    /// Last pose of the shot.
    pub end: CameraPose,
    target: CameraPose,
    movement_end: CameraPose,
    movement: &'a Movement,
    constraints: &'a Constraints,
    context: MoveContext<'a>,
    static_hold: bool,
}

/// Resolve the keyframes of `instruction`, continuing from `running`.
///
/// `subject` is the instruction's framed subject (already looked up) and
/// `seed` drives any handheld jitter.
pub fn compute_keyframes<'a>(
    instruction: &'a Instruction,
    running: &CameraPose,
    subject: Option<&'a Subject>,
    seed: u64,
) -> Keyframes<'a> {
    let context = MoveContext::new(subject, seed);
    let constraints = &instruction.constraints;
    let last = FrameTime::end(instruction.frame_count);
    let first_subject = subject.map(|s| s.at_frame(0));
    let last_subject = subject.map(|s| s.at_frame(last.frame));

    let framed = match &instruction.initial_setup {
        Some(setup) => setup_pose(setup, first_subject.as_ref(), running),
        None => *running,
    };
    let start = instruction.start.apply(framed);
    let start = constrain(start, constraints, first_subject.as_ref(), true);

    let movement_end = instruction.movement.apply(&start, &context, last);
    let end_subject = last_subject.as_ref();
    let target = angle::apply_camera_angle(instruction.camera_angle, end_subject, movement_end);
    let target = shot::apply_shot_type(instruction.shot_type, end_subject, target);
    let target = instruction.end.apply(target);
    let end = constrain(target, constraints, end_subject, last.frame == 0);

    Keyframes {
        start,
        end,
        target,
        movement_end,
        movement: &instruction.movement,
        constraints,
        context,
        static_hold: instruction.is_static_hold(),
    }
}

impl Keyframes<'_> {
    /// Whether every frame equals the start pose.
    pub fn is_static(&self) -> bool {
        self.static_hold
    }

    /// The pose at `time`.
    pub fn sample(&self, time: FrameTime) -> CameraPose {
        if self.static_hold {
            return self.start;
        }
        let pose = if self.movement.is_empty() {
            self.start.interpolate(&self.target, time.eased)
        } else {
            self.along_movement(time)
        };
        if self.constraints.is_empty() {
            return pose;
        }
        let subject = self.context.subject.map(|s| s.at_frame(time.frame));
        constrain(pose, self.constraints, subject.as_ref(), time.frame == 0)
    }

    fn along_movement(&self, time: FrameTime) -> CameraPose {
        let t = time.eased;
        let moved = self.movement.apply(&self.start, &self.context, time);
        let correction = self.movement_end.orientation.rotation_to(&self.target.orientation);
        let correction =
            geometry::slerp_orientation(&UnitQuaternion::identity(), &correction, t);
        CameraPose {
            position: moved.position + (self.target.position - self.movement_end.position) * t,
            orientation: correction * moved.orientation,
            focal_length: moved.focal_length
                + (self.target.focal_length - self.movement_end.focal_length) * t,
            aspect_ratio: self.start.aspect_ratio,
        }
    }
}

/// Apply `constraints` to `pose` against `subject` as it stands on this
/// frame. `first_frame` enables the start-only visibility rule.
fn constrain(
    mut pose: CameraPose,
    constraints: &Constraints,
    subject: Option<&Subject>,
    first_frame: bool,
) -> CameraPose {
    let Some(subject) = subject else {
        return pose;
    };
    let center = subject.center();
    if let Some(range) = &constraints.distance {
        pose.position = clamp_distance(&pose.position, &center, range);
    }
    let in_view = match constraints.visibility {
        Some(Visibility::VisibleAtAllTimes) => true,
        Some(Visibility::VisibleAtStart) => first_frame,
        None => false,
    };
    if in_view {
        pose.orientation = keep_in_view(&pose, &center);
    }
    pose
}

/// Move `position` along its bearing from `center` into `range`.
pub fn clamp_distance(
    position: &Point3<f64>,
    center: &Point3<f64>,
    range: &DistanceRange,
) -> Point3<f64> {
    let offset = position - center;
    let distance = offset.norm();
    if distance <= geometry::EPSILON {
        log::warn!("camera sits on the subject centre; distance limits not applied");
        return *position;
    }
    let clamped = distance.max(range.min_distance).min(range.max_distance);
    if clamped == distance {
        return *position;
    }
    log::trace!("distance {distance} clamped to {clamped}");
    center + offset * (clamped / distance)
}

/// The smallest turn of `pose` that brings `target` inside the vertical
/// field of view.
pub fn keep_in_view(pose: &CameraPose, target: &Point3<f64>) -> UnitQuaternion<f64> {
    let Some(toward) = geometry::direction(&pose.position, target) else {
        return pose.orientation;
    };
    let forward = pose.forward();
    let half = pose.field_of_view() / 2.0;
    let angle = forward.angle(&toward);
    if angle <= half {
        return pose.orientation;
    }
    match UnitQuaternion::rotation_between(&forward, &toward) {
        Some(turn) => {
            let excess = (angle - half) / angle;
            geometry::slerp_orientation(&UnitQuaternion::identity(), &turn, excess) * pose.orientation
        }
        None => geometry::look_at_or(&pose.position, target, &pose.orientation),
    }
}

/// Start pose from an initial setup.
///
/// The camera is placed `distance` away on the requested side of the subject
/// (or of the world origin without one), raised by the vertical angle, then
/// optionally moved to a shot size and finally aimed at the focus point.
pub fn setup_pose(setup: &InitialSetup, subject: Option<&Subject>, running: &CameraPose) -> CameraPose {
    let (anchor, side) = match subject {
        Some(s) => (s.center(), s.rotation * setup.subject_view.direction()),
        None => (Point3::origin(), setup.subject_view.direction()),
    };
    let rise = geometry::world_up() * (setup.vertical_angle.height_factor() * setup.distance);
    let position = anchor + side * setup.distance + rise;

    let mut pose = CameraPose {
        position,
        orientation: geometry::look_at_or(&position, &anchor, &running.orientation),
        ..*running
    };
    if let Some(size) = setup.shot_size {
        pose = shot::apply_shot_type(Some(size), subject, pose);
    }
    if let Some(focus) = setup.focus_point {
        pose.orientation = geometry::look_at_or(&pose.position, &focus, &pose.orientation);
    }
    log::trace!("initial setup placed camera at {:?}", pose.position);
    pose
}
