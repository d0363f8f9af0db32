//! Resolution of symbolic instructions into concrete camera poses.
//!
//! # Resolvers
//!
//! - [`shot`]: places the camera for a [`ShotType`](crate::scene::ShotType)
//! - [`angle`]: places and aims the camera for a
//!   [`CameraAngle`](crate::scene::CameraAngle)
//! - [`movement`]: moves the camera along a
//!   [`Movement`](crate::scene::Movement) as progress runs from 0 to 1
//! - [`keyframes`]: combines the three into start and end poses, samples
//!   the frames between them and holds every frame to the instruction's
//!   distance and visibility limits
//!
//! Every resolver is a pure function of its inputs. A missing subject or a
//! missing descriptor leaves the pose unchanged.

pub mod angle;
pub mod keyframes;
pub mod movement;
pub mod shot;

pub use angle::apply_camera_angle;
pub use keyframes::{compute_keyframes, Keyframes};
pub use movement::{FrameTime, MoveContext, Recipe};
pub use shot::apply_shot_type;
