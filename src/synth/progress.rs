//! Progress reporting for synthesis runs.
//!
//! A run moves through [`SynthesisState::Idle`], then
//! [`SynthesisState::Running`] once per emitted frame, then
//! [`SynthesisState::Done`]. Each transition is forwarded to a [`Progress`]
//! callback as `(current, total, message)`, where every instruction counts
//! for 1000 steps of `total`.
//!
//! # Example
//!
//! ```
//! use cinecam::synth::{synthesize_with_progress, Progress, SynthesisOptions};
//! use cinecam::scene::{CameraPose, Instruction};
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{current}/{total}] {message}");
//! });
//!
//! let frames = synthesize_with_progress(
//!     &[],
//!     &[Instruction::new(10)],
//!     &CameraPose::default(),
//!     &SynthesisOptions::default(),
//!     &progress,
//! )
//! .unwrap();
//! assert_eq!(frames.len(), 10);
//! ```

/// Where a synthesis run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisState {
    /// Validated, nothing emitted yet.
    Idle,
    /// Emitting the frames of one instruction.
    Running {
        /// Index of the instruction.
        instruction: usize,
        /// Frames of this instruction emitted so far.
        frame: usize,
        /// Frames this instruction will emit.
        frame_count: usize,
    },
    /// Every frame has been emitted.
    Done,
}

/// A callback that receives updates while frames are synthesized.
///
/// The callback receives:
/// - `current`: steps completed
/// - `total`: total number of steps
/// - `message`: what is happening
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a progress reporter from a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report progress inside step `range_current` of `range_total`.
    ///
    /// Each step is split into 1000 parts, so `total` becomes
    /// `range_total * 1000`.
    #[inline]
    pub fn report_sub(
        &self,
        sub_current: usize,
        sub_total: usize,
        range_current: usize,
        range_total: usize,
        message: &str,
    ) {
        if sub_total == 0 || range_total == 0 {
            return;
        }
        let sub_fraction = (sub_current.min(sub_total) * 1000) / sub_total;
        (self.callback)(range_current * 1000 + sub_fraction, range_total * 1000, message);
    }

    /// Report a state transition of a run over `instruction_count`
    /// instructions, in the same units as [`Progress::report_sub`].
    pub fn report_state(&self, state: SynthesisState, instruction_count: usize) {
        let total = instruction_count * 1000;
        match state {
            SynthesisState::Idle => self.report(0, total, "idle"),
            SynthesisState::Running {
                instruction,
                frame,
                frame_count,
            } => self.report_sub(frame, frame_count, instruction, instruction_count, "synthesizing"),
            SynthesisState::Done => self.report(total, total, "done"),
        }
    }

    /// A reporter that discards every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
