//! Frame synthesizer.
//!
//! Folds a list of [`Instruction`]s into one ordered sequence of
//! [`CameraPose`]s. Inputs are validated before any frame is produced; after
//! that synthesis cannot fail.
//!
//! With the default [`Continuity::Threaded`] strategy each instruction starts
//! from the last frame the previous one emitted, so the output has no jumps
//! unless an instruction asks for one with a start override or initial
//! setup. [`Continuity::Blended`] instead computes every instruction from the
//! initial pose and inserts interpolated transition frames between them.
//!
//! # Example
//!
//! ```
//! use cinecam::prelude::*;
//!
//! let subjects = Subject::default_set();
//! let instructions = vec![
//!     Instruction::new(24),
//!     Instruction::new(48)
//!         .with_subject(0)
//!         .with_easing(Easing::EaseInOutCubic)
//!         .with_shot_type(ShotType::CloseUp),
//! ];
//!
//! let frames = synthesize(&subjects, &instructions, &CameraPose::default()).unwrap();
//! assert_eq!(frames.len(), 72);
//! ```

mod progress;

pub use progress::{Progress, SynthesisState};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CameraError, Result};
use crate::resolve::{compute_keyframes, FrameTime};
use crate::scene::{CameraPose, Instruction, Subject};

/// Default number of blended frames between two instructions.
pub const DEFAULT_TRANSITION_FRAMES: usize = 20;

fn default_transition_frames() -> usize {
    DEFAULT_TRANSITION_FRAMES
}

/// How consecutive instructions are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum Continuity {
    /// Each instruction continues from the previous one's last frame.
    #[default]
    Threaded,
    /// Each instruction starts from the initial pose; blocks are joined by
    /// interpolated transition frames.
    Blended {
        /// Frames inserted between two blocks.
        #[serde(rename = "transitionFrames", default = "default_transition_frames")]
        transition_frames: usize,
    },
}

/// Options for frame synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesisOptions {
    /// How instructions are joined.
    pub continuity: Continuity,

    /// Seed of handheld jitter. The same seed always yields the same frames.
    pub seed: u64,

    /// Whether batch synthesis runs scenes in parallel (default: true).
    pub parallel: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            continuity: Continuity::Threaded,
            seed: 0,
            parallel: true,
        }
    }
}

impl SynthesisOptions {
    /// Set the continuity strategy.
    pub fn with_continuity(mut self, continuity: Continuity) -> Self {
        self.continuity = continuity;
        self
    }

    /// Join instructions with `transition_frames` blended frames.
    pub fn blended(mut self, transition_frames: usize) -> Self {
        self.continuity = Continuity::Blended { transition_frames };
        self
    }

    /// Set the jitter seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// One independent synthesis job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Subjects instructions may frame.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// The shots, in order.
    pub instructions: Vec<Instruction>,
    /// Pose before the first instruction.
    #[serde(default)]
    pub initial_pose: CameraPose,
}

impl Scene {
    /// A scene starting from the default camera pose.
    pub fn new(subjects: Vec<Subject>, instructions: Vec<Instruction>) -> Self {
        Self {
            subjects,
            instructions,
            initial_pose: CameraPose::default(),
        }
    }

    /// Set the initial pose.
    pub fn with_initial_pose(mut self, pose: CameraPose) -> Self {
        self.initial_pose = pose;
        self
    }

    /// Synthesize this scene's frames.
    pub fn synthesize(&self, options: &SynthesisOptions) -> Result<Vec<CameraPose>> {
        synthesize_with_options(&self.subjects, &self.instructions, &self.initial_pose, options)
    }
}

/// Check subjects, the initial pose and every instruction.
pub fn validate(subjects: &[Subject], instructions: &[Instruction], initial: &CameraPose) -> Result<()> {
    for (index, subject) in subjects.iter().enumerate() {
        subject.validate(index)?;
    }
    if !initial.is_finite() {
        return Err(CameraError::non_finite("initial pose"));
    }
    for (index, instruction) in instructions.iter().enumerate() {
        instruction.validate(index, subjects.len(), 1)?;
    }
    Ok(())
}

/// Synthesize frames with default options.
///
/// Returns one pose per frame of every instruction, in order. An empty
/// instruction list yields no frames.
///
/// # Errors
///
/// Fails before producing anything if an instruction has zero frames,
/// references a missing subject or holds non-finite values, if a subject is
/// invalid, or if the initial pose is not finite.
pub fn synthesize(
    subjects: &[Subject],
    instructions: &[Instruction],
    initial: &CameraPose,
) -> Result<Vec<CameraPose>> {
    synthesize_internal(subjects, instructions, initial, &SynthesisOptions::default(), None)
}

/// Synthesize frames with explicit options.
pub fn synthesize_with_options(
    subjects: &[Subject],
    instructions: &[Instruction],
    initial: &CameraPose,
    options: &SynthesisOptions,
) -> Result<Vec<CameraPose>> {
    synthesize_internal(subjects, instructions, initial, options, None)
}

/// Synthesize frames, reporting progress.
pub fn synthesize_with_progress(
    subjects: &[Subject],
    instructions: &[Instruction],
    initial: &CameraPose,
    options: &SynthesisOptions,
    progress: &Progress,
) -> Result<Vec<CameraPose>> {
    synthesize_internal(subjects, instructions, initial, options, Some(progress))
}

/// Synthesize many independent scenes, in parallel when
/// [`SynthesisOptions::parallel`] is set. Results keep the input order.
pub fn synthesize_batch(scenes: &[Scene], options: &SynthesisOptions) -> Vec<Result<Vec<CameraPose>>> {
    let run = |scene: &Scene| scene.synthesize(options);
    if options.parallel {
        scenes.par_iter().map(run).collect()
    } else {
        scenes.iter().map(run).collect()
    }
}

/// Every frame of one instruction, starting from `running`.
pub fn instruction_frames(
    instruction: &Instruction,
    running: &CameraPose,
    subject: Option<&Subject>,
    seed: u64,
) -> Vec<CameraPose> {
    block_frames(instruction, running, subject, seed, |_| {})
}

/// Like [`instruction_frames`], calling `emitted` with the number of frames
/// produced so far after each one.
fn block_frames(
    instruction: &Instruction,
    running: &CameraPose,
    subject: Option<&Subject>,
    seed: u64,
    mut emitted: impl FnMut(usize),
) -> Vec<CameraPose> {
    let keyframes = compute_keyframes(instruction, running, subject, seed);
    let n = instruction.frame_count;
    (0..n)
        .map(|frame| {
            let pose = keyframes.sample(FrameTime::at(frame, n, instruction.easing));
            emitted(frame + 1);
            pose
        })
        .collect()
}

/// Jitter seed of the instruction at `index`.
pub fn instruction_seed(seed: u64, index: usize) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(0x2545_F491_4F6C_DD1D))
}

fn synthesize_internal(
    subjects: &[Subject],
    instructions: &[Instruction],
    initial: &CameraPose,
    options: &SynthesisOptions,
    progress: Option<&Progress>,
) -> Result<Vec<CameraPose>> {
    validate(subjects, instructions, initial)?;

    let total = instructions.len();
    if let Some(p) = progress {
        p.report_state(SynthesisState::Idle, total);
    }

    let run = |index: usize, instruction: &Instruction, running: &CameraPose| {
        let subject = instruction.subject_index.and_then(|i| subjects.get(i));
        log::debug!(
            "instruction {index}: {} frames, subject {:?}, {:?}",
            instruction.frame_count,
            instruction.subject_index,
            instruction.easing
        );
        let seed = instruction_seed(options.seed, index);
        block_frames(instruction, running, subject, seed, |frame| {
            if let Some(p) = progress {
                p.report_state(
                    SynthesisState::Running {
                        instruction: index,
                        frame,
                        frame_count: instruction.frame_count,
                    },
                    total,
                );
            }
        })
    };

    let capacity: usize = instructions.iter().map(|i| i.frame_count).sum();
    let frames = match options.continuity {
        Continuity::Threaded => {
            let (frames, _) = instructions.iter().enumerate().fold(
                (Vec::with_capacity(capacity), *initial),
                |(mut frames, running), (index, instruction)| {
                    let block = run(index, instruction, &running);
                    let next = block.last().copied().unwrap_or(running);
                    frames.extend(block);
                    (frames, next)
                },
            );
            frames
        }
        Continuity::Blended { transition_frames } => {
            let mut frames: Vec<CameraPose> =
                Vec::with_capacity(capacity + transition_frames * total.saturating_sub(1));
            for (index, instruction) in instructions.iter().enumerate() {
                let block = run(index, instruction, initial);
                if let (Some(from), Some(to)) = (frames.last().copied(), block.first()) {
                    frames.extend(transition(&from, to, transition_frames));
                }
                frames.extend(block);
            }
            frames
        }
    };

    if let Some(p) = progress {
        p.report_state(SynthesisState::Done, total);
    }
    log::debug!("synthesized {} frames from {total} instructions", frames.len());
    Ok(frames)
}

/// `count` poses strictly between `from` and `to`.
fn transition<'a>(
    from: &'a CameraPose,
    to: &'a CameraPose,
    count: usize,
) -> impl Iterator<Item = CameraPose> + 'a {
    let steps = (count + 1) as f64;
    (1..=count).map(move |j| from.interpolate(to, j as f64 / steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::scene::{
        CameraAngle, Movement, MovementScale, RigKind, RotationKind, ShotType, TranslationKind,
        ZoomKind,
    };
    use nalgebra::{Point3, Vector3};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn subjects() -> Vec<Subject> {
        vec![
            Subject::new(Point3::origin(), Vector3::new(1.0, 2.0, 1.0)).unwrap(),
            Subject::new(Point3::new(3.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)).unwrap(),
        ]
    }

    fn program() -> Vec<Instruction> {
        vec![
            Instruction::new(20)
                .with_subject(0)
                .with_movement(Movement::new().with_rotation(RotationKind::ArcLeft, MovementScale::Medium)),
            Instruction::new(15)
                .with_subject(1)
                .with_easing(Easing::EaseInOutCubic)
                .with_camera_angle(CameraAngle::LowAngle)
                .with_shot_type(ShotType::MediumShot),
            Instruction::new(10).with_movement(
                Movement::new()
                    .with_translation(TranslationKind::PedestalUp, MovementScale::Short)
                    .with_zoom(ZoomKind::ZoomIn, MovementScale::Full)
                    .with_rig(RigKind::Handheld, MovementScale::Full),
            ),
        ]
    }

    #[test]
    fn test_empty_program() {
        let frames = synthesize(&subjects(), &[], &CameraPose::default()).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_frame_count_is_sum() {
        let frames = synthesize(&subjects(), &program(), &CameraPose::default()).unwrap();
        assert_eq!(frames.len(), 45);
        assert!(frames.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_first_frame_is_initial_pose() {
        let initial = CameraPose::looking_at(Point3::new(0.0, 1.0, 6.0), &Point3::origin(), 40.0);
        let frames = synthesize(&subjects(), &program(), &initial).unwrap();
        assert!(frames[0].max_difference(&initial) < 1e-12);
    }

    #[test]
    fn test_blocks_are_continuous() {
        let program = program();
        let frames = synthesize(&subjects(), &program, &CameraPose::default()).unwrap();
        let mut offset = 0;
        for instruction in &program[..program.len() - 1] {
            offset += instruction.frame_count;
            let last = &frames[offset - 1];
            let first = &frames[offset];
            assert!(first.max_difference(last) < 1e-9, "jump at frame {offset}");
        }
    }

    #[test]
    fn test_deterministic() {
        let options = SynthesisOptions::default().with_seed(11);
        let a = synthesize_with_options(&subjects(), &program(), &CameraPose::default(), &options).unwrap();
        let b = synthesize_with_options(&subjects(), &program(), &CameraPose::default(), &options).unwrap();
        assert_eq!(a, b);

        let other = SynthesisOptions::default().with_seed(12);
        let c = synthesize_with_options(&subjects(), &program(), &CameraPose::default(), &other).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_validation_errors() {
        let bad_subject = vec![Instruction::new(10).with_subject(5)];
        assert!(matches!(
            synthesize(&subjects(), &bad_subject, &CameraPose::default()),
            Err(CameraError::SubjectOutOfRange { instruction: 0, index: 5, subject_count: 2 })
        ));

        let zero = vec![Instruction::new(10), Instruction::new(0)];
        assert!(matches!(
            synthesize(&subjects(), &zero, &CameraPose::default()),
            Err(CameraError::InvalidFrameCount { instruction: 1, .. })
        ));

        let mut broken = subjects();
        broken[1].size.y = -1.0;
        assert!(matches!(
            synthesize(&broken, &program(), &CameraPose::default()),
            Err(CameraError::InvalidSubject { index: 1, .. })
        ));

        let mut initial = CameraPose::default();
        initial.position.z = f64::INFINITY;
        assert!(matches!(
            synthesize(&subjects(), &program(), &initial),
            Err(CameraError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_blended_inserts_transitions() {
        let options = SynthesisOptions::default().blended(5);
        let program = program();
        let frames =
            synthesize_with_options(&subjects(), &program, &CameraPose::default(), &options).unwrap();
        assert_eq!(frames.len(), 45 + 2 * 5);

        // Every block starts from the initial pose.
        let second_start = &frames[20 + 5];
        let alone = instruction_frames(
            &program[1],
            &CameraPose::default(),
            subjects().get(1),
            instruction_seed(0, 1),
        );
        assert_eq!(*second_start, alone[0]);

        // Transition frames lie between the neighbouring blocks.
        let before = frames[19];
        let after = frames[25];
        let mid = frames[22];
        let expected = before.interpolate(&after, 3.0 / 6.0);
        assert!(mid.max_difference(&expected) < 1e-12);
    }

    #[test]
    fn test_blended_option_serde() {
        let options = SynthesisOptions::default().blended(8).with_seed(3);
        let json = serde_json::to_string(&options).unwrap();
        assert!(json.contains("\"mode\":\"blended\""));
        assert!(json.contains("\"transitionFrames\":8"));
        let back: SynthesisOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);

        let defaults: SynthesisOptions =
            serde_json::from_str(r#"{"continuity":{"mode":"blended"}}"#).unwrap();
        assert_eq!(
            defaults.continuity,
            Continuity::Blended { transition_frames: DEFAULT_TRANSITION_FRAMES }
        );
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let scenes: Vec<Scene> = (0..4)
            .map(|i| {
                Scene::new(subjects(), program())
                    .with_initial_pose(CameraPose::looking_at(
                        Point3::new(i as f64, 1.0, 8.0),
                        &Point3::origin(),
                        50.0,
                    ))
            })
            .collect();
        let options = SynthesisOptions::default().with_seed(5);
        let parallel = synthesize_batch(&scenes, &options);
        let sequential = synthesize_batch(&scenes, &options.clone().sequential());
        assert_eq!(parallel.len(), 4);
        for ((p, s), scene) in parallel.iter().zip(&sequential).zip(&scenes) {
            let p = p.as_ref().unwrap();
            assert_eq!(p, s.as_ref().unwrap());
            assert_eq!(p, &scene.synthesize(&options).unwrap());
        }
    }

    #[test]
    fn test_progress_reports_every_frame() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        synthesize_with_progress(
            &subjects(),
            &program(),
            &CameraPose::default(),
            &SynthesisOptions::default(),
            &progress,
        )
        .unwrap();
        // Idle, one per frame, done.
        assert_eq!(calls.load(Ordering::SeqCst), 47);
    }

    #[test]
    fn test_progress_units_are_consistent() {
        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });
        synthesize_with_progress(
            &subjects(),
            &program(),
            &CameraPose::default(),
            &SynthesisOptions::default(),
            &progress,
        )
        .unwrap();
        let log = log.lock().unwrap();
        assert_eq!(log.first(), Some(&(0, 3000)));
        assert_eq!(log.last(), Some(&(3000, 3000)));
        assert!(log.iter().all(|&(current, total)| total == 3000 && current <= total));
        for pair in log.windows(2) {
            assert!(pair[1].0 >= pair[0].0, "progress went backwards: {pair:?}");
        }
        // The first instruction has 20 frames.
        assert_eq!(log[1], (50, 3000));
        assert_eq!(log[20], (1000, 3000));
    }
}
