//! Instruction store.
//!
//! An ordered, editable list of [`Instruction`]s: the authoring side of
//! synthesis. The store enforces a minimum frame count on everything added
//! to it and maps overall playback progress back to a position in the list.
//!
//! # Example
//!
//! ```
//! use cinecam::store::{InstructionStore, StoreOptions};
//! use cinecam::scene::Instruction;
//!
//! let mut store = InstructionStore::new(StoreOptions::interactive());
//! assert!(store.add(Instruction::new(10)).is_err());
//!
//! store.add(Instruction::new(100)).unwrap();
//! store.add(Instruction::new(300)).unwrap();
//! assert_eq!(store.total_frames(), 400);
//!
//! let cursor = store.locate(0.5).unwrap();
//! assert_eq!((cursor.instruction, cursor.frame), (1, 100));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CameraError, Result};
use crate::scene::{CameraPose, Instruction, Subject};
use crate::synth::{self, SynthesisOptions};

/// Frame minimum used by interactive authoring.
pub const INTERACTIVE_MIN_FRAME_COUNT: usize = 100;

/// Options for an [`InstructionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreOptions {
    /// Smallest frame count an instruction may have (at least 1).
    pub min_frame_count: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { min_frame_count: 1 }
    }
}

impl StoreOptions {
    /// Options used by interactive authoring (at least 100 frames per shot).
    pub fn interactive() -> Self {
        Self {
            min_frame_count: INTERACTIVE_MIN_FRAME_COUNT,
        }
    }

    /// Set the minimum frame count.
    pub fn with_min_frame_count(mut self, min_frame_count: usize) -> Self {
        self.min_frame_count = min_frame_count.max(1);
        self
    }
}

/// A position in the synthesized sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    /// Index of the instruction.
    pub instruction: usize,
    /// Frame within the instruction.
    pub frame: usize,
    /// Global frame index.
    pub global_frame: usize,
}

/// An ordered list of instructions.
#[derive(Debug, Clone, Default)]
pub struct InstructionStore {
    instructions: Vec<Instruction>,
    options: StoreOptions,
}

impl InstructionStore {
    /// Create an empty store.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            instructions: Vec::new(),
            options,
        }
    }

    /// Create a store holding `instructions`, validating each.
    pub fn from_instructions(instructions: Vec<Instruction>, options: StoreOptions) -> Result<Self> {
        for (index, instruction) in instructions.iter().enumerate() {
            Self::check(&options, index, instruction)?;
        }
        Ok(Self {
            instructions,
            options,
        })
    }

    /// The store's options.
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn check(options: &StoreOptions, index: usize, instruction: &Instruction) -> Result<()> {
        // Subject references are checked against a scene later.
        instruction.validate(index, usize::MAX, options.min_frame_count)
    }

    /// Append an instruction, returning its index.
    pub fn add(&mut self, instruction: Instruction) -> Result<usize> {
        let index = self.instructions.len();
        Self::check(&self.options, index, &instruction)?;
        self.instructions.push(instruction);
        Ok(index)
    }

    /// Insert an instruction before `index`.
    pub fn insert(&mut self, index: usize, instruction: Instruction) -> Result<()> {
        if index > self.instructions.len() {
            return Err(CameraError::IndexOutOfRange {
                index,
                len: self.instructions.len(),
            });
        }
        Self::check(&self.options, index, &instruction)?;
        self.instructions.insert(index, instruction);
        Ok(())
    }

    /// Replace the instruction at `index`, returning the old one.
    pub fn edit(&mut self, index: usize, instruction: Instruction) -> Result<Instruction> {
        let len = self.instructions.len();
        Self::check(&self.options, index, &instruction)?;
        let slot = self
            .instructions
            .get_mut(index)
            .ok_or(CameraError::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, instruction))
    }

    /// Remove and return the instruction at `index`.
    pub fn delete(&mut self, index: usize) -> Result<Instruction> {
        if index >= self.instructions.len() {
            return Err(CameraError::IndexOutOfRange {
                index,
                len: self.instructions.len(),
            });
        }
        Ok(self.instructions.remove(index))
    }

    /// Swap two instructions.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let len = self.instructions.len();
        for index in [a, b] {
            if index >= len {
                return Err(CameraError::IndexOutOfRange { index, len });
            }
        }
        self.instructions.swap(a, b);
        Ok(())
    }

    /// Remove every instruction.
    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    /// The instruction at `index`.
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// All instructions in order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Frames the whole sequence will produce.
    pub fn total_frames(&self) -> usize {
        self.instructions.iter().map(|i| i.frame_count).sum()
    }

    /// Global index of the first frame of the instruction at `index`.
    pub fn frame_offset(&self, index: usize) -> Option<usize> {
        (index < self.instructions.len())
            .then(|| self.instructions[..index].iter().map(|i| i.frame_count).sum())
    }

    /// The instruction and frame at overall `progress` in `[0, 1]`.
    ///
    /// Progress is clamped; `1.0` maps to the very last frame. Returns `None`
    /// for an empty store.
    pub fn locate(&self, progress: f64) -> Option<Cursor> {
        let total = self.total_frames();
        if total == 0 {
            return None;
        }
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let global_frame = ((progress * total as f64).floor() as usize).min(total - 1);

        let mut start = 0;
        for (instruction, item) in self.instructions.iter().enumerate() {
            if global_frame < start + item.frame_count {
                return Some(Cursor {
                    instruction,
                    frame: global_frame - start,
                    global_frame,
                });
            }
            start += item.frame_count;
        }
        None
    }

    /// Check every subject reference against a scene of `subject_count`
    /// subjects.
    pub fn validate_against(&self, subject_count: usize) -> Result<()> {
        for (index, instruction) in self.instructions.iter().enumerate() {
            instruction.validate(index, subject_count, self.options.min_frame_count)?;
        }
        Ok(())
    }

    /// Synthesize the stored sequence.
    pub fn synthesize(
        &self,
        subjects: &[Subject],
        initial: &CameraPose,
        options: &SynthesisOptions,
    ) -> Result<Vec<CameraPose>> {
        self.validate_against(subjects.len())?;
        synth::synthesize_with_options(subjects, &self.instructions, initial, options)
    }
}
