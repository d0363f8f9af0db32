//! Simulation data interchange.
//!
//! A simulation is exported as one JSON document:
//!
//! ```json
//! {
//!   "subjects":     [ { "position": {..}, "size": {..}, "rotation": {..}, "objectClass": "chair" } ],
//!   "instructions": [ { "frameCount": 100, "movementEasing": "easeInOutCubic", .. } ],
//!   "cameraFrames": [ { "position": {..}, "rotation": {..}, "lookAt": {..}, "focalLength": 50 } ]
//! }
//! ```
//!
//! Vectors and Euler angles are `{x, y, z}` objects (see [`wire`]). Numbers
//! round-trip exactly.
//!
//! # Usage
//!
//! ```no_run
//! use cinecam::io::{load, save, SimulationData};
//! use cinecam::prelude::*;
//!
//! let subjects = Subject::default_set();
//! let instructions = vec![Instruction::new(100).with_subject(0)];
//! let data = SimulationData::synthesize(
//!     subjects,
//!     instructions,
//!     &CameraPose::default(),
//!     &SynthesisOptions::default(),
//! )
//! .unwrap();
//!
//! save(&data, "simulation.json").unwrap();
//! let back = load("simulation.json").unwrap();
//! assert_eq!(back.camera_frames.len(), 100);
//! ```

pub mod wire;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CameraError, Result};
use crate::playback::Playback;
use crate::scene::{CameraPose, Instruction, Subject};
use crate::synth::{self, SynthesisOptions};

/// Everything needed to reproduce or replay a simulation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationData {
    /// The scene's subjects.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// The authored instructions.
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    /// The synthesized frames.
    #[serde(default)]
    pub camera_frames: Vec<CameraPose>,
}

impl SimulationData {
    /// Bundle already computed data.
    pub fn new(
        subjects: Vec<Subject>,
        instructions: Vec<Instruction>,
        camera_frames: Vec<CameraPose>,
    ) -> Self {
        Self {
            subjects,
            instructions,
            camera_frames,
        }
    }

    /// Synthesize the frames of `instructions` and bundle them.
    pub fn synthesize(
        subjects: Vec<Subject>,
        instructions: Vec<Instruction>,
        initial: &CameraPose,
        options: &SynthesisOptions,
    ) -> Result<Self> {
        let camera_frames =
            synth::synthesize_with_options(&subjects, &instructions, initial, options)?;
        Ok(Self::new(subjects, instructions, camera_frames))
    }

    /// Play back the stored frames.
    pub fn playback(&self) -> Result<Playback> {
        Playback::new(self.camera_frames.clone())
    }
}

/// Either a full document or just its frames.
#[derive(Deserialize)]
#[serde(untagged)]
enum FrameSource {
    Frames(Vec<CameraPose>),
    Document(SimulationData),
}

/// Encode as pretty-printed JSON.
pub fn to_string(data: &SimulationData) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Decode from JSON text.
pub fn from_str(json: &str) -> Result<SimulationData> {
    Ok(serde_json::from_str(json)?)
}

/// Encode as pretty-printed JSON into `writer`.
pub fn to_writer<W: Write>(data: &SimulationData, writer: W) -> Result<()> {
    Ok(serde_json::to_writer_pretty(writer, data)?)
}

/// Decode from a JSON reader.
pub fn from_reader<R: Read>(reader: R) -> Result<SimulationData> {
    Ok(serde_json::from_reader(reader)?)
}

/// Save simulation data to a JSON file.
///
/// # Example
///
/// ```no_run
/// use cinecam::io::{save, SimulationData};
///
/// save(&SimulationData::default(), "empty.json").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(data: &SimulationData, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    to_writer(data, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Load simulation data from a JSON file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<SimulationData> {
    let path = path.as_ref();
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| CameraError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load only the camera frames from a file.
///
/// Accepts a full simulation document or a bare array of frames.
pub fn load_frames<P: AsRef<Path>>(path: P) -> Result<Vec<CameraPose>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let source: FrameSource =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| CameraError::LoadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let frames = match source {
        FrameSource::Frames(frames) => frames,
        FrameSource::Document(data) => data.camera_frames,
    };
    log::debug!("loaded {} camera frames from {}", frames.len(), path.display());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::geometry;
    use crate::scene::{Movement, MovementScale, RotationKind, ShotType, SubjectClass, TiltKind};
    use nalgebra::Point3;

    fn data() -> SimulationData {
        let subjects = vec![
            Subject::of_class(SubjectClass::Chair, Point3::new(0.0, 0.0, 0.0)),
            Subject::of_class(SubjectClass::Tree, Point3::new(4.0, 0.0, -2.0)),
        ];
        let instructions = vec![
            Instruction::new(12)
                .with_subject(1)
                .with_easing(Easing::EaseOutBounce)
                .with_shot_type(ShotType::LongShot),
            Instruction::new(8).with_movement(
                Movement::new()
                    .with_rotation(RotationKind::PanRight, MovementScale::Short)
                    .with_tilt(TiltKind::TiltDown, MovementScale::Short),
            ),
        ];
        SimulationData::synthesize(
            subjects,
            instructions,
            &CameraPose::default(),
            &SynthesisOptions::default(),
        )
        .unwrap()
    }

    fn assert_same_frames(a: &[CameraPose], b: &[CameraPose]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_eq!(x.position, y.position);
            assert_eq!(x.focal_length, y.focal_length);
            assert_eq!(x.aspect_ratio, y.aspect_ratio);
            assert!(geometry::angle_between(&x.orientation, &y.orientation) < 1e-12);
        }
    }

    #[test]
    fn test_document_shape() {
        let json: serde_json::Value = serde_json::from_str(&to_string(&data()).unwrap()).unwrap();
        assert_eq!(json["subjects"].as_array().unwrap().len(), 2);
        assert_eq!(json["instructions"][0]["frameCount"], 12);
        let frames = json["cameraFrames"].as_array().unwrap();
        assert_eq!(frames.len(), 20);
        for key in ["position", "rotation", "lookAt", "focalLength"] {
            assert!(frames[0].get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_string_round_trip() {
        let original = data();
        let back = from_str(&to_string(&original).unwrap()).unwrap();
        assert_eq!(back.subjects, original.subjects);
        assert_eq!(back.instructions, original.instructions);
        assert_same_frames(&back.camera_frames, &original.camera_frames);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simulation.json");
        let original = data();
        save(&original, &path).unwrap();

        let back = load(&path).unwrap();
        assert_same_frames(&back.camera_frames, &original.camera_frames);

        let frames = load_frames(&path).unwrap();
        assert_same_frames(&frames, &original.camera_frames);
        assert_eq!(back.playback().unwrap().len(), 20);
    }

    #[test]
    fn test_load_bare_frame_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.json");
        let original = data();
        std::fs::write(&path, serde_json::to_string(&original.camera_frames).unwrap()).unwrap();
        assert_same_frames(&load_frames(&path).unwrap(), &original.camera_frames);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load(dir.path().join("missing.json")), Err(CameraError::Io(_))));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"cameraFrames\": [ { \"position\": 3 } ] }").unwrap();
        assert!(matches!(load(&path), Err(CameraError::LoadError { .. })));
        assert!(matches!(load_frames(&path), Err(CameraError::LoadError { .. })));

        assert!(matches!(from_str("not json"), Err(CameraError::Json(_))));
    }

    #[test]
    fn test_writer_reader() {
        let original = data();
        let mut buffer = Vec::new();
        to_writer(&original, &mut buffer).unwrap();
        let back = from_reader(buffer.as_slice()).unwrap();
        assert_eq!(back.instructions, original.instructions);
    }
}
