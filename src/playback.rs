//! Playback of a fixed frame sequence.
//!
//! [`Playback`] drives a camera from frames that were synthesized earlier or
//! imported from a file, without running synthesis again. Frames can be read
//! by index or sampled at any progress value, in which case neighbouring
//! frames are interpolated.

use std::path::Path;

use crate::error::{CameraError, Result};
use crate::io;
use crate::scene::CameraPose;

/// A non-empty sequence of camera frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    frames: Vec<CameraPose>,
}

impl Playback {
    /// Wrap `frames`.
    ///
    /// # Errors
    ///
    /// Returns [`CameraError::EmptyPlayback`] if `frames` is empty and
    /// [`CameraError::NonFinite`] if any frame holds NaN or infinite values.
    pub fn new(frames: Vec<CameraPose>) -> Result<Self> {
        if frames.is_empty() {
            return Err(CameraError::EmptyPlayback);
        }
        if let Some(index) = frames.iter().position(|f| !f.is_finite()) {
            return Err(CameraError::non_finite(format!("camera frame {index}")));
        }
        Ok(Self { frames })
    }

    /// Load the frames of an exported simulation (or a bare frame array).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(io::load_frames(path)?)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The frame at `index`.
    pub fn frame(&self, index: usize) -> Option<&CameraPose> {
        self.frames.get(index)
    }

    /// All frames.
    pub fn frames(&self) -> &[CameraPose] {
        &self.frames
    }

    /// Iterate over the frames.
    pub fn iter(&self) -> std::slice::Iter<'_, CameraPose> {
        self.frames.iter()
    }

    /// Take the frames back.
    pub fn into_frames(self) -> Vec<CameraPose> {
        self.frames
    }

    /// The pose at `progress` in `[0, 1]` (clamped).
    ///
    /// `0` is the first frame and `1` the last; values in between interpolate
    /// the two nearest frames.
    pub fn sample(&self, progress: f64) -> CameraPose {
        let last = self.frames.len() - 1;
        let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
        let position = progress * last as f64;
        let index = (position.floor() as usize).min(last);
        let t = position - index as f64;
        match self.frames.get(index + 1) {
            Some(next) if t > 0.0 => self.frames[index].interpolate(next, t),
            _ => self.frames[index],
        }
    }

    /// Frame index shown at `time` seconds when played at `fps` frames per
    /// second, holding the last frame at the end.
    pub fn frame_at_time(&self, time: f64, fps: f64) -> usize {
        if !(time.is_finite() && fps.is_finite() && fps > 0.0) || time <= 0.0 {
            return 0;
        }
        ((time * fps).floor() as usize).min(self.frames.len() - 1)
    }

    /// Duration in seconds at `fps` frames per second.
    pub fn duration(&self, fps: f64) -> f64 {
        self.frames.len() as f64 / fps
    }
}

impl<'a> IntoIterator for &'a Playback {
    type Item = &'a CameraPose;
    type IntoIter = std::slice::Iter<'a, CameraPose>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn frames() -> Vec<CameraPose> {
        (0..5)
            .map(|i| {
                let mut pose = CameraPose::default();
                pose.position.x = i as f64;
                pose.focal_length = 50.0 + 10.0 * i as f64;
                pose
            })
            .collect()
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(Playback::new(Vec::new()), Err(CameraError::EmptyPlayback)));

        let mut bad = frames();
        bad[2].focal_length = f64::NAN;
        assert!(matches!(Playback::new(bad), Err(CameraError::NonFinite { .. })));
    }

    #[test]
    fn test_index_access() {
        let p = Playback::new(frames()).unwrap();
        assert_eq!(p.len(), 5);
        assert!(!p.is_empty());
        assert_eq!(p.frame(4).unwrap().position.x, 4.0);
        assert!(p.frame(5).is_none());
        assert_eq!(p.iter().count(), 5);
        assert_eq!((&p).into_iter().count(), 5);
    }

    #[test]
    fn test_sample() {
        let p = Playback::new(frames()).unwrap();
        assert_eq!(p.sample(0.0), frames()[0]);
        assert_eq!(p.sample(1.0), frames()[4]);
        assert_eq!(p.sample(7.0), frames()[4]);
        assert_eq!(p.sample(0.5), frames()[2]);

        let between = p.sample(0.125);
        assert!((between.position - Point3::new(0.5, 0.0, 10.0)).norm() < 1e-12);
        assert!((between.focal_length - 55.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_frame() {
        let p = Playback::new(vec![CameraPose::default()]).unwrap();
        assert_eq!(p.sample(0.3), CameraPose::default());
        assert_eq!(p.frame_at_time(10.0, 24.0), 0);
    }

    #[test]
    fn test_timing() {
        let p = Playback::new(frames()).unwrap();
        assert_eq!(p.frame_at_time(0.1, 24.0), 2);
        assert_eq!(p.frame_at_time(100.0, 24.0), 4);
        assert_eq!(p.frame_at_time(-1.0, 24.0), 0);
        assert!((p.duration(25.0) - 0.2).abs() < 1e-12);
    }
}
