//! Symbolic framing descriptors.

use serde::{Deserialize, Serialize};

/// Vertical placement and tilt of the camera relative to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CameraAngle {
    /// Camera at the subject's eye height.
    EyeLevel,
    /// Camera below the eye line, looking up.
    LowAngle,
    /// Camera above the eye line, looking down.
    HighAngle,
    /// Tilted horizon.
    DutchAngle,
    /// Straight above the subject, looking down.
    BirdsEye,
    /// Near the ground, looking steeply up.
    WormsEye,
    /// Behind the subject's shoulder, looking past it.
    OverTheShoulder,
    /// From the subject's own eyes.
    PointOfView,
}

impl CameraAngle {
    /// Every camera angle.
    pub const ALL: [CameraAngle; 8] = [
        CameraAngle::EyeLevel,
        CameraAngle::LowAngle,
        CameraAngle::HighAngle,
        CameraAngle::DutchAngle,
        CameraAngle::BirdsEye,
        CameraAngle::WormsEye,
        CameraAngle::OverTheShoulder,
        CameraAngle::PointOfView,
    ];
}

/// How much of the subject fills the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShotType {
    /// A detail of the subject.
    ExtremeCloseUp,
    /// The subject's head, or equivalent.
    CloseUp,
    /// Head and shoulders.
    MediumCloseUp,
    /// Waist up.
    MediumShot,
    /// Knees up.
    MediumLongShot,
    /// The whole subject.
    FullShot,
    /// The subject within its surroundings.
    LongShot,
    /// The subject small in a wide view.
    ExtremeLongShot,
    /// The subject and a neighbour side by side.
    TwoShot,
    /// Several subjects.
    GroupShot,
    /// A tight detail used as a cut-in.
    Insert,
    /// A view away from the subject.
    Cutaway,
    /// A wide, high view of the whole location.
    Establishing,
}

impl ShotType {
    /// Every shot type.
    pub const ALL: [ShotType; 13] = [
        ShotType::ExtremeCloseUp,
        ShotType::CloseUp,
        ShotType::MediumCloseUp,
        ShotType::MediumShot,
        ShotType::MediumLongShot,
        ShotType::FullShot,
        ShotType::LongShot,
        ShotType::ExtremeLongShot,
        ShotType::TwoShot,
        ShotType::GroupShot,
        ShotType::Insert,
        ShotType::Cutaway,
        ShotType::Establishing,
    ];

    /// The shot sizes ordered from tightest to widest.
    pub const SIZES: [ShotType; 8] = [
        ShotType::ExtremeCloseUp,
        ShotType::CloseUp,
        ShotType::MediumCloseUp,
        ShotType::MediumShot,
        ShotType::MediumLongShot,
        ShotType::FullShot,
        ShotType::LongShot,
        ShotType::ExtremeLongShot,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&ShotType::ExtremeCloseUp).unwrap(),
            "\"extremeCloseUp\""
        );
        assert_eq!(
            serde_json::to_string(&CameraAngle::OverTheShoulder).unwrap(),
            "\"overTheShoulder\""
        );
        let angle: CameraAngle = serde_json::from_str("\"birdsEye\"").unwrap();
        assert_eq!(angle, CameraAngle::BirdsEye);
    }

    #[test]
    fn test_sizes_are_distinct() {
        for (i, a) in ShotType::SIZES.iter().enumerate() {
            for b in &ShotType::SIZES[i + 1..] {
                assert_ne!(a, b);
            }
            assert!(ShotType::ALL.contains(a));
        }
    }
}
