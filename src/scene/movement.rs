//! The compositional movement vocabulary.
//!
//! A [`Movement`] has one optional step per slot. Filling several slots
//! composes them: pan plus tilt is a `rotation` and a `tilt` step, a dolly
//! with a pan is `distance` plus `rotation`, and so on. Slots are applied in
//! a fixed order (translation, distance, rotation, tilt, zoom, rig); see
//! [`crate::resolve::movement`] for what each kind does.

use serde::{Deserialize, Serialize};

/// How far a movement step travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MovementScale {
    /// 30% of the full move.
    Short,
    /// 60% of the full move.
    #[default]
    Medium,
    /// The full move.
    Full,
}

impl MovementScale {
    /// Every scale.
    pub const ALL: [MovementScale; 3] =
        [MovementScale::Short, MovementScale::Medium, MovementScale::Full];

    /// Multiplier applied to the full move.
    pub fn factor(self) -> f64 {
        match self {
            MovementScale::Short => 0.3,
            MovementScale::Medium => 0.6,
            MovementScale::Full => 1.0,
        }
    }
}

/// Sideways and vertical translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationKind {
    /// Slide to the camera's left.
    TruckLeft,
    /// Slide to the camera's right.
    TruckRight,
    /// Raise the camera.
    PedestalUp,
    /// Lower the camera.
    PedestalDown,
}

/// Movement toward or away from the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceKind {
    /// Move toward the subject.
    DollyIn,
    /// Move away from the subject.
    DollyOut,
}

/// Horizontal rotation, in place or around the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RotationKind {
    /// Turn left in place.
    PanLeft,
    /// Turn right in place.
    PanRight,
    /// Orbit the subject, moving to the camera's left.
    ArcLeft,
    /// Orbit the subject, moving to the camera's right.
    ArcRight,
    /// A fast half turn to the left.
    WhipPanLeft,
    /// A fast half turn to the right.
    WhipPanRight,
}

/// Vertical rotation in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TiltKind {
    /// Look up.
    TiltUp,
    /// Look down.
    TiltDown,
}

/// Focal length change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoomKind {
    /// Longer lens.
    ZoomIn,
    /// Wider lens.
    ZoomOut,
}

/// Camera rigs with their own motion signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RigKind {
    /// Boom up and push in while holding the subject.
    CraneJib,
    /// Travel alongside the subject.
    TrackingShot,
    /// Rise and pull back.
    DroneShot,
    /// Small per-frame shake.
    Handheld,
    /// Slow stabilised drift toward the subject.
    Steadicam,
}

/// One filled movement slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementStep<K> {
    /// What the step does.
    #[serde(rename = "type")]
    pub kind: K,
    /// How far it goes.
    #[serde(default)]
    pub scale: MovementScale,
}

impl<K> MovementStep<K> {
    /// Create a step.
    pub fn new(kind: K, scale: MovementScale) -> Self {
        Self { kind, scale }
    }
}

/// The movement of one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Movement {
    /// Truck or pedestal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation: Option<MovementStep<TranslationKind>>,
    /// Dolly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<MovementStep<DistanceKind>>,
    /// Pan, arc or whip pan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<MovementStep<RotationKind>>,
    /// Tilt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tilt: Option<MovementStep<TiltKind>>,
    /// Zoom.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<MovementStep<ZoomKind>>,
    /// Rig-specific motion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rig: Option<MovementStep<RigKind>>,
}

impl Movement {
    /// No movement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the translation slot.
    pub fn with_translation(mut self, kind: TranslationKind, scale: MovementScale) -> Self {
        self.translation = Some(MovementStep::new(kind, scale));
        self
    }

    /// Fill the distance slot.
    pub fn with_distance(mut self, kind: DistanceKind, scale: MovementScale) -> Self {
        self.distance = Some(MovementStep::new(kind, scale));
        self
    }

    /// Fill the rotation slot.
    pub fn with_rotation(mut self, kind: RotationKind, scale: MovementScale) -> Self {
        self.rotation = Some(MovementStep::new(kind, scale));
        self
    }

    /// Fill the tilt slot.
    pub fn with_tilt(mut self, kind: TiltKind, scale: MovementScale) -> Self {
        self.tilt = Some(MovementStep::new(kind, scale));
        self
    }

    /// Fill the zoom slot.
    pub fn with_zoom(mut self, kind: ZoomKind, scale: MovementScale) -> Self {
        self.zoom = Some(MovementStep::new(kind, scale));
        self
    }

    /// Fill the rig slot.
    pub fn with_rig(mut self, kind: RigKind, scale: MovementScale) -> Self {
        self.rig = Some(MovementStep::new(kind, scale));
        self
    }

    /// Whether no slot is filled.
    pub fn is_empty(&self) -> bool {
        self.translation.is_none()
            && self.distance.is_none()
            && self.rotation.is_none()
            && self.tilt.is_none()
            && self.zoom.is_none()
            && self.rig.is_none()
    }

    /// Number of filled slots.
    pub fn step_count(&self) -> usize {
        [
            self.translation.is_some(),
            self.distance.is_some(),
            self.rotation.is_some(),
            self.tilt.is_some(),
            self.zoom.is_some(),
            self.rig.is_some(),
        ]
        .iter()
        .filter(|&&filled| filled)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factors() {
        assert_eq!(MovementScale::default(), MovementScale::Medium);
        let factors: Vec<f64> = MovementScale::ALL.iter().map(|s| s.factor()).collect();
        assert_eq!(factors, vec![0.3, 0.6, 1.0]);
    }

    #[test]
    fn test_builders() {
        let m = Movement::new();
        assert!(m.is_empty());
        assert_eq!(m.step_count(), 0);

        let m = m
            .with_rotation(RotationKind::PanLeft, MovementScale::Short)
            .with_tilt(TiltKind::TiltUp, MovementScale::Full);
        assert!(!m.is_empty());
        assert_eq!(m.step_count(), 2);
        assert_eq!(m.rotation.unwrap().kind, RotationKind::PanLeft);
    }

    #[test]
    fn test_serde_shape() {
        let m = Movement::new().with_zoom(ZoomKind::ZoomIn, MovementScale::Full);
        let json = serde_json::to_value(m).unwrap();
        assert_eq!(json["zoom"]["type"], "zoomIn");
        assert_eq!(json["zoom"]["scale"], "full");
        assert!(json.get("rotation").is_none());

        let parsed: Movement =
            serde_json::from_str(r#"{"rig":{"type":"droneShot"}}"#).unwrap();
        assert_eq!(
            parsed.rig,
            Some(MovementStep::new(RigKind::DroneShot, MovementScale::Medium))
        );
    }
}
