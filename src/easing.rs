//! Easing curves.
//!
//! An easing curve reparameterizes linear progress `t ∈ [0, 1]` into
//! perceptually non-uniform motion. Every curve here is a pure function of `t`:
//! the same input always yields the same output, including the
//! [`Easing::HandHeld`] curve, whose "noise" is a fixed product of sines.
//!
//! All curves map `0 → 0` and `1 → 1`. Bounce, elastic, handheld and
//! anticipation may leave `[0, 1]` in between.
//!
//! # Example
//!
//! ```
//! use cinecam::easing::{ease, Easing};
//!
//! assert_eq!(ease(0.5, Easing::Linear), 0.5);
//! assert!(ease(0.25, Easing::EaseInQuad) < 0.25);
//! assert!(ease(0.25, Easing::EaseOutQuad) > 0.25);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// A named easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// No easing.
    #[default]
    Linear,

    /// Quadratic acceleration from zero velocity.
    #[serde(alias = "easeIn")]
    EaseInQuad,
    /// Quadratic deceleration to zero velocity.
    #[serde(alias = "easeOut")]
    EaseOutQuad,
    /// Quadratic acceleration until halfway, then deceleration.
    #[serde(alias = "easeInOut")]
    EaseInOutQuad,

    /// Cubic acceleration.
    EaseInCubic,
    /// Cubic deceleration.
    EaseOutCubic,
    /// Cubic acceleration then deceleration.
    EaseInOutCubic,

    /// Quartic acceleration.
    EaseInQuart,
    /// Quartic deceleration.
    EaseOutQuart,
    /// Quartic acceleration then deceleration.
    EaseInOutQuart,

    /// Quintic acceleration.
    EaseInQuint,
    /// Quintic deceleration.
    EaseOutQuint,
    /// Quintic acceleration then deceleration.
    EaseInOutQuint,

    /// Sinusoidal acceleration.
    EaseInSine,
    /// Sinusoidal deceleration.
    EaseOutSine,
    /// Sinusoidal acceleration then deceleration.
    EaseInOutSine,

    /// Exponential acceleration.
    EaseInExpo,
    /// Exponential deceleration.
    EaseOutExpo,
    /// Exponential acceleration then deceleration.
    EaseInOutExpo,

    /// Circular acceleration.
    EaseInCirc,
    /// Circular deceleration.
    EaseOutCirc,
    /// Circular acceleration then deceleration.
    EaseInOutCirc,

    /// Bounce at the start.
    EaseInBounce,
    /// Bounce at the end.
    #[serde(alias = "bounce")]
    EaseOutBounce,
    /// Bounce at both ends.
    EaseInOutBounce,

    /// Elastic wind-up at the start.
    EaseInElastic,
    /// Elastic overshoot at the end.
    #[serde(alias = "elastic")]
    EaseOutElastic,
    /// Elastic at both ends.
    EaseInOutElastic,

    /// Smoothstep (`3t² − 2t³`).
    Smooth,
    /// Linear progress perturbed by reproducible pseudo-noise.
    #[serde(alias = "handheld")]
    HandHeld,
    /// Pulls back briefly during the first 20% of progress, then eases forward.
    Anticipation,
}

impl Easing {
    /// Every easing curve, in declaration order.
    pub const ALL: [Easing; 31] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInQuint,
        Easing::EaseOutQuint,
        Easing::EaseInOutQuint,
        Easing::EaseInSine,
        Easing::EaseOutSine,
        Easing::EaseInOutSine,
        Easing::EaseInExpo,
        Easing::EaseOutExpo,
        Easing::EaseInOutExpo,
        Easing::EaseInCirc,
        Easing::EaseOutCirc,
        Easing::EaseInOutCirc,
        Easing::EaseInBounce,
        Easing::EaseOutBounce,
        Easing::EaseInOutBounce,
        Easing::EaseInElastic,
        Easing::EaseOutElastic,
        Easing::EaseInOutElastic,
        Easing::Smooth,
        Easing::HandHeld,
        Easing::Anticipation,
    ];

    /// Apply this curve to `t`. See [`ease`].
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        ease(t, self)
    }

    /// Whether the curve may leave `[0, 1]` for inputs inside `[0, 1]`.
    pub fn overshoots(self) -> bool {
        matches!(
            self,
            Easing::EaseInBounce
                | Easing::EaseOutBounce
                | Easing::EaseInOutBounce
                | Easing::EaseInElastic
                | Easing::EaseOutElastic
                | Easing::EaseInOutElastic
                | Easing::HandHeld
                | Easing::Anticipation
        )
    }
}

/// Map normalized progress `t` through `curve`.
///
/// `t` is clamped to `[0, 1]` first; NaN is treated as `0`.
pub fn ease(t: f64, curve: Easing) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    match curve {
        Easing::Linear => t,

        Easing::EaseInQuad => t * t,
        Easing::EaseOutQuad => t * (2.0 - t),
        Easing::EaseInOutQuad => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                -1.0 + (4.0 - 2.0 * t) * t
            }
        }

        Easing::EaseInCubic => t * t * t,
        Easing::EaseOutCubic => {
            let u = t - 1.0;
            u * u * u + 1.0
        }
        Easing::EaseInOutCubic => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }

        Easing::EaseInQuart => t.powi(4),
        Easing::EaseOutQuart => 1.0 - (t - 1.0).powi(4),
        Easing::EaseInOutQuart => {
            if t < 0.5 {
                8.0 * t.powi(4)
            } else {
                1.0 - 8.0 * (t - 1.0).powi(4)
            }
        }

        Easing::EaseInQuint => t.powi(5),
        Easing::EaseOutQuint => 1.0 + (t - 1.0).powi(5),
        Easing::EaseInOutQuint => {
            if t < 0.5 {
                16.0 * t.powi(5)
            } else {
                1.0 + 16.0 * (t - 1.0).powi(5)
            }
        }

        Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
        Easing::EaseOutSine => (t * PI / 2.0).sin(),
        Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,

        // 2^(10t - 10) never reaches exactly 0, so the endpoints are pinned.
        Easing::EaseInExpo => {
            if t == 0.0 {
                0.0
            } else {
                2f64.powf(10.0 * t - 10.0)
            }
        }
        Easing::EaseOutExpo => {
            if t == 1.0 {
                1.0
            } else {
                1.0 - 2f64.powf(-10.0 * t)
            }
        }
        Easing::EaseInOutExpo => {
            if t == 0.0 {
                0.0
            } else if t == 1.0 {
                1.0
            } else if t < 0.5 {
                2f64.powf(20.0 * t - 10.0) / 2.0
            } else {
                (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
            }
        }

        Easing::EaseInCirc => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
        Easing::EaseOutCirc => {
            let u = t - 1.0;
            (1.0 - u * u).max(0.0).sqrt()
        }
        Easing::EaseInOutCirc => {
            if t < 0.5 {
                (1.0 - (1.0 - 4.0 * t * t).max(0.0).sqrt()) / 2.0
            } else {
                let u = t - 1.0;
                ((1.0 - 4.0 * u * u).max(0.0).sqrt() + 1.0) / 2.0
            }
        }

        Easing::EaseInBounce => 1.0 - bounce_out(1.0 - t),
        Easing::EaseOutBounce => bounce_out(t),
        Easing::EaseInOutBounce => {
            if t < 0.5 {
                (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
            } else {
                (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
            }
        }

        Easing::EaseInElastic => {
            if t == 0.0 || t == 1.0 {
                t
            } else {
                -(2f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_PERIOD).sin()
            }
        }
        Easing::EaseOutElastic => {
            if t == 0.0 || t == 1.0 {
                t
            } else {
                2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_PERIOD).sin() + 1.0
            }
        }
        Easing::EaseInOutElastic => {
            if t == 0.0 || t == 1.0 {
                t
            } else if t < 0.5 {
                -(2f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_IN_OUT_PERIOD).sin())
                    / 2.0
            } else {
                2f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_IN_OUT_PERIOD).sin()
                    / 2.0
                    + 1.0
            }
        }

        Easing::Smooth => smoothstep(t),
        Easing::HandHeld => t + handheld_noise(t),
        Easing::Anticipation => {
            if t < ANTICIPATION_WINDOW {
                -ANTICIPATION_DEPTH * (t / ANTICIPATION_WINDOW * PI).sin()
            } else {
                smoothstep((t - ANTICIPATION_WINDOW) / (1.0 - ANTICIPATION_WINDOW))
            }
        }
    }
}

const BOUNCE_N: f64 = 7.5625;
const BOUNCE_D: f64 = 2.75;

const ELASTIC_PERIOD: f64 = 2.0 * PI / 3.0;
const ELASTIC_IN_OUT_PERIOD: f64 = 2.0 * PI / 4.5;

const ANTICIPATION_WINDOW: f64 = 0.2;
const ANTICIPATION_DEPTH: f64 = 0.1;

const HANDHELD_AMPLITUDE: f64 = 0.015;

fn bounce_out(t: f64) -> f64 {
    if t < 1.0 / BOUNCE_D {
        BOUNCE_N * t * t
    } else if t < 2.0 / BOUNCE_D {
        let u = t - 1.5 / BOUNCE_D;
        BOUNCE_N * u * u + 0.75
    } else if t < 2.5 / BOUNCE_D {
        let u = t - 2.25 / BOUNCE_D;
        BOUNCE_N * u * u + 0.9375
    } else {
        let u = t - 2.625 / BOUNCE_D;
        BOUNCE_N * u * u + 0.984375
    }
}

/// Smoothstep: `3t² − 2t³`.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Deterministic "shake" used by [`Easing::HandHeld`]. Zero at `t = 0`.
fn handheld_noise(t: f64) -> f64 {
    (t * 12.9898).sin() * (t * 78.233).sin() * (t * 37.719).sin() * HANDHELD_AMPLITUDE
}
