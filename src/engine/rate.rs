//! Rate functions mapping normalized beat time to animation progress

use std::f32::consts::PI;

use serde::Serialize;

/// Steepness of the `Smooth` sigmoid
const SMOOTH_INFLECTION: f32 = 10.0;
/// Number of oscillations in `Wiggle`
const WIGGLES: f32 = 2.0;

/// Easing curve applied to a beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RateFunc {
    Linear,
    /// Sigmoid ease-in-out, the default for every beat
    #[default]
    Smooth,
    /// Goes to 1 at the midpoint and back to 0
    ThereAndBack,
    /// Oscillates around the start and ends where it began
    Wiggle,
}

impl RateFunc {
    /// Progress at normalized time `t` (clamped to 0.0-1.0)
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            RateFunc::Linear => t,
            RateFunc::Smooth => smooth(t),
            RateFunc::ThereAndBack => there_and_back(t),
            RateFunc::Wiggle => there_and_back(t) * (WIGGLES * PI * t).sin(),
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn smooth(t: f32) -> f32 {
    let error = sigmoid(-SMOOTH_INFLECTION / 2.0);
    let value = (sigmoid(SMOOTH_INFLECTION * (t - 0.5)) - error) / (1.0 - 2.0 * error);
    value.clamp(0.0, 1.0)
}

fn there_and_back(t: f32) -> f32 {
    let folded = if t < 0.5 { 2.0 * t } else { 2.0 * (1.0 - t) };
    smooth(folded)
}
