//! Temporal smoothing of successive raw estimates.
//!
//! Single-pole IIR per engine: `y[n] = alpha * x[n] + (1 - alpha) * y[n-1]`,
//! state seeded by the first raw estimate. The evaluation result carries the
//! pre-update filtered value alongside the raw estimate that produced the
//! update, so the published smooth track never contains the sample it is
//! being compared against.

use crate::frame::AngleEstimate;

/// Fixed smoothing constant; configuration-independent.
pub const FILTER_ALPHA: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct ResultFilter {
    alpha: f32,
    state: Option<AngleEstimate>,
}

impl ResultFilter {
    pub fn new() -> Self {
        Self {
            alpha: FILTER_ALPHA,
            state: None,
        }
    }

    /// Fold a raw estimate into the track. Returns the pre-update filtered
    /// value; on the very first call the raw estimate seeds the state and is
    /// returned as-is.
    pub fn update(&mut self, raw: AngleEstimate) -> AngleEstimate {
        match self.state {
            None => {
                self.state = Some(raw);
                raw
            }
            Some(previous) => {
                let one_minus = 1.0 - self.alpha;
                self.state = Some(AngleEstimate {
                    azimuth: self.alpha * raw.azimuth + one_minus * previous.azimuth,
                    elevation: self.alpha * raw.elevation + one_minus * previous.elevation,
                });
                previous
            }
        }
    }

    /// Current track, if any estimate has been folded in yet.
    pub fn state(&self) -> Option<AngleEstimate> {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

impl Default for ResultFilter {
    fn default() -> Self {
        Self::new()
    }
}
