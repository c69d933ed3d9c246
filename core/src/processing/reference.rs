//! Reference-period normalization.
//!
//! The 64-sample reference window is captured on a single antenna before
//! switching begins. Its unwrapped phase ramp measures the frequency offset
//! between carrier and local oscillator; that phase rate is what lets every
//! switching-period sample be projected back to the reference time origin so
//! inter-antenna phase differences reflect geometry, not elapsed time.

use crate::frame::{IqSample, RefSamples, REF_SAMPLES_COUNT};
use crate::math::phase::{amplitude_of, phase_of, wrap_phase};
use crate::math::{PhaseUnwrapper, RegressionHelper};
use crate::prelude::{AoaConfig, AoaError, AoaResult};

/// Residual ceiling for the reference fit, radians RMS. Noise past the
/// sampling Nyquist margin shows up as an inconsistent ramp rather than a
/// detectable wrap, so the residual is the convergence signal.
pub const REF_RESIDUAL_MAX: f32 = 0.9;

/// Phase/frequency baseline estimated from one reference window.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceBaseline {
    /// Oscillator drift in radians per nanosecond.
    pub phase_rate_per_ns: f32,
    /// Unwrapped phase at the reference origin.
    pub origin_phase: f32,
    /// Fit residual RMS in radians.
    pub residual_rms: f32,
}

/// Estimates the baseline and projects switching-slot phases to the
/// reference time origin. Scratch buffers are allocated once.
pub struct ReferenceNormalizer {
    sample_spacing_ref: f32,
    sample_spacing: f32,
    switch_spacing_ns: f32,
    ref_period_ns: f32,
    indices: [f32; REF_SAMPLES_COUNT],
    wrapped: [f32; REF_SAMPLES_COUNT],
    unwrapped: [f32; REF_SAMPLES_COUNT],
    unwrapper: PhaseUnwrapper,
}

impl ReferenceNormalizer {
    pub fn new(config: &AoaConfig) -> Self {
        Self {
            sample_spacing_ref: config.sample_spacing_ref as f32,
            sample_spacing: config.sample_spacing as f32,
            switch_spacing_ns: config.ant_switch_spacing as f32 * 1000.0,
            ref_period_ns: config.reference_period as f32 * 1000.0,
            indices: core::array::from_fn(|n| n as f32),
            wrapped: [0.0; REF_SAMPLES_COUNT],
            unwrapped: [0.0; REF_SAMPLES_COUNT],
            unwrapper: PhaseUnwrapper::new(),
        }
    }

    /// Fit the reference window: unwrap, regress phase against sample index,
    /// gate on residual. `Internal` means the baseline cannot be trusted and
    /// the frame must be discarded.
    pub fn estimate(&mut self, ref_data: &RefSamples) -> AoaResult<ReferenceBaseline> {
        for (slot, sample) in self.wrapped.iter_mut().zip(&ref_data.data) {
            *slot = phase_of(*sample);
        }
        self.unwrapper.reset();
        self.unwrapper
            .unwrap_into(&self.wrapped, &mut self.unwrapped);

        let fit = RegressionHelper::fit(&self.indices, &self.unwrapped).ok_or_else(|| {
            AoaError::Internal("reference window fit is degenerate".into())
        })?;
        if fit.residual_rms > REF_RESIDUAL_MAX {
            return Err(AoaError::Internal(format!(
                "reference unwrap did not converge: residual {:.3} rad",
                fit.residual_rms
            )));
        }

        Ok(ReferenceBaseline {
            phase_rate_per_ns: fit.slope / self.sample_spacing_ref,
            origin_phase: fit.intercept,
            residual_rms: fit.residual_rms,
        })
    }

    /// Nanosecond offset of sample `index` in switch slot `slot`, measured
    /// from the reference origin.
    #[inline]
    fn sample_offset_ns(&self, slot: usize, index: usize) -> f32 {
        self.ref_period_ns + slot as f32 * self.switch_spacing_ns + index as f32 * self.sample_spacing
    }

    /// Project one slot's sample phases back to the reference origin and
    /// collapse them to a single corrected phase.
    ///
    /// Returns the circular-mean phase and the resultant coherence in
    /// [0, 1]; incoherent captures (noise-dominated slots) trend toward 0.
    pub fn project_slot(
        &self,
        baseline: &ReferenceBaseline,
        phases: &[f32],
        slot: usize,
    ) -> (f32, f32) {
        let mut resultant = IqSample::new(0.0, 0.0);
        for (index, &phase) in phases.iter().enumerate() {
            let drift = baseline.phase_rate_per_ns * self.sample_offset_ns(slot, index);
            resultant += IqSample::from_polar(1.0, wrap_phase(phase - drift));
        }
        let coherence = if phases.is_empty() {
            0.0
        } else {
            amplitude_of(resultant) / phases.len() as f32
        };
        (phase_of(resultant), coherence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RefSamples;
    use num_complex::Complex32;

    fn ref_window(rate_per_sample: f32, noise: impl Fn(usize) -> f32) -> RefSamples {
        let data = core::array::from_fn(|n| {
            Complex32::from_polar(1.0, rate_per_sample * n as f32 + noise(n))
        });
        RefSamples::new(0, data)
    }

    #[test]
    fn estimate_recovers_clean_phase_ramp() {
        let config = AoaConfig::default();
        let mut normalizer = ReferenceNormalizer::new(&config);
        // 0.8 rad per 125 ns reference sample.
        let baseline = normalizer.estimate(&ref_window(0.8, |_| 0.0)).unwrap();
        assert!((baseline.phase_rate_per_ns - 0.8 / 125.0).abs() < 1e-6);
        assert!(baseline.residual_rms < 1e-3);
    }

    #[test]
    fn estimate_rejects_incoherent_window() {
        let config = AoaConfig::default();
        let mut normalizer = ReferenceNormalizer::new(&config);
        // A 1.2 rad square-wave riding on the ramp keeps every step inside
        // the principal interval, so no amount of unwrapping can linearize
        // it and the fit residual stays above the gate.
        let noisy = ref_window(0.2, |n| if (n / 2) % 2 == 0 { 1.2 } else { -1.2 });
        assert!(matches!(
            normalizer.estimate(&noisy),
            Err(AoaError::Internal(_))
        ));
    }

    #[test]
    fn projection_cancels_oscillator_drift() {
        let config = AoaConfig::default();
        let mut normalizer = ReferenceNormalizer::new(&config);
        let rate = 0.25 / 125.0; // rad per ns
        let baseline = normalizer.estimate(&ref_window(0.25, |_| 0.0)).unwrap();

        // A slot whose samples carry only drift on top of a geometric phase.
        let geometric = 1.1f32;
        let slot = 5;
        let phases: Vec<f32> = (0..8)
            .map(|j| {
                let t = normalizer.sample_offset_ns(slot, j);
                wrap_phase(geometric + rate * t)
            })
            .collect();

        let (corrected, coherence) = normalizer.project_slot(&baseline, &phases, slot);
        assert!((wrap_phase(corrected - geometric)).abs() < 1e-2);
        assert!(coherence > 0.99);
    }

    #[test]
    fn projection_of_empty_slot_has_zero_coherence() {
        let config = AoaConfig::default();
        let normalizer = ReferenceNormalizer::new(&config);
        let baseline = ReferenceBaseline {
            phase_rate_per_ns: 0.0,
            origin_phase: 0.0,
            residual_rms: 0.0,
        };
        let (_, coherence) = normalizer.project_slot(&baseline, &[], 0);
        assert_eq!(coherence, 0.0);
    }
}
