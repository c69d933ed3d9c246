//! Planar-wave geometry inversion over the fixed 12-antenna array.
//!
//! Antennas occupy the perimeter cells of a 4x4 grid (no interior antennas),
//! id 0 at the grid origin, ids assigned row-major. A plane wave arriving
//! with propagation direction cosines (u, v) imprints the phase field
//! `phi(x, y) = k * (u * x + v * y)` with `k = 2 * pi * f / c`, so the two
//! axis phase gradients recover u and v directly.

use crate::frame::{AngleEstimate, ANTENNA_COUNT};
use crate::math::phase::wrap_phase;
use crate::math::{RegressionHelper, StatsHelper};
use crate::prelude::{AoaConfig, AoaError, AoaResult};
use ndarray::Array2;
use std::f32::consts::{PI, TAU};

pub const SPEED_OF_LIGHT: f32 = 299_792_458.0;

/// Antennas whose capture weight falls below this fraction of the array-wide
/// mean are treated as dead captures and excluded from the solve.
const LOW_ENERGY_FRACTION: f32 = 0.1;

/// Direction cosines may exceed unity by at most this slack before the solve
/// is declared degenerate rather than clamped.
const DIRECTION_COSINE_SLACK: f32 = 0.05;

/// Sign conflict between the adjacent-pair seed gradient and the refined
/// least-squares gradient, expressed as phase over one antenna spacing,
/// beyond which the pairwise estimates are inconsistent.
const SIGN_CONFLICT_TOL: f32 = 0.2;

/// Weighted residual RMS ceiling for the refined axis fit, radians. Pairwise
/// differences that scatter past this cannot come from one plane wave.
const AXIS_RESIDUAL_MAX: f32 = 0.8;

/// One same-axis antenna pair: indices plus signed baseline in metres.
#[derive(Debug, Clone, Copy)]
struct AxisPair {
    first: usize,
    second: usize,
    baseline: f32,
}

pub struct GeometrySolver {
    spacing: f32,
    wave_number: f32,
    positions: Array2<f32>,
    x_pairs: Vec<AxisPair>,
    y_pairs: Vec<AxisPair>,
    scratch_dx: Vec<f32>,
    scratch_dphi: Vec<f32>,
    scratch_w: Vec<f32>,
    scratch_usable: Vec<bool>,
}

impl GeometrySolver {
    /// Build the position and pair tables for the configured array.
    pub fn new(config: &AoaConfig) -> AoaResult<Self> {
        let spacing = config.array_distance;
        let positions = perimeter_positions(config.matrix_size as usize, spacing)?;
        let x_pairs = axis_pairs(&positions, 0, 1);
        let y_pairs = axis_pairs(&positions, 1, 0);
        if x_pairs.is_empty() || y_pairs.is_empty() {
            return Err(AoaError::Internal(
                "array geometry yields no usable axis pairs".into(),
            ));
        }
        let pair_capacity = x_pairs.len().max(y_pairs.len());

        Ok(Self {
            spacing,
            wave_number: TAU * config.frequency as f32 / SPEED_OF_LIGHT,
            positions,
            x_pairs,
            y_pairs,
            scratch_dx: Vec::with_capacity(pair_capacity),
            scratch_dphi: Vec::with_capacity(pair_capacity),
            scratch_w: Vec::with_capacity(pair_capacity),
            scratch_usable: Vec::with_capacity(ANTENNA_COUNT),
        })
    }

    /// Antenna position by geometry id, metres.
    pub fn position(&self, id: usize) -> (f32, f32) {
        (self.positions[[id, 0]], self.positions[[id, 1]])
    }

    /// Invert the corrected per-antenna phases into azimuth/elevation.
    ///
    /// `phases` and `amplitudes` are indexed by antenna id. Degenerate or
    /// inconsistent pairwise gradients yield `Internal`; the call has no
    /// side effects beyond scratch reuse.
    pub fn solve(&mut self, phases: &[f32], amplitudes: &[f32]) -> AoaResult<AngleEstimate> {
        debug_assert_eq!(phases.len(), ANTENNA_COUNT);
        debug_assert_eq!(amplitudes.len(), ANTENNA_COUNT);

        let floor = StatsHelper::mean(amplitudes) * LOW_ENERGY_FRACTION;
        let mut usable = std::mem::take(&mut self.scratch_usable);
        usable.clear();
        usable.extend(amplitudes.iter().map(|&a| a > floor && a > 0.0));
        if !usable.iter().any(|&u| u) {
            self.scratch_usable = usable;
            return Err(AoaError::Internal(
                "no antenna capture carries usable energy".into(),
            ));
        }

        let pairs = std::mem::take(&mut self.x_pairs);
        let gx = self.axis_gradient(&pairs, phases, &usable);
        self.x_pairs = pairs;

        let pairs = std::mem::take(&mut self.y_pairs);
        let gy = self.axis_gradient(&pairs, phases, &usable);
        self.y_pairs = pairs;
        self.scratch_usable = usable;

        let gx = gx?;
        let gy = gy?;

        let u = gx / self.wave_number;
        let v = gy / self.wave_number;
        if u.abs() > 1.0 + DIRECTION_COSINE_SLACK || v.abs() > 1.0 + DIRECTION_COSINE_SLACK {
            return Err(AoaError::Internal(format!(
                "direction cosines ({:.3}, {:.3}) outside the unit disc",
                u, v
            )));
        }

        let v = v.clamp(-1.0, 1.0);
        let elevation = v.asin();
        let cos_el = elevation.cos();
        let azimuth = if cos_el < 1e-3 {
            0.0
        } else {
            (u / cos_el).clamp(-1.0, 1.0).asin()
        };

        Ok(AngleEstimate {
            azimuth: (azimuth * 180.0 / PI).clamp(-90.0, 90.0),
            elevation: (elevation * 180.0 / PI).clamp(-90.0, 90.0),
        })
    }

    /// Least-squares phase gradient along one axis.
    ///
    /// Adjacent pairs seed the estimate from principal-interval differences;
    /// longer baselines are then integer-cycle unwrapped against the seed
    /// prediction and folded into the final weighted fit.
    fn axis_gradient(
        &mut self,
        pairs: &[AxisPair],
        phases: &[f32],
        usable: &[bool],
    ) -> AoaResult<f32> {
        self.scratch_dx.clear();
        self.scratch_dphi.clear();
        self.scratch_w.clear();

        let adjacent = self.spacing * 1.5;
        for pair in pairs {
            if !usable[pair.first] || !usable[pair.second] || pair.baseline.abs() > adjacent {
                continue;
            }
            self.scratch_dx.push(pair.baseline);
            self.scratch_dphi
                .push(wrap_phase(phases[pair.second] - phases[pair.first]));
            self.scratch_w.push(1.0);
        }
        let seed =
            RegressionHelper::weighted_slope(&self.scratch_dx, &self.scratch_dphi, &self.scratch_w)
                .ok_or_else(|| {
                    AoaError::Internal("no adjacent antenna pairs survive energy gating".into())
                })?;

        self.scratch_dx.clear();
        self.scratch_dphi.clear();
        self.scratch_w.clear();
        for pair in pairs {
            if !usable[pair.first] || !usable[pair.second] {
                continue;
            }
            let wrapped = wrap_phase(phases[pair.second] - phases[pair.first]);
            let predicted = seed * pair.baseline;
            let cycles = ((predicted - wrapped) / TAU).round();
            self.scratch_dx.push(pair.baseline);
            self.scratch_dphi.push(wrapped + cycles * TAU);
            self.scratch_w.push(1.0);
        }
        let gradient =
            RegressionHelper::weighted_slope(&self.scratch_dx, &self.scratch_dphi, &self.scratch_w)
                .ok_or_else(|| {
                    AoaError::Internal("no antenna pairs survive energy gating".into())
                })?;

        if seed * gradient < 0.0
            && seed.abs().min(gradient.abs()) * self.spacing > SIGN_CONFLICT_TOL
        {
            return Err(AoaError::Internal(format!(
                "axis gradient estimates conflict: seed {:.3}, refined {:.3}",
                seed, gradient
            )));
        }

        let mut residual_sq = 0.0f32;
        let mut weight_sum = 0.0f32;
        for ((&dx, &dphi), &w) in self
            .scratch_dx
            .iter()
            .zip(&self.scratch_dphi)
            .zip(&self.scratch_w)
        {
            let err = dphi - gradient * dx;
            residual_sq += w * err * err;
            weight_sum += w;
        }
        let residual_rms = (residual_sq / weight_sum.max(f32::EPSILON)).sqrt();
        if residual_rms > AXIS_RESIDUAL_MAX {
            return Err(AoaError::Internal(format!(
                "pairwise phase differences scatter {:.3} rad about the fit",
                residual_rms
            )));
        }
        Ok(gradient)
    }
}

/// Positions of the 12 perimeter antennas of a `size` x `size` grid,
/// row-major, id 0 at the origin.
fn perimeter_positions(size: usize, spacing: f32) -> AoaResult<Array2<f32>> {
    let mut cells = Vec::with_capacity(ANTENNA_COUNT);
    for row in 0..size {
        for col in 0..size {
            if row == 0 || row == size - 1 || col == 0 || col == size - 1 {
                cells.push((col as f32 * spacing, row as f32 * spacing));
            }
        }
    }
    if cells.len() != ANTENNA_COUNT {
        return Err(AoaError::Internal(format!(
            "grid of size {} yields {} perimeter antennas, expected {}",
            size,
            cells.len(),
            ANTENNA_COUNT
        )));
    }
    let mut positions = Array2::zeros((ANTENNA_COUNT, 2));
    for (id, (x, y)) in cells.into_iter().enumerate() {
        positions[[id, 0]] = x;
        positions[[id, 1]] = y;
    }
    Ok(positions)
}

/// All antenna pairs aligned along `axis` (sharing their `other` coordinate),
/// ordered so the baseline is positive.
fn axis_pairs(positions: &Array2<f32>, axis: usize, other: usize) -> Vec<AxisPair> {
    let count = positions.nrows();
    let mut pairs = Vec::new();
    for first in 0..count {
        for second in (first + 1)..count {
            let same_line =
                (positions[[first, other]] - positions[[second, other]]).abs() < f32::EPSILON;
            if !same_line {
                continue;
            }
            let baseline = positions[[second, axis]] - positions[[first, axis]];
            if baseline > 0.0 {
                pairs.push(AxisPair {
                    first,
                    second,
                    baseline,
                });
            } else {
                pairs.push(AxisPair {
                    first: second,
                    second: first,
                    baseline: -baseline,
                });
            }
        }
    }
    pairs
}
