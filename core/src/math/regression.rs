//! Least-squares line fitting used by the reference normalizer and the
//! geometry solver.

/// Result of a straight-line fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy)]
pub struct LineFit {
    pub slope: f32,
    pub intercept: f32,
    /// Root-mean-square of the fit residuals.
    pub residual_rms: f32,
}

pub struct RegressionHelper;

impl RegressionHelper {
    /// Ordinary least-squares fit over equal-length abscissa/ordinate slices.
    ///
    /// Returns `None` for fewer than two points or a degenerate abscissa
    /// spread (all x identical).
    pub fn fit(xs: &[f32], ys: &[f32]) -> Option<LineFit> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return None;
        }
        let count = n as f32;
        let mean_x = xs[..n].iter().sum::<f32>() / count;
        let mean_y = ys[..n].iter().sum::<f32>() / count;

        let mut sxx = 0.0f32;
        let mut sxy = 0.0f32;
        for (&x, &y) in xs[..n].iter().zip(&ys[..n]) {
            let dx = x - mean_x;
            sxx += dx * dx;
            sxy += dx * (y - mean_y);
        }
        if sxx <= f32::EPSILON {
            return None;
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let mut residual_sq = 0.0f32;
        for (&x, &y) in xs[..n].iter().zip(&ys[..n]) {
            let err = y - (slope * x + intercept);
            residual_sq += err * err;
        }
        let residual_rms = (residual_sq / count).sqrt();

        Some(LineFit {
            slope,
            intercept,
            residual_rms,
        })
    }

    /// Weighted least-squares slope through the origin: for observations
    /// `(dx, dy)` with weights `w`, minimizes `sum w * (dy - g * dx)^2`.
    ///
    /// Returns `None` when the weighted baseline energy vanishes.
    pub fn weighted_slope(dxs: &[f32], dys: &[f32], weights: &[f32]) -> Option<f32> {
        let mut num = 0.0f32;
        let mut den = 0.0f32;
        for ((&dx, &dy), &w) in dxs.iter().zip(dys).zip(weights) {
            num += w * dx * dy;
            den += w * dx * dx;
        }
        if den <= f32::EPSILON {
            return None;
        }
        Some(num / den)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_recovers_known_line() {
        let xs: Vec<f32> = (0..16).map(|n| n as f32).collect();
        let ys: Vec<f32> = xs.iter().map(|x| 0.35 * x - 2.0).collect();
        let fit = RegressionHelper::fit(&xs, &ys).unwrap();
        assert!((fit.slope - 0.35).abs() < 1e-5);
        assert!((fit.intercept + 2.0).abs() < 1e-4);
        assert!(fit.residual_rms < 1e-4);
    }

    #[test]
    fn fit_reports_residuals_for_noisy_data() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.5, 1.5, 3.0];
        let fit = RegressionHelper::fit(&xs, &ys).unwrap();
        assert!(fit.residual_rms > 0.1);
    }

    #[test]
    fn fit_rejects_degenerate_input() {
        assert!(RegressionHelper::fit(&[1.0], &[2.0]).is_none());
        assert!(RegressionHelper::fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn weighted_slope_honors_weights() {
        // Second observation is an outlier but carries no weight.
        let slope =
            RegressionHelper::weighted_slope(&[1.0, 1.0, 2.0], &[0.5, 9.0, 1.0], &[1.0, 0.0, 1.0])
                .unwrap();
        assert!((slope - 0.5).abs() < 1e-6);
    }

    #[test]
    fn weighted_slope_rejects_zero_baseline() {
        assert!(RegressionHelper::weighted_slope(&[0.0, 0.0], &[1.0, 2.0], &[1.0, 1.0]).is_none());
    }
}
