use aoacore::frame::IqSample;

/// Generates a unit-amplitude tone with a fixed per-sample phase step.
pub fn cw_samples(length: usize, start_phase: f32, phase_step: f32) -> Vec<IqSample> {
    (0..length)
        .map(|n| IqSample::from_polar(1.0, start_phase + n as f32 * phase_step))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cw_tone_advances_by_the_phase_step() {
        let tone = cw_samples(4, 0.0, 0.5);
        assert_eq!(tone.len(), 4);
        assert!((tone[0].arg() - 0.0).abs() < 1e-6);
        assert!((tone[3].arg() - 1.5).abs() < 1e-6);
    }
}
