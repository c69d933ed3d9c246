//! Mapped-frame validation against the bound configuration.

use crate::frame::{MappedFrame, ANTENNA_COUNT, REF_SAMPLES_COUNT};
use crate::prelude::{AoaConfig, AoaError, AoaResult};

pub struct MappingValidator;

impl MappingValidator {
    /// Verify a frame's structure before any evaluation work happens.
    ///
    /// Capacity overruns surface as `CapacityExceeded`; every other mismatch
    /// is `InvalidInput`. No partial evaluation follows a failure.
    pub fn validate(frame: &MappedFrame, config: &AoaConfig) -> AoaResult<()> {
        if frame.header.frequency == 0 {
            return Err(AoaError::InvalidInput("frame carries zero frequency".into()));
        }
        if frame.ref_data.samples_num as usize != REF_SAMPLES_COUNT {
            return Err(AoaError::InvalidInput(format!(
                "expected {} reference samples, frame declares {}",
                REF_SAMPLES_COUNT, frame.ref_data.samples_num
            )));
        }
        if frame.antenna_data.len() != ANTENNA_COUNT {
            return Err(AoaError::InvalidInput(format!(
                "expected {} antenna blocks, frame carries {}",
                ANTENNA_COUNT,
                frame.antenna_data.len()
            )));
        }

        let mut seen = [false; ANTENNA_COUNT];
        for block in &frame.antenna_data {
            if block.data.is_empty() || block.samples_num == 0 {
                return Err(AoaError::InvalidInput(format!(
                    "antenna {} carries no samples",
                    block.antenna_id
                )));
            }
            if block.samples_num as usize != block.data.len() {
                return Err(AoaError::InvalidInput(format!(
                    "antenna {} declares {} samples but carries {}",
                    block.antenna_id,
                    block.samples_num,
                    block.data.len()
                )));
            }
            if block.data.len() > config.slot_samples_num as usize {
                return Err(AoaError::CapacityExceeded(format!(
                    "antenna {} carries {} samples, slot capacity is {}",
                    block.antenna_id,
                    block.data.len(),
                    config.slot_samples_num
                )));
            }
            let id = block.antenna_id as usize;
            if id >= ANTENNA_COUNT {
                return Err(AoaError::InvalidInput(format!(
                    "antenna id {} outside the {}-element array",
                    block.antenna_id, ANTENNA_COUNT
                )));
            }
            if seen[id] {
                return Err(AoaError::InvalidInput(format!(
                    "antenna id {} mapped twice",
                    block.antenna_id
                )));
            }
            seen[id] = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{AntennaSamples, MappedFrame, RefSamples};
    use num_complex::Complex32;

    fn frame_with_counts(per_slot: usize) -> MappedFrame {
        let ref_data = RefSamples::new(0, [Complex32::new(1.0, 0.0); REF_SAMPLES_COUNT]);
        let blocks = (0..ANTENNA_COUNT as u8)
            .map(|id| AntennaSamples::new(id, vec![Complex32::new(1.0, 0.0); per_slot]))
            .collect();
        MappedFrame::new(2_440_000_000, ref_data, blocks)
    }

    #[test]
    fn well_formed_frame_passes() {
        let config = AoaConfig::default();
        assert!(MappingValidator::validate(&frame_with_counts(4), &config).is_ok());
    }

    #[test]
    fn wrong_reference_count_is_invalid() {
        let config = AoaConfig::default();
        let mut frame = frame_with_counts(4);
        frame.ref_data.samples_num = 32;
        assert!(matches!(
            MappingValidator::validate(&frame, &config),
            Err(AoaError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_antenna_block_is_invalid() {
        let config = AoaConfig::default();
        let mut frame = frame_with_counts(4);
        frame.antenna_data[3].data.clear();
        frame.antenna_data[3].samples_num = 0;
        assert!(matches!(
            MappingValidator::validate(&frame, &config),
            Err(AoaError::InvalidInput(_))
        ));
    }

    #[test]
    fn oversized_slot_is_a_capacity_fault() {
        let config = AoaConfig::default();
        let frame = frame_with_counts(config.slot_samples_num as usize + 1);
        assert!(matches!(
            MappingValidator::validate(&frame, &config),
            Err(AoaError::CapacityExceeded(_))
        ));
    }

    #[test]
    fn duplicated_antenna_id_is_invalid() {
        let config = AoaConfig::default();
        let mut frame = frame_with_counts(4);
        frame.antenna_data[5].antenna_id = 4;
        assert!(matches!(
            MappingValidator::validate(&frame, &config),
            Err(AoaError::InvalidInput(_))
        ));
    }

    #[test]
    fn missing_antenna_block_is_invalid() {
        let config = AoaConfig::default();
        let mut frame = frame_with_counts(4);
        frame.antenna_data.pop();
        assert!(matches!(
            MappingValidator::validate(&frame, &config),
            Err(AoaError::InvalidInput(_))
        ));
    }
}
