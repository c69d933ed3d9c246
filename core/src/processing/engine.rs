//! Engine lifecycle and the per-frame evaluation entry point.
//!
//! `AoaEngine` is the initialized instance of the evaluation pipeline: it
//! owns every working buffer, the derived geometry tables, and the result
//! filter, and borrows the caller's monotonic clock. All allocation happens
//! in `initialize`; `evaluate` runs allocation-free.

use crate::frame::{AoaResults, MappedFrame, ANTENNA_COUNT};
use crate::math::phase::{amplitude_of, phase_of};
use crate::math::StatsHelper;
use crate::prelude::{AoaConfig, AoaError, AoaResult};
use crate::processing::filter::ResultFilter;
use crate::processing::reference::ReferenceNormalizer;
use crate::processing::solver::{GeometrySolver, SPEED_OF_LIGHT};
use crate::processing::validator::MappingValidator;
use crate::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use crate::time::UptimeSource;

pub struct AoaEngine<'a> {
    config: AoaConfig,
    time_source: &'a dyn UptimeSource,
    normalizer: ReferenceNormalizer,
    solver: GeometrySolver,
    filter: ResultFilter,
    metrics: MetricsRecorder,
    logger: LogManager,
    slot_phases: Vec<f32>,
    slot_amps: Vec<f32>,
    corrected: Vec<f32>,
    weights: Vec<f32>,
}

impl<'a> AoaEngine<'a> {
    /// Validate the configuration, build geometry tables, and allocate every
    /// working buffer. The time source is borrowed for the engine's lifetime.
    pub fn initialize(
        time_source: &'a dyn UptimeSource,
        config: &AoaConfig,
    ) -> AoaResult<AoaEngine<'a>> {
        validate_config(config)?;

        let solver = GeometrySolver::new(config)?;
        let normalizer = ReferenceNormalizer::new(config);

        let slot_capacity = config.slot_samples_num as usize;
        let slot_phases = reserve_buffer(slot_capacity)?;
        let slot_amps = reserve_buffer(slot_capacity)?;
        let mut corrected = reserve_buffer(ANTENNA_COUNT)?;
        let mut weights = reserve_buffer(ANTENNA_COUNT)?;
        corrected.resize(ANTENNA_COUNT, 0.0);
        weights.resize(ANTENNA_COUNT, 0.0);

        let logger = LogManager::new();
        logger.record(&format!(
            "engine initialized: {} antennas, {} Hz, {:.3} m spacing",
            ANTENNA_COUNT, config.frequency, config.array_distance
        ));

        Ok(AoaEngine {
            config: config.clone(),
            time_source,
            normalizer,
            solver,
            filter: ResultFilter::new(),
            metrics: MetricsRecorder::new(),
            logger,
            slot_phases,
            slot_amps,
            corrected,
            weights,
        })
    }

    /// Evaluate one mapped frame: validate, extract, normalize, solve,
    /// filter. Failures leave the filter track untouched and the engine
    /// usable for the next frame.
    pub fn evaluate(&mut self, frame: &MappedFrame) -> AoaResult<AoaResults> {
        let started = self.time_source.uptime_us();
        let outcome = self.evaluate_frame(frame);
        match &outcome {
            Ok(results) => {
                let elapsed = self.time_source.uptime_us() - started;
                self.metrics.record_processed(elapsed);
                self.logger.trace_frame(&format!(
                    "frame @ {} MHz: raw ({:.2}, {:.2}) filtered ({:.2}, {:.2}) in {} us",
                    results.frequency,
                    results.raw.azimuth,
                    results.raw.elevation,
                    results.filtered.azimuth,
                    results.filtered.elevation,
                    elapsed
                ));
            }
            Err(err) => {
                self.metrics.record_error();
                self.logger.alert(&format!("evaluation failed: {}", err));
            }
        }
        outcome
    }

    fn evaluate_frame(&mut self, frame: &MappedFrame) -> AoaResult<AoaResults> {
        MappingValidator::validate(frame, &self.config)?;
        let baseline = self.normalizer.estimate(&frame.ref_data)?;

        self.corrected.fill(0.0);
        self.weights.fill(0.0);
        for (slot, block) in frame.antenna_data.iter().enumerate() {
            self.slot_phases.clear();
            self.slot_amps.clear();
            for &sample in &block.data {
                self.slot_phases.push(phase_of(sample));
                self.slot_amps.push(amplitude_of(sample));
            }
            let (phase, coherence) =
                self.normalizer
                    .project_slot(&baseline, &self.slot_phases, slot);
            let id = block.antenna_id as usize;
            self.corrected[id] = phase;
            self.weights[id] = StatsHelper::rms(&self.slot_amps) * coherence;
        }

        let raw = self.solver.solve(&self.corrected, &self.weights)?;
        let filtered = self.filter.update(raw);

        Ok(AoaResults {
            frequency: (frame.header.frequency / 1_000_000) as u16,
            raw,
            filtered,
        })
    }

    pub fn config(&self) -> &AoaConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Explicit teardown, symmetric with `initialize`. Dropping the engine
    /// is equivalent; this form documents the release point.
    pub fn release(self) {}
}

fn validate_config(config: &AoaConfig) -> AoaResult<()> {
    if config.matrix_size != 4 || config.sampling_slots_num as usize != ANTENNA_COUNT {
        return Err(AoaError::InvalidInput(format!(
            "unsupported array geometry: matrix {} with {} slots",
            config.matrix_size, config.sampling_slots_num
        )));
    }
    if config.reference_period != 8 {
        return Err(AoaError::InvalidInput(format!(
            "unsupported reference period: {} us",
            config.reference_period
        )));
    }
    if config.sample_spacing_ref == 0 || config.sample_spacing == 0 || config.ant_switch_spacing == 0
    {
        return Err(AoaError::InvalidInput("zero sampling interval".into()));
    }
    if config.slot_samples_num == 0 || config.slot_samples_num > u8::MAX as u16 {
        return Err(AoaError::InvalidInput(format!(
            "slot capacity {} outside the representable range",
            config.slot_samples_num
        )));
    }
    let slot_window_ns = config.slot_samples_num as u32 * config.sample_spacing as u32;
    if slot_window_ns > config.ant_switch_spacing as u32 * 1000 {
        return Err(AoaError::InvalidInput(format!(
            "{} samples every {} ns overrun the {} us switch slot",
            config.slot_samples_num, config.sample_spacing, config.ant_switch_spacing
        )));
    }
    if config.frequency == 0 {
        return Err(AoaError::InvalidInput("zero carrier frequency".into()));
    }
    if !(config.array_distance > 0.0) {
        return Err(AoaError::InvalidInput("non-positive antenna spacing".into()));
    }
    let half_wavelength = SPEED_OF_LIGHT / config.frequency as f32 / 2.0;
    if config.array_distance >= half_wavelength {
        return Err(AoaError::InvalidInput(format!(
            "antenna spacing {:.3} m aliases phase at {} Hz (half wavelength {:.3} m)",
            config.array_distance, config.frequency, half_wavelength
        )));
    }
    Ok(())
}

fn reserve_buffer(capacity: usize) -> AoaResult<Vec<f32>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|_| AoaError::CapacityExceeded("working buffer allocation".into()))?;
    Ok(buffer)
}
