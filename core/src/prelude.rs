use serde::{Deserialize, Serialize};

/// Algorithm configuration bound to an engine at initialization.
///
/// Immutable for the engine's lifetime. Spacing fields follow the capture
/// hardware's units: periods in microseconds, sampling intervals in
/// nanoseconds, carrier frequency in hertz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AoaConfig {
    /// Edge length of the square antenna grid. Only 4 is supported.
    pub matrix_size: u8,
    /// Number of antenna switch slots. Only 12 is supported.
    pub sampling_slots_num: u8,
    /// Reference period duration in microseconds. Only 8 is supported.
    pub reference_period: u8,
    /// Switch slot duration in microseconds.
    pub ant_switch_spacing: u8,
    /// Reference period sampling interval in nanoseconds.
    pub sample_spacing_ref: u16,
    /// Switching period sampling interval in nanoseconds.
    pub sample_spacing: u16,
    /// Per-slot sample capacity during the switching period.
    pub slot_samples_num: u16,
    /// Carrier frequency in hertz.
    pub frequency: u32,
    /// Distance between consecutive antennas in metres.
    pub array_distance: f32,
}

impl Default for AoaConfig {
    fn default() -> Self {
        Self {
            matrix_size: 4,
            sampling_slots_num: 12,
            reference_period: 8,
            ant_switch_spacing: 2,
            sample_spacing_ref: 125,
            sample_spacing: 250,
            slot_samples_num: 8,
            frequency: 2_440_000_000,
            array_distance: 0.05,
        }
    }
}

/// Common error type for engine initialization and evaluation.
#[derive(thiserror::Error, Debug)]
pub enum AoaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("too many samples to store during evaluation: {0}")]
    CapacityExceeded(String),
    #[error("internal evaluation failure: {0}")]
    Internal(String),
}

impl AoaError {
    /// Closed numeric status space for callers that consume status codes.
    /// Success is 0; the codes carry no relationship to host errno numbering.
    pub fn code(&self) -> i32 {
        match self {
            AoaError::InvalidInput(_) => -1,
            AoaError::CapacityExceeded(_) => -2,
            AoaError::Internal(_) => -3,
        }
    }
}

pub type AoaResult<T> = Result<T, AoaError>;
