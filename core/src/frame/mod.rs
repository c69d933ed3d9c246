//! In-memory model of a direction-finding capture frame.
//!
//! A frame holds the reference-period samples followed by one sample block
//! per antenna switch slot, already mapped to the antenna each block was
//! captured with. The wire layout lives in [`codec`]; the in-memory types
//! stay aligned and owned.

pub mod codec;

use num_complex::Complex32;
use serde::{Deserialize, Serialize};

/// Fixed reference capture length: 8 us period sampled every 125 ns.
pub const REF_SAMPLES_COUNT: usize = 64;

/// Fixed array population: a 4x4 grid with antennas on the perimeter only.
pub const ANTENNA_COUNT: usize = 12;

/// One I/Q baseband sample. Amplitude is `norm()`, phase is `arg()`.
pub type IqSample = Complex32;

/// Build a sample from a wire-order `[i, q]` pair.
#[inline]
pub fn iq_from_pair(pair: [f32; 2]) -> IqSample {
    Complex32::new(pair[0], pair[1])
}

/// Decompose a sample into its wire-order `[i, q]` pair.
#[inline]
pub fn iq_to_pair(sample: IqSample) -> [f32; 2] {
    [sample.re, sample.im]
}

/// Capture frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Total encoded frame length in bytes.
    pub length: u32,
    /// Carrier frequency the samples were captured at, in hertz.
    pub frequency: u32,
}

/// Reference-period samples, captured on a single antenna before switching.
#[derive(Debug, Clone)]
pub struct RefSamples {
    pub samples_num: u8,
    pub antenna_id: u8,
    pub data: [IqSample; REF_SAMPLES_COUNT],
}

impl RefSamples {
    pub fn new(antenna_id: u8, data: [IqSample; REF_SAMPLES_COUNT]) -> Self {
        Self {
            samples_num: REF_SAMPLES_COUNT as u8,
            antenna_id,
            data,
        }
    }
}

/// Switching-period samples for one antenna slot.
#[derive(Debug, Clone)]
pub struct AntennaSamples {
    pub samples_num: u8,
    pub antenna_id: u8,
    pub data: Vec<IqSample>,
}

impl AntennaSamples {
    pub fn new(antenna_id: u8, data: Vec<IqSample>) -> Self {
        Self {
            samples_num: data.len() as u8,
            antenna_id,
            data,
        }
    }
}

/// A complete mapped capture frame: header, reference block, one block per
/// antenna slot.
#[derive(Debug, Clone)]
pub struct MappedFrame {
    pub header: FrameHeader,
    pub ref_data: RefSamples,
    pub antenna_data: Vec<AntennaSamples>,
}

impl MappedFrame {
    /// Assemble a frame, deriving the header length from the encoded size.
    pub fn new(frequency: u32, ref_data: RefSamples, antenna_data: Vec<AntennaSamples>) -> Self {
        let length = codec::encoded_len(&antenna_data) as u32;
        Self {
            header: FrameHeader { length, frequency },
            ref_data,
            antenna_data,
        }
    }
}

/// Azimuth/elevation pair in degrees, bounded to [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AngleEstimate {
    pub azimuth: f32,
    pub elevation: f32,
}

/// Evaluation output: carrier frequency plus the raw and filtered estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AoaResults {
    /// Carrier frequency in megahertz.
    pub frequency: u16,
    pub raw: AngleEstimate,
    pub filtered: AngleEstimate,
}
