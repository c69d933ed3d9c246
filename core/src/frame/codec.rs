//! Wire codec for capture frames.
//!
//! The capture hardware hands frames over as tightly packed little-endian
//! byte buffers. This module is the only place that byte layout exists; the
//! evaluation core never overlays packed structs on raw memory.
//!
//! Layout:
//! - header: `length: u32`, `frequency: u32`
//! - reference block: `samples_num: u8`, `antenna_id: u8`, 64 x (`i: f32`, `q: f32`)
//! - antenna block: `samples_num: u8`, `antenna_id: u8`, `samples_num` x (`i: f32`, `q: f32`)

use crate::frame::{
    iq_from_pair, iq_to_pair, AntennaSamples, FrameHeader, IqSample, MappedFrame, RefSamples,
    REF_SAMPLES_COUNT,
};
use crate::prelude::{AoaError, AoaResult};

const HEADER_LEN: usize = 8;
const BLOCK_PREFIX_LEN: usize = 2;
const SAMPLE_LEN: usize = 8;
const REF_BLOCK_LEN: usize = BLOCK_PREFIX_LEN + REF_SAMPLES_COUNT * SAMPLE_LEN;

/// Total encoded frame length for the given antenna blocks.
pub fn encoded_len(antenna_data: &[AntennaSamples]) -> usize {
    let switching: usize = antenna_data
        .iter()
        .map(|block| BLOCK_PREFIX_LEN + block.data.len() * SAMPLE_LEN)
        .sum();
    HEADER_LEN + REF_BLOCK_LEN + switching
}

/// Serialize a frame into its packed wire form.
pub fn encode_frame(frame: &MappedFrame) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(&frame.antenna_data));
    out.extend_from_slice(&frame.header.length.to_le_bytes());
    out.extend_from_slice(&frame.header.frequency.to_le_bytes());

    out.push(frame.ref_data.samples_num);
    out.push(frame.ref_data.antenna_id);
    for sample in &frame.ref_data.data {
        push_sample(&mut out, *sample);
    }

    for block in &frame.antenna_data {
        out.push(block.samples_num);
        out.push(block.antenna_id);
        for sample in &block.data {
            push_sample(&mut out, *sample);
        }
    }
    out
}

/// Parse a packed wire buffer into an owned frame.
///
/// Fails with `InvalidInput` on truncation or counts that over-declare the
/// available bytes. Semantic checks (reference count, antenna id coverage,
/// slot capacity) belong to the mapping validator, not the codec.
pub fn decode_frame(bytes: &[u8]) -> AoaResult<MappedFrame> {
    if bytes.len() < HEADER_LEN + REF_BLOCK_LEN {
        return Err(AoaError::InvalidInput(format!(
            "frame buffer too short: {} bytes",
            bytes.len()
        )));
    }

    let length = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let frequency = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    let mut cursor = HEADER_LEN;
    let ref_samples_num = bytes[cursor];
    let ref_antenna_id = bytes[cursor + 1];
    cursor += BLOCK_PREFIX_LEN;

    let mut ref_samples = [IqSample::new(0.0, 0.0); REF_SAMPLES_COUNT];
    for slot in ref_samples.iter_mut() {
        *slot = read_sample(bytes, cursor);
        cursor += SAMPLE_LEN;
    }

    let mut antenna_data = Vec::new();
    while cursor < bytes.len() {
        if bytes.len() - cursor < BLOCK_PREFIX_LEN {
            return Err(AoaError::InvalidInput(
                "dangling bytes after last antenna block".into(),
            ));
        }
        let samples_num = bytes[cursor] as usize;
        let antenna_id = bytes[cursor + 1];
        cursor += BLOCK_PREFIX_LEN;

        let payload = samples_num * SAMPLE_LEN;
        if bytes.len() - cursor < payload {
            return Err(AoaError::InvalidInput(format!(
                "antenna {} declares {} samples but only {} bytes remain",
                antenna_id,
                samples_num,
                bytes.len() - cursor
            )));
        }

        let mut data = Vec::with_capacity(samples_num);
        for _ in 0..samples_num {
            data.push(read_sample(bytes, cursor));
            cursor += SAMPLE_LEN;
        }
        antenna_data.push(AntennaSamples {
            samples_num: samples_num as u8,
            antenna_id,
            data,
        });
    }

    Ok(MappedFrame {
        header: FrameHeader { length, frequency },
        ref_data: RefSamples {
            samples_num: ref_samples_num,
            antenna_id: ref_antenna_id,
            data: ref_samples,
        },
        antenna_data,
    })
}

fn push_sample(out: &mut Vec<u8>, sample: IqSample) {
    let pair = iq_to_pair(sample);
    out.extend_from_slice(&pair[0].to_le_bytes());
    out.extend_from_slice(&pair[1].to_le_bytes());
}

fn read_sample(bytes: &[u8], offset: usize) -> IqSample {
    let i = f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ]);
    let q = f32::from_le_bytes([
        bytes[offset + 4],
        bytes[offset + 5],
        bytes[offset + 6],
        bytes[offset + 7],
    ]);
    iq_from_pair([i, q])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ANTENNA_COUNT;
    use num_complex::Complex32;

    fn sample_frame() -> MappedFrame {
        let ref_data = RefSamples::new(
            0,
            core::array::from_fn(|n| Complex32::new(n as f32, -(n as f32))),
        );
        let blocks = (0..ANTENNA_COUNT as u8)
            .map(|id| {
                AntennaSamples::new(
                    id,
                    (0..4)
                        .map(|n| Complex32::new(id as f32 + n as f32 * 0.25, 0.5))
                        .collect(),
                )
            })
            .collect();
        MappedFrame::new(2_402_000_000, ref_data, blocks)
    }

    #[test]
    fn encode_decode_round_trips() {
        let frame = sample_frame();
        let bytes = encode_frame(&frame);
        assert_eq!(bytes.len(), frame.header.length as usize);

        let decoded = decode_frame(&bytes).unwrap();
        assert_eq!(decoded.header, frame.header);
        assert_eq!(decoded.ref_data.samples_num, frame.ref_data.samples_num);
        assert_eq!(decoded.ref_data.data, frame.ref_data.data);
        assert_eq!(decoded.antenna_data.len(), frame.antenna_data.len());
        for (got, want) in decoded.antenna_data.iter().zip(&frame.antenna_data) {
            assert_eq!(got.antenna_id, want.antenna_id);
            assert_eq!(got.data, want.data);
        }
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let bytes = encode_frame(&sample_frame());
        let result = decode_frame(&bytes[..bytes.len() - 3]);
        assert!(matches!(result, Err(AoaError::InvalidInput(_))));
    }

    #[test]
    fn short_header_is_rejected() {
        assert!(matches!(
            decode_frame(&[0u8; 6]),
            Err(AoaError::InvalidInput(_))
        ));
    }
}
