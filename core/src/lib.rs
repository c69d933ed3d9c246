//! Angle-of-arrival evaluation core for direction-finding captures.
//!
//! The modules mirror the legacy direction-finding evaluation library while
//! providing safe abstractions, preallocated working buffers, and
//! well-defined processing stages: frame validation, phase/amplitude
//! extraction, reference-period normalization, planar-wave geometry
//! inversion, and temporal result filtering.

pub mod frame;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;
pub mod time;

pub use frame::{AngleEstimate, AoaResults, MappedFrame};
pub use prelude::{AoaConfig, AoaError, AoaResult};
pub use processing::engine::AoaEngine;
pub use time::UptimeSource;
