pub mod phase;
pub mod regression;
pub mod stats;

pub use phase::PhaseUnwrapper;
pub use regression::{LineFit, RegressionHelper};
pub use stats::StatsHelper;
