//! Gap imputation for aligned pump-station series.
//!
//! Two imputers, run in order: [`fill_level`] closes interior level gaps by
//! time-weighted linear interpolation, then [`FlowFillConfig::fill`] closes
//! flow gaps by hydraulic analog lookup against the (now dense) level
//! history. Every function is a pure transformation; per-gap failures are
//! reported as [`FillOutcome`] values, never as batch aborts.

mod error;
mod flow;
mod level;

pub use error::ImputeError;
pub use flow::{FillOutcome, FlowFill, FlowFillConfig, GapFill, RejectReason};
pub use level::fill_level;
