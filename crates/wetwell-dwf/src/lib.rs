//! Dry-weather-flow analysis for pump-station telemetry.
//!
//! Classifies calendar days as dry or wet from zone-averaged rainfall
//! history and aggregates pumped volume over the dry days into the
//! six-measure DWF comparison table (theoretical baseline, summer, winter,
//! workday, weekend, average — absolute and relative to the baseline).

mod config;
mod error;
mod rain;
mod table;

pub use config::DwfConfig;
pub use error::DwfError;
pub use rain::{
    subsystem_zones, summarize_rainfall, CatchmentArea, DryDayRecord, RainfallObservation,
};
pub use table::{dwf_table, DwfMeasure, DwfRow, DwfTable};
