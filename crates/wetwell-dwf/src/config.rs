//! Configuration for dry-weather-flow analysis.

use std::ops::RangeInclusive;

/// Configuration for dry-day classification and the DWF comparison table.
///
/// Construct via [`DwfConfig::new`], then chain `with_*` methods to override
/// defaults. The baseline quantile and the dry thresholds are tuning
/// parameters, not constants.
///
/// # Defaults
///
/// | Parameter           | Default   |
/// |---------------------|-----------|
/// | `dry_threshold`     | 2.5 (mm)  |
/// | `min_dry_series`    | 3 (days)  |
/// | `baseline_quantile` | 0.2       |
/// | `winter_months`     | 1..=3     |
/// | `summer_months`     | 6..=9     |
#[derive(Debug, Clone, PartialEq)]
pub struct DwfConfig {
    dry_threshold: f64,
    min_dry_series: u32,
    baseline_quantile: f64,
    winter_months: RangeInclusive<u32>,
    summer_months: RangeInclusive<u32>,
}

impl Default for DwfConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DwfConfig {
    /// Create a configuration with the default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dry_threshold: 2.5,
            min_dry_series: 3,
            baseline_quantile: 0.2,
            winter_months: 1..=3,
            summer_months: 6..=9,
        }
    }

    /// Set the daily rainfall total at or above which a day counts as wet.
    #[must_use]
    pub fn with_dry_threshold(mut self, dry_threshold: f64) -> Self {
        self.dry_threshold = dry_threshold;
        self
    }

    /// Set how many consecutive rain-free days a day needs behind it to
    /// qualify as dry.
    #[must_use]
    pub fn with_min_dry_series(mut self, min_dry_series: u32) -> Self {
        self.min_dry_series = min_dry_series;
        self
    }

    /// Set the quantile of dry daily volumes taken as the theoretical
    /// dry-weather-flow baseline.
    #[must_use]
    pub fn with_baseline_quantile(mut self, baseline_quantile: f64) -> Self {
        self.baseline_quantile = baseline_quantile;
        self
    }

    /// Set the calendar months that make up the winter subset.
    #[must_use]
    pub fn with_winter_months(mut self, winter_months: RangeInclusive<u32>) -> Self {
        self.winter_months = winter_months;
        self
    }

    /// Set the calendar months that make up the summer subset.
    #[must_use]
    pub fn with_summer_months(mut self, summer_months: RangeInclusive<u32>) -> Self {
        self.summer_months = summer_months;
        self
    }

    /// Return the wet-day rainfall threshold.
    #[must_use]
    pub fn dry_threshold(&self) -> f64 {
        self.dry_threshold
    }

    /// Return the consecutive-dry-days requirement.
    #[must_use]
    pub fn min_dry_series(&self) -> u32 {
        self.min_dry_series
    }

    /// Return the baseline quantile.
    #[must_use]
    pub fn baseline_quantile(&self) -> f64 {
        self.baseline_quantile
    }

    /// Return the winter month range.
    #[must_use]
    pub fn winter_months(&self) -> RangeInclusive<u32> {
        self.winter_months.clone()
    }

    /// Return the summer month range.
    #[must_use]
    pub fn summer_months(&self) -> RangeInclusive<u32> {
        self.summer_months.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let cfg = DwfConfig::new();
        assert!((cfg.dry_threshold() - 2.5).abs() < f64::EPSILON);
        assert_eq!(cfg.min_dry_series(), 3);
        assert!((cfg.baseline_quantile() - 0.2).abs() < f64::EPSILON);
        assert_eq!(cfg.winter_months(), 1..=3);
        assert_eq!(cfg.summer_months(), 6..=9);
    }

    #[test]
    fn builder_chaining() {
        let cfg = DwfConfig::new()
            .with_dry_threshold(1.0)
            .with_min_dry_series(2)
            .with_baseline_quantile(0.25);
        assert!((cfg.dry_threshold() - 1.0).abs() < f64::EPSILON);
        assert_eq!(cfg.min_dry_series(), 2);
        assert!((cfg.baseline_quantile() - 0.25).abs() < f64::EPSILON);
    }
}
