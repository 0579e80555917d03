//! Reconciliation settings: amount tolerance, mismatch window, reporting currency

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::types::*;

/// How close two dates must be for an amount-disagreeing pair to be
/// reported as a mismatch instead of two unmatched transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchWindow {
    /// No mismatch pass; only exact matches are paired
    Disabled,
    #[default]
    SameMonth,
    SameQuarter,
    SameYear,
    /// At most this many days apart
    Days(u32),
}

impl MismatchWindow {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, MismatchWindow::Disabled)
    }

    /// Whether both dates fall in the same reporting period
    pub fn contains(&self, a: NaiveDate, b: NaiveDate) -> bool {
        match self {
            MismatchWindow::Disabled => false,
            MismatchWindow::SameMonth => a.year() == b.year() && a.month() == b.month(),
            MismatchWindow::SameQuarter => a.year() == b.year() && a.month0() / 3 == b.month0() / 3,
            MismatchWindow::SameYear => a.year() == b.year(),
            MismatchWindow::Days(days) => (a - b).num_days().abs() <= i64::from(*days),
        }
    }
}

/// Reconciliation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Largest absolute amount difference still treated as the same transaction
    pub tolerance: Money,
    pub mismatch_window: MismatchWindow,
    /// When set, every transaction that states a currency must use this one
    pub reporting_currency: Option<String>,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            mismatch_window: MismatchWindow::default(),
            reporting_currency: None,
        }
    }
}

/// One hundredth of a currency unit
fn default_tolerance() -> Money {
    BigDecimal::new(1.into(), 2)
}

impl ReconciliationConfig {
    /// Default settings with a different tolerance
    pub fn with_tolerance(tolerance: Money) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    /// Set the mismatch window
    pub fn mismatch_window(mut self, window: MismatchWindow) -> Self {
        self.mismatch_window = window;
        self
    }

    /// Require a reporting currency
    pub fn reporting_currency(mut self, currency: &str) -> Self {
        self.reporting_currency = Some(currency.to_uppercase());
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> ReconciliationResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| ReconciliationError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ReconciliationResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|e| {
            ReconciliationError::Configuration(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&input)
    }

    /// Check the settings are usable
    pub fn validate(&self) -> ReconciliationResult<()> {
        if self.tolerance < BigDecimal::from(0) {
            return Err(ReconciliationError::Configuration(format!(
                "Tolerance cannot be negative: {}",
                self.tolerance
            )));
        }

        if self.mismatch_window == MismatchWindow::Days(0) {
            return Err(ReconciliationError::Configuration(
                "Mismatch window must span at least one day; use \"disabled\" to turn it off"
                    .to_string(),
            ));
        }

        if let Some(ref currency) = self.reporting_currency {
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ReconciliationError::Configuration(format!(
                    "Reporting currency must be a three-letter code: '{}'",
                    currency
                )));
            }
        }

        Ok(())
    }

    /// Whether two amounts agree within the tolerance
    pub fn within_tolerance(&self, a: &Money, b: &Money) -> bool {
        (a - b).abs() <= self.tolerance
    }
}

impl FromStr for ReconciliationConfig {
    type Err = ReconciliationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_toml_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = ReconciliationConfig::default();
        assert_eq!(config.tolerance, BigDecimal::from_str("0.01").unwrap());
        assert_eq!(config.mismatch_window, MismatchWindow::SameMonth);
        assert!(config.reporting_currency.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = ReconciliationConfig::from_toml_str(
            r#"
            tolerance = "0.50"
            mismatch_window = "same_quarter"
            reporting_currency = "USD"
            "#,
        )
        .unwrap();

        assert_eq!(config.tolerance, BigDecimal::from_str("0.50").unwrap());
        assert_eq!(config.mismatch_window, MismatchWindow::SameQuarter);
        assert_eq!(config.reporting_currency.as_deref(), Some("USD"));
    }

    #[test]
    fn test_parse_day_window_and_partial_document() {
        let config = ReconciliationConfig::from_toml_str("mismatch_window = { days = 14 }").unwrap();
        assert_eq!(config.mismatch_window, MismatchWindow::Days(14));
        assert_eq!(config.tolerance, default_tolerance());

        let disabled: ReconciliationConfig = "mismatch_window = \"disabled\"".parse().unwrap();
        assert!(!disabled.mismatch_window.is_enabled());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(matches!(
            ReconciliationConfig::from_toml_str("tolerance = \"-1\""),
            Err(ReconciliationError::Configuration(_))
        ));
        assert!(matches!(
            ReconciliationConfig::from_toml_str("mismatch_window = { days = 0 }"),
            Err(ReconciliationError::Configuration(_))
        ));
        assert!(matches!(
            ReconciliationConfig::from_toml_str("reporting_currency = \"dollars\""),
            Err(ReconciliationError::Configuration(_))
        ));
        assert!(matches!(
            ReconciliationConfig::from_toml_str("tolerance = "),
            Err(ReconciliationError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = ReconciliationConfig::from_file("/nonexistent/reconciliation.toml");
        assert!(matches!(result, Err(ReconciliationError::Configuration(_))));
    }

    #[test]
    fn test_window_periods() {
        assert!(MismatchWindow::SameMonth.contains(date(2024, 1, 10), date(2024, 1, 31)));
        assert!(!MismatchWindow::SameMonth.contains(date(2024, 1, 31), date(2024, 2, 1)));
        assert!(!MismatchWindow::SameMonth.contains(date(2023, 1, 10), date(2024, 1, 10)));

        assert!(MismatchWindow::SameQuarter.contains(date(2024, 1, 1), date(2024, 3, 31)));
        assert!(!MismatchWindow::SameQuarter.contains(date(2024, 3, 31), date(2024, 4, 1)));

        assert!(MismatchWindow::SameYear.contains(date(2024, 1, 1), date(2024, 12, 31)));

        assert!(MismatchWindow::Days(3).contains(date(2024, 1, 30), date(2024, 2, 2)));
        assert!(!MismatchWindow::Days(3).contains(date(2024, 1, 30), date(2024, 2, 3)));

        assert!(!MismatchWindow::Disabled.contains(date(2024, 1, 1), date(2024, 1, 1)));
    }

    #[test]
    fn test_within_tolerance() {
        let config = ReconciliationConfig::default();
        let hundred = BigDecimal::from(100);
        assert!(config.within_tolerance(&hundred, &BigDecimal::from_str("100.01").unwrap()));
        assert!(config.within_tolerance(&hundred, &BigDecimal::from_str("99.99").unwrap()));
        assert!(!config.within_tolerance(&hundred, &BigDecimal::from_str("100.02").unwrap()));
    }
}
