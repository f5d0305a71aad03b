//! Kernel configuration.
//!
//! Every field has a default matching the console's behaviour, so an empty
//! TOML document (or none at all) yields a working setup.

use crate::error::ConfigError;
use crate::types::{ContractType, Currency, EmployeeStatus};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkforceConfig {
    pub employee_defaults: EmployeeDefaults,
    pub payroll: PayrollConfig,
    pub audit: AuditConfig,
}

impl Default for WorkforceConfig {
    fn default() -> Self {
        Self {
            employee_defaults: EmployeeDefaults::default(),
            payroll: PayrollConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl WorkforceConfig {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    #[inline]
    #[must_use]
    pub fn with_default_location(mut self, location: impl Into<String>) -> Self {
        self.employee_defaults.location = location.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit.enabled = enabled;
        self
    }
}

/// Values applied to employees created through the "new employee" command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeDefaults {
    pub location: String,
    pub status: EmployeeStatus,
    pub contract_type: ContractType,
    pub vacation_entitlement: u32,
}

impl Default for EmployeeDefaults {
    fn default() -> Self {
        Self {
            location: "Berlin".to_string(),
            status: EmployeeStatus::Onboarding,
            contract_type: ContractType::FullTime,
            vacation_entitlement: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    pub default_currency: Currency,
    /// Day of month salaries are paid out; clamped to the month's length.
    pub payout_day: u32,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::Eur,
            payout_day: 28,
        }
    }
}

impl PayrollConfig {
    /// The first payout date on or after `today`.
    pub fn next_payout_date(&self, today: NaiveDate) -> NaiveDate {
        let this_month = payout_in_month(today.year(), today.month(), self.payout_day);
        if this_month >= today {
            return this_month;
        }
        let (year, month) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        payout_in_month(year, month, self.payout_day)
    }
}

fn payout_in_month(year: i32, month: u32, day: u32) -> NaiveDate {
    let mut day = day.clamp(1, 31);
    loop {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return date;
        }
        day -= 1;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Record every command in the hash-chained event log.
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = WorkforceConfig::from_toml_str("").unwrap();
        assert_eq!(config, WorkforceConfig::default());
        assert_eq!(config.employee_defaults.location, "Berlin");
        assert_eq!(config.employee_defaults.vacation_entitlement, 30);
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = WorkforceConfig::from_toml_str(
            r#"
            [employee_defaults]
            location = "London"

            [payroll]
            default_currency = "GBP"
            "#,
        )
        .unwrap();
        assert_eq!(config.employee_defaults.location, "London");
        assert_eq!(config.employee_defaults.status, EmployeeStatus::Onboarding);
        assert_eq!(config.payroll.default_currency, Currency::Gbp);
        assert_eq!(config.payroll.payout_day, 28);
        assert!(config.audit.enabled);
    }

    #[test]
    fn payout_date_rolls_and_clamps() {
        let payroll = PayrollConfig {
            payout_day: 31,
            ..PayrollConfig::default()
        };
        let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        assert_eq!(
            payroll.next_payout_date(feb),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        let late_dec = NaiveDate::from_ymd_opt(2023, 12, 29).unwrap();
        assert_eq!(
            PayrollConfig::default().next_payout_date(late_dec),
            NaiveDate::from_ymd_opt(2024, 1, 28).unwrap()
        );
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = WorkforceConfig::from_toml_str("audit = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
