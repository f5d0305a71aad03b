//! Core entity types shared by every manager.
//!
//! Identifiers are opaque string newtypes so the seeded data set can keep
//! short human ids (`"4"`, `"r1"`, `"a2"`) while freshly created entities get
//! a generated UUID.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

mod request;

pub use request::*;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Generate a fresh random identifier
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Employee identifier
    EmployeeId
);
string_id!(
    /// Request identifier (leave, expense, ticket, profile change)
    RequestId
);
string_id!(
    /// Physical asset identifier
    AssetId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Individual contributor
    Employee,
    Hr,
    Recruiter,
    Manager,
    Ceo,
    Vp,
    ItAdmin,
}

impl Role {
    pub fn is_executive(self) -> bool {
        matches!(self, Role::Ceo | Role::Vp)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    Onboarding,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    Contractor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub role: Role,
    pub avatar: String,
    pub department: String,
    pub location: String,
    pub manager_id: Option<EmployeeId>,
    pub status: EmployeeStatus,
    pub email: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub contract_type: ContractType,
    pub vacation_entitlement: u32,
    pub vacation_used: u32,
    pub sick_days: u32,
    pub address: String,
    pub emergency_contact: String,
    pub iban: String,
}

impl Employee {
    pub fn is_root(&self) -> bool {
        self.manager_id.is_none()
    }

    pub fn vacation_remaining(&self) -> u32 {
        self.vacation_entitlement.saturating_sub(self.vacation_used)
    }
}

/// Compensation attached to a new hire; creates their Draft payroll entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compensation {
    pub base_salary: i64,
    /// `None` pays in the configured default currency.
    pub currency: Option<Currency>,
}

/// Input for the "new employee" command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub role: Role,
    pub department: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub manager_id: Option<EmployeeId>,
    pub compensation: Option<Compensation>,
}

impl NewEmployee {
    pub fn new(
        name: impl Into<String>,
        role: Role,
        department: impl Into<String>,
        email: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            role,
            department: department.into(),
            email: email.into(),
            start_date,
            manager_id: None,
            compensation: None,
        }
    }

    #[must_use]
    pub fn reporting_to(mut self, manager_id: EmployeeId) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    #[must_use]
    pub fn with_compensation(mut self, base_salary: i64, currency: Currency) -> Self {
        self.compensation = Some(Compensation {
            base_salary,
            currency: Some(currency),
        });
        self
    }

    #[must_use]
    pub fn with_base_salary(mut self, base_salary: i64) -> Self {
        self.compensation = Some(Compensation {
            base_salary,
            currency: None,
        });
        self
    }
}

/// Uppercased first letter of the name; empty names get `?`.
pub fn avatar_for(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayrollStatus {
    Draft,
    Approved,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub employee_id: EmployeeId,
    pub base_salary: i64,
    pub bonus: i64,
    pub deductions: i64,
    pub currency: Currency,
    pub status: PayrollStatus,
    pub payout_date: NaiveDate,
}

impl PayrollEntry {
    /// Net payout. Derived from the components on every call and clamped to
    /// the `i64` range.
    pub fn net(&self) -> i64 {
        let net = i128::from(self.base_salary) + i128::from(self.bonus)
            - i128::from(self.deductions);
        i64::try_from(net).unwrap_or(if net > 0 { i64::MAX } else { i64::MIN })
    }

    /// Net payout, or `None` when the components do not fit in an `i64`.
    pub fn checked_net(&self) -> Option<i64> {
        self.base_salary
            .checked_add(self.bonus)?
            .checked_sub(self.deductions)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Laptop,
    Monitor,
    Phone,
    Peripheral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetStatus {
    #[serde(rename = "In Use")]
    InUse,
    Available,
    Repair,
    Retired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub kind: AssetKind,
    pub model: String,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub status: AssetStatus,
    pub assigned_to: Option<EmployeeId>,
}

impl Asset {
    /// `assigned_to` is set exactly when the asset is in use.
    pub fn is_consistent(&self) -> bool {
        (self.status == AssetStatus::InUse) == self.assigned_to.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAsset {
    pub kind: AssetKind,
    pub model: String,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub status: AssetStatus,
    pub assigned_to: Option<EmployeeId>,
}

impl NewAsset {
    /// An unassigned asset entering inventory as Available.
    pub fn available(
        kind: AssetKind,
        model: impl Into<String>,
        serial_number: impl Into<String>,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            model: model.into(),
            serial_number: serial_number.into(),
            purchase_date,
            status: AssetStatus::Available,
            assigned_to: None,
        }
    }
}

/// Fixed-point money amount in minor units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl Amount {
    pub fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub fn minor_units(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount: {0:?}")]
pub struct AmountParseError(pub String);

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AmountParseError(s.to_string());
        let trimmed = s.trim();
        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() || frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let whole: u64 = whole.parse().map_err(|_| err())?;
        let cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| err())? * 10,
            _ => frac.parse().map_err(|_| err())?,
        };
        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(cents))
            .map(Amount)
            .ok_or_else(err)
    }
}
