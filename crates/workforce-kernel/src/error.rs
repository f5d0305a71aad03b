//! Error taxonomy for the workforce kernel.
//!
//! Rule violations (`Hierarchy`, `Workflow`, `Asset`, `Session`) are local,
//! recoverable and meant to be shown to the user. `Lookup` errors mean the
//! caller referenced an id that does not exist, which is a programming error
//! in the presentation layer.

use crate::types::{
    AssetId, AssetStatus, EmployeeId, PayrollStatus, RequestId, RequestKind, RequestStatus,
};

#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("log error: {0}")]
    Log(#[from] LogError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl KernelError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            KernelError::Hierarchy(_)
            | KernelError::Workflow(_)
            | KernelError::Asset(_)
            | KernelError::Session(_) => true,
            KernelError::Lookup(_) | KernelError::Config(_) => false,
            KernelError::Log(LogError::IntegrityViolation { .. }) => false,
        }
    }

    /// Validation failures the presentation layer should explain to the user.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            KernelError::Hierarchy(_)
                | KernelError::Workflow(_)
                | KernelError::Asset(_)
                | KernelError::Session(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HierarchyError {
    #[error("an employee cannot manage themselves")]
    SelfAssignment,

    #[error("cannot move an employee under one of their own reports")]
    CycleDetected,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("{kind} request cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        kind: RequestKind,
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("payroll entry cannot move from {from:?} to {to:?}")]
    InvalidPayrollTransition {
        from: PayrollStatus,
        to: PayrollStatus,
    },

    #[error("net payout out of range (bonus {bonus}, deductions {deductions})")]
    PayrollOutOfRange { bonus: i64, deductions: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("asset is not available (currently {status:?})")]
    NotAvailable { status: AssetStatus },

    #[error("asset is not in use (currently {status:?})")]
    NotInUse { status: AssetStatus },

    #[error("asset status {status:?} does not match its assignment")]
    AssignmentMismatch { status: AssetStatus },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("asset not found: {0}")]
    AssetNotFound(AssetId),

    #[error("no payroll entry for employee {0}")]
    PayrollEntryNotFound(EmployeeId),

    #[error("profile change {0} has no requester employee")]
    MissingRequester(RequestId),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no signed-in identity")]
    NotSignedIn,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    #[error("audit chain broken at event {index}")]
    IntegrityViolation { index: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_violations_are_recoverable_and_user_facing() {
        let err = KernelError::from(HierarchyError::CycleDetected);
        assert!(err.is_recoverable());
        assert!(err.is_user_facing());
        assert_eq!(
            err.to_string(),
            "hierarchy error: cannot move an employee under one of their own reports"
        );
    }

    #[test]
    fn missing_ids_are_programming_errors() {
        let err = KernelError::from(LookupError::EmployeeNotFound(EmployeeId::from("x")));
        assert!(!err.is_recoverable());
        assert!(!err.is_user_facing());
    }
}
