use crate::error::WorkflowError;
use crate::types::{PayrollStatus, RequestKind, RequestStatus};

/// Validates a request status transition for the given request kind.
pub fn validate_transition(
    kind: RequestKind,
    from: RequestStatus,
    to: RequestStatus,
) -> Result<(), WorkflowError> {
    if allowed_transitions(kind, from).contains(&to) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidTransition { kind, from, to })
    }
}

/// Checked right before a status is written. With `strict-debug` enabled a
/// write that skipped `validate_transition` panics; otherwise a no-op.
pub(crate) fn assert_applied_transition(kind: RequestKind, from: RequestStatus, to: RequestStatus) {
    #[cfg(feature = "strict-debug")]
    assert!(
        allowed_transitions(kind, from).contains(&to),
        "Illegal {kind} transition written: {from:?} -> {to:?}"
    );
    #[cfg(not(feature = "strict-debug"))]
    let _ = (kind, from, to);
}

pub fn allowed_transitions(kind: RequestKind, from: RequestStatus) -> Vec<RequestStatus> {
    use RequestStatus::*;
    match kind {
        RequestKind::Leave | RequestKind::Expense | RequestKind::ProfileChange => match from {
            Pending => vec![Approved, Rejected],
            InProgress | Approved | Rejected | Resolved => vec![],
        },
        RequestKind::Ticket => match from {
            Pending => vec![InProgress, Resolved],
            InProgress => vec![Resolved, Pending],
            Approved | Rejected | Resolved => vec![],
        },
    }
}

pub fn validate_payroll_transition(
    from: PayrollStatus,
    to: PayrollStatus,
) -> Result<(), WorkflowError> {
    if allowed_payroll_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidPayrollTransition { from, to })
    }
}

pub fn allowed_payroll_transitions(from: PayrollStatus) -> Vec<PayrollStatus> {
    use PayrollStatus::*;
    match from {
        Draft => vec![Approved],
        Approved => vec![Paid],
        Paid => vec![],
    }
}
