use proptest::prelude::*;
use workforce_kernel::types::{PayrollStatus, RequestKind, RequestStatus};
use workforce_kernel::workflow::state_machine::{
    allowed_payroll_transitions, allowed_transitions, validate_payroll_transition,
    validate_transition,
};

#[test]
fn test_approval_transitions() {
    for kind in [RequestKind::Leave, RequestKind::Expense, RequestKind::ProfileChange] {
        assert!(validate_transition(kind, RequestStatus::Pending, RequestStatus::Approved).is_ok());
        assert!(validate_transition(kind, RequestStatus::Pending, RequestStatus::Rejected).is_ok());

        // Invalid
        assert!(validate_transition(kind, RequestStatus::Pending, RequestStatus::InProgress).is_err());
        assert!(validate_transition(kind, RequestStatus::Approved, RequestStatus::Rejected).is_err());
    }
}

#[test]
fn test_ticket_transitions() {
    let t = RequestKind::Ticket;
    assert!(validate_transition(t, RequestStatus::Pending, RequestStatus::InProgress).is_ok());
    assert!(validate_transition(t, RequestStatus::Pending, RequestStatus::Resolved).is_ok());
    assert!(validate_transition(t, RequestStatus::InProgress, RequestStatus::Pending).is_ok());
    assert!(validate_transition(t, RequestStatus::InProgress, RequestStatus::Resolved).is_ok());

    assert!(validate_transition(t, RequestStatus::Pending, RequestStatus::Approved).is_err());
    assert!(validate_transition(t, RequestStatus::Resolved, RequestStatus::Pending).is_err());
}

#[test]
fn test_payroll_transitions() {
    assert!(validate_payroll_transition(PayrollStatus::Draft, PayrollStatus::Approved).is_ok());
    assert!(validate_payroll_transition(PayrollStatus::Approved, PayrollStatus::Paid).is_ok());
    assert!(validate_payroll_transition(PayrollStatus::Draft, PayrollStatus::Paid).is_err());
    assert!(allowed_payroll_transitions(PayrollStatus::Paid).is_empty());
}

fn any_status() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::Pending),
        Just(RequestStatus::InProgress),
        Just(RequestStatus::Approved),
        Just(RequestStatus::Rejected),
        Just(RequestStatus::Resolved),
    ]
}

fn any_kind() -> impl Strategy<Value = RequestKind> {
    prop_oneof![
        Just(RequestKind::Leave),
        Just(RequestKind::Expense),
        Just(RequestKind::Ticket),
        Just(RequestKind::ProfileChange),
    ]
}

proptest! {
    #[test]
    fn prop_all_transitions_are_subset_of_allowed(
        kind in any_kind(),
        from in any_status(),
        to in any_status(),
    ) {
        let res = validate_transition(kind, from, to);
        let allowed = allowed_transitions(kind, from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }

    #[test]
    fn prop_terminal_statuses_have_no_exits(kind in any_kind(), from in any_status()) {
        if from.is_terminal() {
            prop_assert!(allowed_transitions(kind, from).is_empty());
        }
    }
}
