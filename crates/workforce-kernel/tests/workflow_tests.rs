use pretty_assertions::assert_eq;
use workforce_kernel::error::{KernelError, SessionError, WorkflowError};
use workforce_kernel::*;
use workforce_test_utils::{date, demo_handle, hr_handle, signed_in_handle};

#[test]
fn test_profile_change_patches_only_payload_fields() {
    let kernel = demo_handle();
    let john_before = kernel.employee(&"5".into()).unwrap();

    let change = kernel
        .submit_request(NewRequest::profile_change(
            &john_before,
            ProfilePatch::default().address("X"),
        ))
        .unwrap();
    assert_eq!(change.status, RequestStatus::Pending);
    assert_eq!(change.title, "Update Personal Data");
    assert_eq!(change.details, "Address: X");

    let outcome = kernel.decide(&change.id, Decision::Approved).unwrap();

    let john_after = kernel.employee(&"5".into()).unwrap();
    let mut expected = john_before.clone();
    expected.address = "X".to_string();
    assert_eq!(john_after, expected);
    assert_eq!(outcome.patched_employee, Some(expected));
}

#[test]
fn test_own_profile_change_is_visible_to_session() {
    let kernel = hr_handle();
    let anna = kernel.current_identity().unwrap();

    let change = kernel
        .submit_request(NewRequest::profile_change(
            &anna,
            ProfilePatch::default().address("X").phone("+49 30 000"),
        ))
        .unwrap();
    kernel.decide(&change.id, Decision::Approved).unwrap();

    let session = kernel.current_identity().unwrap();
    assert_eq!(session.address, "X");
    assert_eq!(session.phone, "+49 30 000");
    assert_eq!(session.iban, anna.iban);
    assert_eq!(session, kernel.employee(&anna.id).unwrap());
}

#[test]
fn test_other_employees_change_leaves_session_alone() {
    let kernel = hr_handle();
    let john = kernel.employee(&"5".into()).unwrap();
    let change = kernel
        .submit_request(NewRequest::profile_change(
            &john,
            ProfilePatch::default().address("Elsewhere"),
        ))
        .unwrap();
    kernel.decide(&change.id, Decision::Approved).unwrap();

    assert_eq!(kernel.current_identity().unwrap().address, "Torstraße 1, Berlin");
}

#[test]
fn test_rejected_profile_change_patches_nothing() {
    let kernel = demo_handle();
    let john = kernel.employee(&"5".into()).unwrap();
    let change = kernel
        .submit_request(NewRequest::profile_change(
            &john,
            ProfilePatch::default().iban("DE00"),
        ))
        .unwrap();
    let outcome = kernel.decide(&change.id, Decision::Rejected).unwrap();
    assert_eq!(outcome.patched_employee, None);
    assert_eq!(kernel.employee(&"5".into()).unwrap(), john);
}

#[test]
fn test_second_decision_is_rejected() {
    let kernel = demo_handle();
    kernel.decide(&"r2".into(), Decision::Approved).unwrap();

    let err = kernel.decide(&"r2".into(), Decision::Rejected).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Workflow(WorkflowError::InvalidTransition {
            kind: RequestKind::Expense,
            from: RequestStatus::Approved,
            to: RequestStatus::Rejected,
        })
    ));
    assert_eq!(
        kernel.request(&"r2".into()).unwrap().status,
        RequestStatus::Approved
    );
}

#[test]
fn test_ticket_assignment_round_trip() {
    let kernel = signed_in_handle("7");

    let ticket = kernel
        .move_ticket(&"r3".into(), RequestStatus::InProgress)
        .unwrap();
    assert_eq!(ticket.assignee_id(), Some(&EmployeeId::from("7")));
    assert_eq!(kernel.tickets_assigned_to(&"7".into()).len(), 2);

    let ticket = kernel.move_ticket(&"r3".into(), RequestStatus::Pending).unwrap();
    assert_eq!(ticket.status, RequestStatus::Pending);
    assert_eq!(ticket.assignee_id(), None);
}

#[test]
fn test_reopened_ticket_goes_to_next_agent() {
    let kernel = signed_in_handle("3");
    kernel.move_ticket(&"r4".into(), RequestStatus::Pending).unwrap();
    let reclaimed = kernel
        .move_ticket(&"r4".into(), RequestStatus::InProgress)
        .unwrap();
    assert_eq!(reclaimed.assignee_id(), Some(&EmployeeId::from("3")));
}

#[test]
fn test_resolved_ticket_is_terminal() {
    let kernel = signed_in_handle("7");
    kernel.move_ticket(&"r3".into(), RequestStatus::Resolved).unwrap();
    assert!(kernel.allowed_transitions(&"r3".into()).unwrap().is_empty());
    let err = kernel
        .move_ticket(&"r3".into(), RequestStatus::InProgress)
        .unwrap_err();
    assert!(matches!(
        err,
        KernelError::Workflow(WorkflowError::InvalidTransition { .. })
    ));
}

#[test]
fn test_ticket_triage_needs_identity() {
    let kernel = demo_handle();
    let err = kernel
        .move_ticket(&"r3".into(), RequestStatus::InProgress)
        .unwrap_err();
    assert!(matches!(err, KernelError::Session(SessionError::NotSignedIn)));
    assert_eq!(kernel.request(&"r3".into()).unwrap().assignee_id(), None);
}

#[test]
fn test_submitted_requests_start_pending() {
    let kernel = hr_handle();
    let john = kernel.employee(&"5".into()).unwrap();

    let leave = kernel
        .submit_request(NewRequest::leave(
            Requester::from(&john),
            "Sick Leave",
            date(2023, 12, 1),
            date(2023, 12, 3),
        ))
        .unwrap();
    let expense = kernel
        .submit_request(NewRequest::expense(
            Requester::from(&john),
            "42.10".parse().unwrap(),
            "Train ticket",
        ))
        .unwrap();
    let ticket = kernel
        .submit_request(NewRequest::ticket(Requester::from(&john), "No VPN"))
        .unwrap();

    assert_eq!(leave.details, "2023-12-01 to 2023-12-03");
    assert_eq!(expense.title, "Expense Reimbursement");
    assert_eq!(expense.amount().unwrap().to_string(), "42.10");
    assert_eq!(ticket.title, "IT Support Ticket");
    for request in [&leave, &expense, &ticket] {
        assert_eq!(request.status, RequestStatus::Pending);
    }
    assert_eq!(kernel.pending_requests().len(), 6);
}

#[test]
fn test_allowed_transitions_follow_kind() {
    let kernel = demo_handle();
    assert_eq!(
        kernel.allowed_transitions(&"r1".into()).unwrap(),
        vec![RequestStatus::Approved, RequestStatus::Rejected]
    );
    assert_eq!(
        kernel.allowed_transitions(&"r4".into()).unwrap(),
        vec![RequestStatus::Resolved, RequestStatus::Pending]
    );
}
