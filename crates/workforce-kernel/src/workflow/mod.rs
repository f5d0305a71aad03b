//! Request lifecycle: submission, approval decisions and ticket triage.
//!
//! Every function validates completely before touching the store, so a
//! rejected command leaves all entities as they were.

pub mod state_machine;

use crate::error::{KernelError, LookupError, WorkflowError};
use crate::store::EntityStore;
use crate::types::*;
use chrono::NaiveDate;

/// Result of an approval decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub request: Request,
    /// The requester's record after a profile change was merged into it.
    pub patched_employee: Option<Employee>,
}

/// Store a new Pending request.
///
/// A requester back-reference, when present, must point at an existing
/// employee; profile changes must carry one.
pub fn submit(
    store: &mut EntityStore,
    new: NewRequest,
    id: RequestId,
    submitted_on: NaiveDate,
) -> Result<Request, KernelError> {
    if let Some(employee_id) = &new.requester.employee_id {
        store.require_employee(employee_id)?;
    } else if new.body.kind() == RequestKind::ProfileChange {
        return Err(LookupError::MissingRequester(id).into());
    }

    let request = new.into_request(id, submitted_on);
    store.put_request(request.clone());
    Ok(request)
}

/// Approve or reject a Pending leave, expense or profile-change request.
pub fn decide(
    store: &mut EntityStore,
    request_id: &RequestId,
    decision: Decision,
) -> Result<DecisionOutcome, KernelError> {
    let mut request = store.require_request(request_id)?.clone();
    let to = RequestStatus::from(decision);
    state_machine::validate_transition(request.kind(), request.status, to)?;

    let patched_employee = match (&request.body, decision) {
        (RequestBody::ProfileChange { patch }, Decision::Approved) => {
            let target = request
                .requester
                .employee_id
                .clone()
                .ok_or_else(|| LookupError::MissingRequester(request_id.clone()))?;
            let mut employee = store.require_employee(&target)?.clone();
            patch.apply_to(&mut employee);
            store.put_employee(employee.clone());
            Some(employee)
        }
        _ => None,
    };

    state_machine::assert_applied_transition(request.kind(), request.status, to);
    request.status = to;
    store.put_request(request.clone());

    Ok(DecisionOutcome {
        request,
        patched_employee,
    })
}

/// Move a ticket through triage on behalf of `agent`.
///
/// Entering `InProgress` assigns the agent unless someone already owns the
/// ticket; returning to `Pending` clears the assignee.
pub fn move_ticket(
    store: &mut EntityStore,
    request_id: &RequestId,
    to: RequestStatus,
    agent: &EmployeeId,
) -> Result<Request, KernelError> {
    let mut request = store.require_request(request_id)?.clone();
    let (kind, from) = (request.kind(), request.status);
    let RequestBody::Ticket { assignee_id } = &mut request.body else {
        return Err(WorkflowError::InvalidTransition { kind, from, to }.into());
    };
    state_machine::validate_transition(kind, from, to)?;

    match to {
        RequestStatus::InProgress if assignee_id.is_none() => {
            *assignee_id = Some(agent.clone());
        }
        RequestStatus::Pending => {
            *assignee_id = None;
        }
        _ => {}
    }

    state_machine::assert_applied_transition(kind, from, to);
    request.status = to;
    store.put_request(request.clone());
    Ok(request)
}
