use super::{Amount, Employee, EmployeeId, RequestId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestKind {
    Leave,
    Expense,
    Ticket,
    ProfileChange,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::Leave => "leave",
            RequestKind::Expense => "expense",
            RequestKind::Ticket => "ticket",
            RequestKind::ProfileChange => "profile-change",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Approved,
    Rejected,
    Resolved,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RequestStatus::Approved | RequestStatus::Rejected | RequestStatus::Resolved
        )
    }
}

/// Outcome of an approval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl From<Decision> for RequestStatus {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Approved => RequestStatus::Approved,
            Decision::Rejected => RequestStatus::Rejected,
        }
    }
}

/// Fields an employee may ask HR to change on their own record.
///
/// `None` leaves the field untouched; `Some` overwrites it, even with an
/// empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub address: Option<String>,
    pub phone: Option<String>,
    pub iban: Option<String>,
    pub emergency_contact: Option<String>,
}

impl ProfilePatch {
    #[must_use]
    pub fn address(mut self, value: impl Into<String>) -> Self {
        self.address = Some(value.into());
        self
    }

    #[must_use]
    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    #[must_use]
    pub fn iban(mut self, value: impl Into<String>) -> Self {
        self.iban = Some(value.into());
        self
    }

    #[must_use]
    pub fn emergency_contact(mut self, value: impl Into<String>) -> Self {
        self.emergency_contact = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("address", self.address.is_some()),
            ("phone", self.phone.is_some()),
            ("iban", self.iban.is_some()),
            ("emergency_contact", self.emergency_contact.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }

    /// Merge into `employee`, overwriting exactly the fields present.
    pub fn apply_to(&self, employee: &mut Employee) {
        if let Some(address) = &self.address {
            employee.address.clone_from(address);
        }
        if let Some(phone) = &self.phone {
            employee.phone.clone_from(phone);
        }
        if let Some(iban) = &self.iban {
            employee.iban.clone_from(iban);
        }
        if let Some(contact) = &self.emergency_contact {
            employee.emergency_contact.clone_from(contact);
        }
    }
}

/// Type-specific request data, one variant per request kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RequestBody {
    Leave {
        leave_type: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    Expense {
        amount: Amount,
    },
    Ticket {
        assignee_id: Option<EmployeeId>,
    },
    ProfileChange {
        patch: ProfilePatch,
    },
}

impl RequestBody {
    pub fn kind(&self) -> RequestKind {
        match self {
            RequestBody::Leave { .. } => RequestKind::Leave,
            RequestBody::Expense { .. } => RequestKind::Expense,
            RequestBody::Ticket { .. } => RequestKind::Ticket,
            RequestBody::ProfileChange { .. } => RequestKind::ProfileChange,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    pub name: String,
    pub employee_id: Option<EmployeeId>,
}

impl Requester {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            employee_id: None,
        }
    }
}

impl From<&Employee> for Requester {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            employee_id: Some(employee.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub requester: Requester,
    pub title: String,
    pub details: String,
    pub submitted_on: NaiveDate,
    pub status: RequestStatus,
    pub body: RequestBody,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        self.body.kind()
    }

    pub fn assignee_id(&self) -> Option<&EmployeeId> {
        match &self.body {
            RequestBody::Ticket { assignee_id } => assignee_id.as_ref(),
            _ => None,
        }
    }

    pub fn amount(&self) -> Option<Amount> {
        match &self.body {
            RequestBody::Expense { amount } => Some(*amount),
            _ => None,
        }
    }

    pub fn profile_patch(&self) -> Option<&ProfilePatch> {
        match &self.body {
            RequestBody::ProfileChange { patch } => Some(patch),
            _ => None,
        }
    }
}

/// Input for the "submit request" command. Use the kind-specific
/// constructors; they fill title and details the way the console forms do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    pub requester: Requester,
    pub title: String,
    pub details: String,
    pub body: RequestBody,
}

impl NewRequest {
    pub fn leave(
        requester: Requester,
        leave_type: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let leave_type = leave_type.into();
        Self {
            requester,
            title: leave_type.clone(),
            details: format!("{start} to {end}"),
            body: RequestBody::Leave {
                leave_type,
                start,
                end,
            },
        }
    }

    pub fn expense(requester: Requester, amount: Amount, details: impl Into<String>) -> Self {
        Self {
            requester,
            title: "Expense Reimbursement".to_string(),
            details: details.into(),
            body: RequestBody::Expense { amount },
        }
    }

    pub fn ticket(requester: Requester, description: impl Into<String>) -> Self {
        Self {
            requester,
            title: "IT Support Ticket".to_string(),
            details: description.into(),
            body: RequestBody::Ticket { assignee_id: None },
        }
    }

    /// Profile changes always target the requesting employee's own record.
    pub fn profile_change(employee: &Employee, patch: ProfilePatch) -> Self {
        let details = format!("Address: {}", patch.address.as_deref().unwrap_or(""));
        Self {
            requester: Requester::from(employee),
            title: "Update Personal Data".to_string(),
            details,
            body: RequestBody::ProfileChange { patch },
        }
    }

    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Materialize as a Pending request. Tickets never start assigned.
    pub fn into_request(self, id: RequestId, submitted_on: NaiveDate) -> Request {
        let body = match self.body {
            RequestBody::Ticket { .. } => RequestBody::Ticket { assignee_id: None },
            other => other,
        };
        Request {
            id,
            requester: self.requester,
            title: self.title,
            details: self.details,
            submitted_on,
            status: RequestStatus::Pending,
            body,
        }
    }
}
