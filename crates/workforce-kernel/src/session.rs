//! The acting identity of the console session.
//!
//! Holds a snapshot of the signed-in employee. Commands that rewrite that
//! employee's record (an approved profile change, a reparent) refresh the
//! snapshot in the same command.

use crate::error::SessionError;
use crate::types::{Employee, EmployeeId};

#[derive(Debug, Clone, Default)]
pub struct Session {
    identity: Option<Employee>,
}

impl Session {
    pub fn sign_in(&mut self, employee: Employee) {
        tracing::debug!(employee = %employee.id, "session identity set");
        self.identity = Some(employee);
    }

    pub fn sign_out(&mut self) {
        self.identity = None;
    }

    pub fn identity(&self) -> Option<&Employee> {
        self.identity.as_ref()
    }

    pub fn actor_id(&self) -> Result<&EmployeeId, SessionError> {
        self.identity
            .as_ref()
            .map(|e| &e.id)
            .ok_or(SessionError::NotSignedIn)
    }

    /// Replace the snapshot if `employee` is the signed-in identity.
    pub fn refresh(&mut self, employee: &Employee) -> bool {
        match &mut self.identity {
            Some(current) if current.id == employee.id => {
                current.clone_from(employee);
                true
            }
            _ => false,
        }
    }
}
