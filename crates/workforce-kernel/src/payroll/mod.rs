//! Payroll entries and the bulk payroll run.

use crate::error::{KernelError, WorkflowError};
use crate::store::EntityStore;
use crate::types::{Currency, EmployeeId, PayrollEntry, PayrollStatus};
use crate::workflow::state_machine;
use serde::Serialize;
use std::collections::BTreeMap;

/// Net payout per currency.
pub type PayrollTotals = BTreeMap<Currency, i64>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayrollRunSummary {
    /// Entries that were not already Paid before this run.
    pub newly_paid: usize,
    pub entries: usize,
    pub totals: PayrollTotals,
}

/// Pay every entry, whatever its current status. Always succeeds and is
/// idempotent.
pub fn run_payroll(store: &mut EntityStore) -> PayrollRunSummary {
    let mut newly_paid = 0;
    let mut entries = 0;
    for entry in store.payroll_entries_mut() {
        entries += 1;
        if entry.status != PayrollStatus::Paid {
            newly_paid += 1;
            entry.status = PayrollStatus::Paid;
        }
    }
    PayrollRunSummary {
        newly_paid,
        entries,
        totals: totals(store),
    }
}

/// Edit the variable components of an entry. Net is recomputed on read.
///
/// Any status may be edited and negative components are accepted; only a net
/// payout outside the `i64` range is rejected.
pub fn update_entry(
    store: &mut EntityStore,
    employee: &EmployeeId,
    bonus: i64,
    deductions: i64,
) -> Result<PayrollEntry, KernelError> {
    let mut entry = store.require_payroll_entry(employee)?.clone();
    entry.bonus = bonus;
    entry.deductions = deductions;
    if entry.checked_net().is_none() {
        return Err(WorkflowError::PayrollOutOfRange { bonus, deductions }.into());
    }
    store.put_payroll_entry(entry.clone());
    Ok(entry)
}

/// Review a Draft entry.
pub fn approve_entry(
    store: &mut EntityStore,
    employee: &EmployeeId,
) -> Result<PayrollEntry, KernelError> {
    let mut entry = store.require_payroll_entry(employee)?.clone();
    state_machine::validate_payroll_transition(entry.status, PayrollStatus::Approved)?;
    entry.status = PayrollStatus::Approved;
    store.put_payroll_entry(entry.clone());
    Ok(entry)
}

pub fn totals(store: &EntityStore) -> PayrollTotals {
    let mut totals = PayrollTotals::new();
    for entry in store.payroll_entries() {
        let total = totals.entry(entry.currency).or_insert(0);
        *total = total.saturating_add(entry.net());
    }
    totals
}
