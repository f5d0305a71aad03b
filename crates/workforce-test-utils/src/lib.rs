//! Testing utilities for the workforce workspace
//!
//! Shared fixtures: the demo handle, signed-in sessions and generated
//! reporting chains.

#![allow(missing_docs)]

use chrono::NaiveDate;
use workforce_kernel::seed;
use workforce_kernel::store::EntityStore;
use workforce_kernel::{
    ContractType, Employee, EmployeeId, EmployeeStatus, Role, SessionControl, WorkforceConfig,
    WorkforceHandle,
};

/// Handle over the demo data set with default configuration and nobody
/// signed in.
pub fn demo_handle() -> WorkforceHandle {
    WorkforceHandle::from_store(seed::demo_store(), WorkforceConfig::default())
}

/// Demo handle with `employee` signed in.
pub fn signed_in_handle(employee: &str) -> WorkforceHandle {
    let handle = demo_handle();
    handle.sign_in(&EmployeeId::from(employee)).unwrap();
    handle
}

/// Demo handle with the console's default identity (HR) signed in.
pub fn hr_handle() -> WorkforceHandle {
    signed_in_handle(seed::DEMO_SIGNED_IN)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Minimal employee record with the given id and manager.
pub fn employee(id: &str, manager: Option<&str>) -> Employee {
    Employee {
        id: id.into(),
        name: format!("Person {id}"),
        role: Role::Employee,
        avatar: "P".to_string(),
        department: "Engineering".to_string(),
        location: "Berlin".to_string(),
        manager_id: manager.map(EmployeeId::from),
        status: EmployeeStatus::Active,
        email: format!("{id}@acme.com"),
        phone: String::new(),
        start_date: date(2023, 1, 1),
        contract_type: ContractType::FullTime,
        vacation_entitlement: 30,
        vacation_used: 0,
        sick_days: 0,
        address: String::new(),
        emergency_contact: String::new(),
        iban: String::new(),
    }
}

/// A straight reporting line `c0 <- c1 <- ... <- c{len-1}`.
pub fn chain_store(len: usize) -> EntityStore {
    let mut store = EntityStore::new();
    for i in 0..len {
        let manager = (i > 0).then(|| format!("c{}", i - 1));
        store.put_employee(employee(&format!("c{i}"), manager.as_deref()));
    }
    store
}

/// `count` employees with no manager, ids `f0..`.
pub fn flat_store(count: usize) -> EntityStore {
    let mut store = EntityStore::new();
    for i in 0..count {
        store.put_employee(employee(&format!("f{i}"), None));
    }
    store
}

/// Ids of `employees`, in order.
pub fn ids<'a>(employees: impl IntoIterator<Item = &'a Employee>) -> Vec<String> {
    employees.into_iter().map(|e| e.id.to_string()).collect()
}
