//! In-memory entity store.
//!
//! Owns the canonical id -> entity maps. It has no behaviour beyond storage
//! and lookup; invariants are enforced by the managers that mutate it.
//! Insertion order is preserved so listings match the order entities were
//! created in.

use crate::error::LookupError;
use crate::types::*;
use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    employees: IndexMap<EmployeeId, Employee>,
    requests: IndexMap<RequestId, Request>,
    assets: IndexMap<AssetId, Asset>,
    payroll: IndexMap<EmployeeId, PayrollEntry>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- employees ---

    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.get(id)
    }

    pub fn employee_mut(&mut self, id: &EmployeeId) -> Option<&mut Employee> {
        self.employees.get_mut(id)
    }

    pub fn require_employee(&self, id: &EmployeeId) -> Result<&Employee, LookupError> {
        self.employee(id)
            .ok_or_else(|| LookupError::EmployeeNotFound(id.clone()))
    }

    pub fn contains_employee(&self, id: &EmployeeId) -> bool {
        self.employees.contains_key(id)
    }

    /// Insert or replace an employee by id.
    pub fn put_employee(&mut self, employee: Employee) {
        self.employees.insert(employee.id.clone(), employee);
    }

    pub fn employees(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    pub fn employees_where<P>(&self, mut predicate: P) -> Vec<&Employee>
    where
        P: FnMut(&Employee) -> bool,
    {
        self.employees.values().filter(|e| predicate(*e)).collect()
    }

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    // --- requests ---

    pub fn request(&self, id: &RequestId) -> Option<&Request> {
        self.requests.get(id)
    }

    pub fn require_request(&self, id: &RequestId) -> Result<&Request, LookupError> {
        self.request(id)
            .ok_or_else(|| LookupError::RequestNotFound(id.clone()))
    }

    pub fn put_request(&mut self, request: Request) {
        self.requests.insert(request.id.clone(), request);
    }

    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.requests.values()
    }

    pub fn requests_where<P>(&self, mut predicate: P) -> Vec<&Request>
    where
        P: FnMut(&Request) -> bool,
    {
        self.requests.values().filter(|r| predicate(*r)).collect()
    }

    pub fn requests_of_kind(&self, kind: RequestKind) -> Vec<&Request> {
        self.requests_where(move |r| r.kind() == kind)
    }

    pub fn pending_requests(&self) -> Vec<&Request> {
        self.requests_where(|r| r.status == RequestStatus::Pending)
    }

    pub fn tickets_assigned_to(&self, agent: &EmployeeId) -> Vec<&Request> {
        self.requests_where(|r| r.assignee_id() == Some(agent))
    }

    // --- assets ---

    pub fn asset(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.get(id)
    }

    pub fn require_asset(&self, id: &AssetId) -> Result<&Asset, LookupError> {
        self.asset(id)
            .ok_or_else(|| LookupError::AssetNotFound(id.clone()))
    }

    pub fn put_asset(&mut self, asset: Asset) {
        self.assets.insert(asset.id.clone(), asset);
    }

    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn assets_held_by(&self, employee: &EmployeeId) -> Vec<&Asset> {
        self.assets
            .values()
            .filter(|a| a.assigned_to.as_ref() == Some(employee))
            .collect()
    }

    // --- payroll ---

    pub fn payroll_entry(&self, employee: &EmployeeId) -> Option<&PayrollEntry> {
        self.payroll.get(employee)
    }

    pub fn require_payroll_entry(&self, employee: &EmployeeId) -> Result<&PayrollEntry, LookupError> {
        self.payroll_entry(employee)
            .ok_or_else(|| LookupError::PayrollEntryNotFound(employee.clone()))
    }

    /// Insert or replace the entry keyed by its employee id.
    pub fn put_payroll_entry(&mut self, entry: PayrollEntry) {
        self.payroll.insert(entry.employee_id.clone(), entry);
    }

    pub fn payroll_entries(&self) -> impl Iterator<Item = &PayrollEntry> {
        self.payroll.values()
    }

    pub fn payroll_entries_mut(&mut self) -> impl Iterator<Item = &mut PayrollEntry> {
        self.payroll.values_mut()
    }
}
