use crate::assets::AssetOverride;
use crate::error::{KernelError, LogError};
use crate::hierarchy::OrgNode;
use crate::logging::Event;
use crate::payroll::{PayrollRunSummary, PayrollTotals};
use crate::types::*;
use crate::workflow::DecisionOutcome;

pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

pub const KERNEL_API_VERSION: ApiVersion = ApiVersion {
    major: 1,
    minor: 0,
    patch: 0,
};

pub trait HierarchyManager {
    /// Move `child` under `new_manager`; returns the previous manager.
    fn reparent(
        &self,
        child: &EmployeeId,
        new_manager: &EmployeeId,
    ) -> Result<Option<EmployeeId>, KernelError>;
    fn roots(&self) -> Vec<Employee>;
    fn direct_reports(&self, manager: &EmployeeId) -> Vec<Employee>;
    fn is_descendant(&self, ancestor: &EmployeeId, id: &EmployeeId) -> bool;
    fn chain_of_command(&self, id: &EmployeeId) -> Result<Vec<Employee>, KernelError>;
    fn subordinates(&self, id: &EmployeeId) -> Result<Vec<Employee>, KernelError>;
    fn org_chart(&self) -> Vec<OrgNode>;
}

pub trait RequestWorkflow {
    fn submit_request(&self, new: NewRequest) -> Result<Request, KernelError>;
    fn decide(&self, request: &RequestId, decision: Decision)
        -> Result<DecisionOutcome, KernelError>;
    /// Ticket triage on behalf of the signed-in identity.
    fn move_ticket(&self, request: &RequestId, to: RequestStatus) -> Result<Request, KernelError>;
    fn allowed_transitions(&self, request: &RequestId) -> Result<Vec<RequestStatus>, KernelError>;
}

pub trait PayrollManager {
    fn run_payroll(&self) -> PayrollRunSummary;
    fn update_payroll(
        &self,
        employee: &EmployeeId,
        bonus: i64,
        deductions: i64,
    ) -> Result<PayrollEntry, KernelError>;
    fn approve_payroll(&self, employee: &EmployeeId) -> Result<PayrollEntry, KernelError>;
    fn payroll_totals(&self) -> PayrollTotals;
}

pub trait AssetLifecycle {
    fn add_asset(&self, new: NewAsset) -> Result<Asset, KernelError>;
    fn assign_asset(&self, asset: &AssetId, employee: &EmployeeId) -> Result<Asset, KernelError>;
    fn return_asset(&self, asset: &AssetId) -> Result<Asset, KernelError>;
    fn override_asset_status(
        &self,
        asset: &AssetId,
        status: AssetOverride,
    ) -> Result<Asset, KernelError>;
}

pub trait EntityRegistry {
    fn add_employee(&self, new: NewEmployee) -> Result<Employee, KernelError>;
    fn employee(&self, id: &EmployeeId) -> Option<Employee>;
    fn employees(&self) -> Vec<Employee>;
    fn request(&self, id: &RequestId) -> Option<Request>;
    fn requests(&self) -> Vec<Request>;
    fn pending_requests(&self) -> Vec<Request>;
    fn tickets_assigned_to(&self, agent: &EmployeeId) -> Vec<Request>;
    fn asset(&self, id: &AssetId) -> Option<Asset>;
    fn assets(&self) -> Vec<Asset>;
    fn assets_held_by(&self, employee: &EmployeeId) -> Vec<Asset>;
    fn payroll_entry(&self, employee: &EmployeeId) -> Option<PayrollEntry>;
    fn payroll_entries(&self) -> Vec<PayrollEntry>;
}

pub trait SessionControl {
    fn sign_in(&self, employee: &EmployeeId) -> Result<Employee, KernelError>;
    fn sign_out(&self);
    fn current_identity(&self) -> Option<Employee>;
}

pub trait EventLogger {
    fn events(&self) -> Vec<Event>;
    /// Number of verified events.
    fn verify_integrity(&self) -> Result<usize, LogError>;
}
