//! Workforce Simulator - randomized command stream with invariant checks.
//!
//! Every generated command is classified up front against a snapshot of the
//! store (using an oracle independent of the managers), executed through the
//! public handle, and followed by a full invariant sweep.

use crate::api::*;
use crate::assets::AssetOverride;
use crate::config::WorkforceConfig;
use crate::error::{KernelError, LookupError};
use crate::handle::WorkforceHandle;
use crate::hierarchy;
use crate::seed;
use crate::store::EntityStore;
use crate::types::*;
use chrono::NaiveDate;
use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::HashMap;

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Total operations to execute
    pub total_operations: u64,
    /// Distribution of operation types
    pub operation_distribution: OperationDistribution,
    /// Start from a generated org of this size instead of the demo data set
    pub synthetic_employees: Option<usize>,
    /// Stop conditions
    pub stop_on_first_violation: bool,
    pub stop_on_error_count: Option<usize>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            total_operations: 1_000,
            operation_distribution: OperationDistribution::default(),
            synthetic_employees: None,
            stop_on_first_violation: true,
            stop_on_error_count: None,
        }
    }
}

/// Probability distribution for operation generation
#[derive(Debug, Clone)]
pub struct OperationDistribution {
    /// Commands a console user would normally issue
    pub valid_ops: f64,
    /// Legal but unusual commands (overrides, re-runs, reopened tickets)
    pub edge_cases: f64,
    /// Commands that must be rejected
    pub invalid_ops: f64,
}

impl Default for OperationDistribution {
    fn default() -> Self {
        Self {
            valid_ops: 0.70,
            edge_cases: 0.15,
            invalid_ops: 0.15,
        }
    }
}

/// All commands the simulator can generate
#[derive(Debug, Clone)]
pub enum SimulatedOperation {
    Reparent(EmployeeId, EmployeeId),
    AddEmployee(Option<EmployeeId>),
    SignIn(EmployeeId),

    SubmitLeave(EmployeeId),
    SubmitExpense(EmployeeId, Amount),
    SubmitTicket(EmployeeId),
    SubmitProfileChange(EmployeeId, ProfilePatch),
    Decide(RequestId, Decision),
    MoveTicket(RequestId, RequestStatus),

    AddAsset(Option<EmployeeId>),
    AssignAsset(AssetId, EmployeeId),
    ReturnAsset(AssetId),
    OverrideAsset(AssetId, AssetOverride),

    RunPayroll,
    UpdatePayroll(EmployeeId, i64, i64),
    ApprovePayroll(EmployeeId),

    VerifyIntegrity,
}

impl SimulatedOperation {
    pub fn name(&self) -> &'static str {
        match self {
            SimulatedOperation::Reparent(..) => "Reparent",
            SimulatedOperation::AddEmployee(..) => "AddEmployee",
            SimulatedOperation::SignIn(..) => "SignIn",
            SimulatedOperation::SubmitLeave(..) => "SubmitLeave",
            SimulatedOperation::SubmitExpense(..) => "SubmitExpense",
            SimulatedOperation::SubmitTicket(..) => "SubmitTicket",
            SimulatedOperation::SubmitProfileChange(..) => "SubmitProfileChange",
            SimulatedOperation::Decide(..) => "Decide",
            SimulatedOperation::MoveTicket(..) => "MoveTicket",
            SimulatedOperation::AddAsset(..) => "AddAsset",
            SimulatedOperation::AssignAsset(..) => "AssignAsset",
            SimulatedOperation::ReturnAsset(..) => "ReturnAsset",
            SimulatedOperation::OverrideAsset(..) => "OverrideAsset",
            SimulatedOperation::RunPayroll => "RunPayroll",
            SimulatedOperation::UpdatePayroll(..) => "UpdatePayroll",
            SimulatedOperation::ApprovePayroll(..) => "ApprovePayroll",
            SimulatedOperation::VerifyIntegrity => "VerifyIntegrity",
        }
    }
}

/// Expected result classification for an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedResult {
    ShouldSucceed,
    ShouldFail,
}

/// A violation detected during simulation
#[derive(Debug, Clone)]
pub enum Violation {
    /// Operation outcome didn't match expectation
    UnexpectedOutcome {
        operation_index: u64,
        operation: SimulatedOperation,
        expected: ExpectedResult,
        actual: Result<String, String>,
    },
    /// Invariant was violated
    Invariant(InvariantViolation),
}

/// A specific invariant violation
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    pub check: InvariantCheck,
    pub details: String,
}

/// Types of invariant checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantCheck {
    // Hierarchy
    ReportingLinesFormForest,
    NonEmptyOrgHasRoot,

    // Assets
    AssetAssignmentConsistent,

    // Requests
    PendingTicketsAreUnassigned,
    TerminalRequestsAreFrozen,

    // Payroll
    PaidEntriesStayPaid,

    // Session
    SessionContactDetailsAreCurrent,

    // Log
    HashChainIsUnbroken,
}

/// Statistics collected during simulation
#[derive(Debug, Clone, Default)]
pub struct OperationStats {
    pub total_operations: u64,
    pub successful_operations: u64,
    pub failed_operations: u64,
    pub invariant_violations: u64,
    pub operations_by_type: HashMap<&'static str, u64>,
}

impl OperationStats {
    pub fn record(&mut self, operation: &SimulatedOperation, result: &Result<String, String>) {
        self.total_operations += 1;
        *self.operations_by_type.entry(operation.name()).or_insert(0) += 1;

        match result {
            Ok(_) => self.successful_operations += 1,
            Err(_) => self.failed_operations += 1,
        }
    }
}

/// Final report from the simulator
#[derive(Debug, Clone)]
pub struct SimulatorReport {
    pub config: SimulatorConfig,
    pub stats: OperationStats,
    pub violations: Vec<Violation>,
    pub final_employee_count: usize,
    pub final_request_count: usize,
    pub events_logged: usize,
}

impl SimulatorReport {
    /// Check if simulation passed all criteria
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Generate a text report
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Workforce Simulator Report ===\n\n");
        report.push_str(&format!("Seed: {}\n", self.config.seed));
        report.push_str(&format!("Total Operations: {}\n", self.stats.total_operations));
        report.push_str(&format!("Successful: {}\n", self.stats.successful_operations));
        report.push_str(&format!("Rejected: {}\n", self.stats.failed_operations));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));
        report.push_str(&format!("Final Employees: {}\n", self.final_employee_count));
        report.push_str(&format!("Final Requests: {}\n", self.final_request_count));
        report.push_str(&format!("Events Logged: {}\n", self.events_logged));

        let mut by_type: Vec<_> = self.stats.operations_by_type.iter().collect();
        by_type.sort();
        report.push_str("\n=== Operations ===\n");
        for (name, count) in by_type {
            report.push_str(&format!("{name}: {count}\n"));
        }

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {:?}\n", i + 1, v));
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Run the Workforce Simulator
pub fn run_simulator(config: SimulatorConfig) -> SimulatorReport {
    let store = match config.synthetic_employees {
        Some(size) => synthetic_store(size, config.seed),
        None => seed::demo_store(),
    };
    let kernel = WorkforceHandle::from_store(store, WorkforceConfig::default());
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut stats = OperationStats::default();
    let mut violations = Vec::new();

    let first_identity = kernel
        .employee(&seed::DEMO_SIGNED_IN.into())
        .or_else(|| kernel.employees().into_iter().next());
    if let Some(identity) = first_identity {
        let _ = kernel.sign_in(&identity.id);
    }

    let mut before = kernel.snapshot();

    for i in 0..config.total_operations {
        let operation = generate_operation(&mut rng, &config.operation_distribution, &before);
        let signed_in = kernel.current_identity().is_some();
        let expected_result = classify_expected_result(&operation, &before, signed_in);

        let actual_result = execute_operation(&kernel, &operation);

        let outcome_matches = matches!(
            (expected_result, &actual_result),
            (ExpectedResult::ShouldSucceed, Ok(_)) | (ExpectedResult::ShouldFail, Err(_))
        );

        let actual_str: Result<String, String> = match &actual_result {
            Ok(s) => Ok(s.clone()),
            Err(e) => Err(e.to_string()),
        };

        stats.record(&operation, &actual_str);

        if !outcome_matches {
            tracing::error!(index = i, op = operation.name(), "unexpected outcome");
            violations.push(Violation::UnexpectedOutcome {
                operation_index: i,
                operation: operation.clone(),
                expected: expected_result,
                actual: actual_str,
            });

            if config.stop_on_first_violation {
                break;
            }
            if let Some(max_errors) = config.stop_on_error_count {
                if violations.len() >= max_errors {
                    break;
                }
            }
        }

        let after = kernel.snapshot();
        if let Err(inv_violations) = WorkforceInvariants::check_all(&kernel, &before, &after) {
            stats.invariant_violations += inv_violations.len() as u64;
            violations.extend(inv_violations.into_iter().map(Violation::Invariant));
            if config.stop_on_first_violation {
                break;
            }
        }
        before = after;
    }

    SimulatorReport {
        stats,
        violations,
        final_employee_count: before.employee_count(),
        final_request_count: before.requests().count(),
        events_logged: kernel.events().len(),
        config,
    }
}

fn pick<T: Clone>(rng: &mut StdRng, items: &[T]) -> Option<T> {
    items.choose(rng).cloned()
}

fn employee_ids(store: &EntityStore) -> Vec<EmployeeId> {
    store.employees().map(|e| e.id.clone()).collect()
}

fn request_ids_where(store: &EntityStore, f: impl Fn(&Request) -> bool) -> Vec<RequestId> {
    store.requests_where(f).into_iter().map(|r| r.id.clone()).collect()
}

fn asset_ids_where(store: &EntityStore, f: impl Fn(&Asset) -> bool) -> Vec<AssetId> {
    store.assets().filter(|a| f(*a)).map(|a| a.id.clone()).collect()
}

/// Generate a random operation based on the distribution
fn generate_operation(
    rng: &mut StdRng,
    distribution: &OperationDistribution,
    store: &EntityStore,
) -> SimulatedOperation {
    let r: f64 = rng.gen();

    let operation = if r < distribution.valid_ops {
        generate_valid_operation(rng, store)
    } else if r < distribution.valid_ops + distribution.edge_cases {
        generate_edge_case_operation(rng, store)
    } else {
        generate_invalid_operation(rng, store)
    };
    operation.unwrap_or(SimulatedOperation::VerifyIntegrity)
}

fn random_patch(rng: &mut StdRng) -> ProfilePatch {
    let n: u32 = rng.gen_range(0..1000);
    let mut patch = ProfilePatch::default();
    if rng.gen_bool(0.7) {
        patch = patch.address(format!("{n} Simulation Ave"));
    }
    if rng.gen_bool(0.4) {
        patch = patch.phone(format!("+49 30 {n:06}"));
    }
    if rng.gen_bool(0.3) {
        patch = patch.iban(format!("DE{n:010}"));
    }
    if rng.gen_bool(0.2) {
        patch = patch.emergency_contact(format!("Contact {n}"));
    }
    patch
}

/// Generate a valid operation
fn generate_valid_operation(rng: &mut StdRng, store: &EntityStore) -> Option<SimulatedOperation> {
    let employees = employee_ids(store);
    let someone = pick(rng, &employees)?;

    let op = match rng.gen_range(0..12) {
        0 => {
            let below = hierarchy::subordinates(store, &someone);
            let candidates: Vec<EmployeeId> = employees
                .iter()
                .filter(|id| **id != someone && !below.iter().any(|e| &e.id == *id))
                .cloned()
                .collect();
            SimulatedOperation::Reparent(someone, pick(rng, &candidates)?)
        }
        1 => SimulatedOperation::AddEmployee(Some(someone)),
        2 => SimulatedOperation::SignIn(someone),
        3 => SimulatedOperation::SubmitLeave(someone),
        4 => SimulatedOperation::SubmitExpense(someone, Amount::from_minor(rng.gen_range(100..50_000))),
        5 => SimulatedOperation::SubmitTicket(someone),
        6 => SimulatedOperation::SubmitProfileChange(someone, random_patch(rng)),
        7 => {
            let pending = request_ids_where(store, |r| {
                r.kind() != RequestKind::Ticket && r.status == RequestStatus::Pending
            });
            let decision = if rng.gen_bool(0.6) {
                Decision::Approved
            } else {
                Decision::Rejected
            };
            SimulatedOperation::Decide(pick(rng, &pending)?, decision)
        }
        8 => {
            let open = request_ids_where(store, |r| {
                r.kind() == RequestKind::Ticket && !r.status.is_terminal()
            });
            let id = pick(rng, &open)?;
            let from = store.request(&id)?.status;
            let to = match from {
                RequestStatus::Pending if rng.gen_bool(0.8) => RequestStatus::InProgress,
                _ => RequestStatus::Resolved,
            };
            SimulatedOperation::MoveTicket(id, to)
        }
        9 => {
            let available = asset_ids_where(store, |a| a.status == AssetStatus::Available);
            match pick(rng, &available) {
                Some(asset) => SimulatedOperation::AssignAsset(asset, someone),
                None => SimulatedOperation::AddAsset(None),
            }
        }
        10 => {
            let in_use = asset_ids_where(store, |a| a.status == AssetStatus::InUse);
            SimulatedOperation::ReturnAsset(pick(rng, &in_use)?)
        }
        _ => {
            let entries: Vec<PayrollEntry> = store.payroll_entries().cloned().collect();
            let entry = pick(rng, &entries)?;
            match rng.gen_range(0..3) {
                0 if entry.status == PayrollStatus::Draft => {
                    SimulatedOperation::ApprovePayroll(entry.employee_id)
                }
                1 => SimulatedOperation::RunPayroll,
                _ => SimulatedOperation::UpdatePayroll(
                    entry.employee_id,
                    rng.gen_range(0..3_000),
                    rng.gen_range(0..500),
                ),
            }
        }
    };
    Some(op)
}

/// Generate an edge case operation
fn generate_edge_case_operation(
    rng: &mut StdRng,
    store: &EntityStore,
) -> Option<SimulatedOperation> {
    let employees = employee_ids(store);
    let op = match rng.gen_range(0..7) {
        0 => {
            let assets = asset_ids_where(store, |_| true);
            let target = match rng.gen_range(0..3) {
                0 => AssetOverride::Repair,
                1 => AssetOverride::Retired,
                _ => AssetOverride::Available,
            };
            SimulatedOperation::OverrideAsset(pick(rng, &assets)?, target)
        }
        1 => {
            let in_progress = request_ids_where(store, |r| r.status == RequestStatus::InProgress);
            SimulatedOperation::MoveTicket(pick(rng, &in_progress)?, RequestStatus::Pending)
        }
        2 => SimulatedOperation::AddAsset(pick(rng, &employees)),
        3 => SimulatedOperation::AddEmployee(None),
        4 => SimulatedOperation::SubmitProfileChange(pick(rng, &employees)?, ProfilePatch::default()),
        5 => {
            let entries: Vec<EmployeeId> = store
                .payroll_entries()
                .map(|e| e.employee_id.clone())
                .collect();
            let (bonus, deductions) = match rng.gen_range(0..3) {
                0 => (i64::MAX, 0),
                1 => (0, i64::MIN),
                _ => (-500, 0),
            };
            SimulatedOperation::UpdatePayroll(pick(rng, &entries)?, bonus, deductions)
        }
        _ => SimulatedOperation::RunPayroll,
    };
    Some(op)
}

/// Generate an invalid operation that should be rejected
fn generate_invalid_operation(
    rng: &mut StdRng,
    store: &EntityStore,
) -> Option<SimulatedOperation> {
    let employees = employee_ids(store);
    let op = match rng.gen_range(0..7) {
        0 => {
            let id = pick(rng, &employees)?;
            SimulatedOperation::Reparent(id.clone(), id)
        }
        1 => {
            // Move a manager under one of their own reports
            let managers: Vec<EmployeeId> = employees
                .iter()
                .filter(|id| !hierarchy::direct_reports(store, id).is_empty())
                .cloned()
                .collect();
            let manager = pick(rng, &managers)?;
            let below: Vec<EmployeeId> = hierarchy::subordinates(store, &manager)
                .into_iter()
                .map(|e| e.id.clone())
                .collect();
            SimulatedOperation::Reparent(manager, pick(rng, &below)?)
        }
        2 => {
            let decided = request_ids_where(store, |r| r.status.is_terminal());
            SimulatedOperation::Decide(pick(rng, &decided)?, Decision::Approved)
        }
        3 => {
            let in_use = asset_ids_where(store, |a| a.status != AssetStatus::Available);
            SimulatedOperation::AssignAsset(pick(rng, &in_use)?, pick(rng, &employees)?)
        }
        4 => {
            let idle = asset_ids_where(store, |a| a.status != AssetStatus::InUse);
            SimulatedOperation::ReturnAsset(pick(rng, &idle)?)
        }
        5 => SimulatedOperation::Decide(RequestId::generate(), Decision::Rejected),
        _ => {
            let reviewed: Vec<EmployeeId> = store
                .payroll_entries()
                .filter(|e| e.status != PayrollStatus::Draft)
                .map(|e| e.employee_id.clone())
                .collect();
            SimulatedOperation::ApprovePayroll(pick(rng, &reviewed)?)
        }
    };
    Some(op)
}

/// Whether `to` is reachable from `from` along manager -> report edges.
fn reaches(store: &EntityStore, from: &EmployeeId, to: &EmployeeId) -> bool {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for employee in store.employees() {
        graph.add_node(employee.id.as_str());
        if let Some(manager) = &employee.manager_id {
            graph.add_edge(manager.as_str(), employee.id.as_str(), ());
        }
    }
    has_path_connecting(&graph, from.as_str(), to.as_str(), None)
}

fn ticket_move_is_legal(from: RequestStatus, to: RequestStatus) -> bool {
    use RequestStatus::*;
    matches!(
        (from, to),
        (Pending, InProgress) | (Pending, Resolved) | (InProgress, Resolved) | (InProgress, Pending)
    )
}

/// Classify whether an operation should succeed, from the state before it
/// runs.
fn classify_expected_result(
    operation: &SimulatedOperation,
    store: &EntityStore,
    signed_in: bool,
) -> ExpectedResult {
    let exists = |id: &EmployeeId| store.contains_employee(id);
    let ok = match operation {
        SimulatedOperation::Reparent(child, manager) => {
            child != manager && exists(child) && exists(manager) && !reaches(store, child, manager)
        }
        SimulatedOperation::AddEmployee(manager) => manager.as_ref().map_or(true, exists),
        SimulatedOperation::SignIn(id)
        | SimulatedOperation::SubmitLeave(id)
        | SimulatedOperation::SubmitExpense(id, _)
        | SimulatedOperation::SubmitTicket(id)
        | SimulatedOperation::SubmitProfileChange(id, _) => exists(id),
        SimulatedOperation::Decide(id, _) => store.request(id).is_some_and(|r| {
            r.kind() != RequestKind::Ticket && r.status == RequestStatus::Pending
        }),
        SimulatedOperation::MoveTicket(id, to) => {
            signed_in
                && store.request(id).is_some_and(|r| {
                    r.kind() == RequestKind::Ticket && ticket_move_is_legal(r.status, *to)
                })
        }
        SimulatedOperation::AddAsset(holder) => holder.as_ref().map_or(true, exists),
        SimulatedOperation::AssignAsset(asset, employee) => {
            exists(employee)
                && store
                    .asset(asset)
                    .is_some_and(|a| a.status == AssetStatus::Available)
        }
        SimulatedOperation::ReturnAsset(asset) => store
            .asset(asset)
            .is_some_and(|a| a.status == AssetStatus::InUse),
        SimulatedOperation::OverrideAsset(asset, _) => store.asset(asset).is_some(),
        SimulatedOperation::RunPayroll | SimulatedOperation::VerifyIntegrity => true,
        SimulatedOperation::UpdatePayroll(id, bonus, deductions) => {
            store.payroll_entry(id).is_some_and(|e| {
                e.base_salary
                    .checked_add(*bonus)
                    .and_then(|n| n.checked_sub(*deductions))
                    .is_some()
            })
        }
        SimulatedOperation::ApprovePayroll(id) => store
            .payroll_entry(id)
            .is_some_and(|e| e.status == PayrollStatus::Draft),
    };
    if ok {
        ExpectedResult::ShouldSucceed
    } else {
        ExpectedResult::ShouldFail
    }
}

fn sim_date() -> NaiveDate {
    seed::demo_today()
}

fn requester_for(kernel: &WorkforceHandle, id: &EmployeeId) -> Requester {
    match kernel.employee(id) {
        Some(employee) => Requester::from(&employee),
        None => Requester {
            name: id.to_string(),
            employee_id: Some(id.clone()),
        },
    }
}

/// Execute an operation against the kernel
fn execute_operation(
    kernel: &WorkforceHandle,
    operation: &SimulatedOperation,
) -> Result<String, KernelError> {
    match operation {
        SimulatedOperation::Reparent(child, manager) => {
            let previous = kernel.reparent(child, manager)?;
            Ok(format!("Moved {child} from {previous:?} to {manager}"))
        }
        SimulatedOperation::AddEmployee(manager) => {
            let mut new = NewEmployee::new(
                "sim hire",
                Role::Employee,
                "Engineering",
                "hire@acme.com",
                sim_date(),
            )
            .with_base_salary(4_000);
            new.manager_id = manager.clone();
            let hire = kernel.add_employee(new)?;
            Ok(format!("Hired {}", hire.id))
        }
        SimulatedOperation::SignIn(id) => {
            let who = kernel.sign_in(id)?;
            Ok(format!("Signed in as {}", who.name))
        }
        SimulatedOperation::SubmitLeave(id) => {
            let start = sim_date();
            let end = start + chrono::Duration::days(3);
            let request = kernel.submit_request(NewRequest::leave(
                requester_for(kernel, id),
                "Vacation",
                start,
                end,
            ))?;
            Ok(format!("Submitted {}", request.id))
        }
        SimulatedOperation::SubmitExpense(id, amount) => {
            let request = kernel.submit_request(NewRequest::expense(
                requester_for(kernel, id),
                *amount,
                "Simulated expense",
            ))?;
            Ok(format!("Submitted {}", request.id))
        }
        SimulatedOperation::SubmitTicket(id) => {
            let request = kernel.submit_request(NewRequest::ticket(
                requester_for(kernel, id),
                "Simulated outage",
            ))?;
            Ok(format!("Submitted {}", request.id))
        }
        SimulatedOperation::SubmitProfileChange(id, patch) => {
            let employee = kernel
                .employee(id)
                .ok_or_else(|| LookupError::EmployeeNotFound(id.clone()))?;
            let request =
                kernel.submit_request(NewRequest::profile_change(&employee, patch.clone()))?;
            Ok(format!("Submitted {}", request.id))
        }
        SimulatedOperation::Decide(id, decision) => {
            let outcome = kernel.decide(id, *decision)?;
            Ok(format!("{id} is now {:?}", outcome.request.status))
        }
        SimulatedOperation::MoveTicket(id, to) => {
            let ticket = kernel.move_ticket(id, *to)?;
            Ok(format!("{id} moved to {:?}", ticket.status))
        }
        SimulatedOperation::AddAsset(holder) => {
            let mut new = NewAsset::available(AssetKind::Peripheral, "Sim Dock", "SIM-1", sim_date());
            if holder.is_some() {
                new.status = AssetStatus::InUse;
                new.assigned_to = holder.clone();
            }
            let asset = kernel.add_asset(new)?;
            Ok(format!("Added asset {}", asset.id))
        }
        SimulatedOperation::AssignAsset(asset, employee) => {
            kernel.assign_asset(asset, employee)?;
            Ok(format!("Assigned {asset} to {employee}"))
        }
        SimulatedOperation::ReturnAsset(asset) => {
            kernel.return_asset(asset)?;
            Ok(format!("Returned {asset}"))
        }
        SimulatedOperation::OverrideAsset(asset, status) => {
            kernel.override_asset_status(asset, *status)?;
            Ok(format!("Forced {asset} to {status:?}"))
        }
        SimulatedOperation::RunPayroll => {
            let summary = kernel.run_payroll();
            Ok(format!("Paid {} entries", summary.newly_paid))
        }
        SimulatedOperation::UpdatePayroll(id, bonus, deductions) => {
            let entry = kernel.update_payroll(id, *bonus, *deductions)?;
            Ok(format!("Net for {id} is {}", entry.net()))
        }
        SimulatedOperation::ApprovePayroll(id) => {
            kernel.approve_payroll(id)?;
            Ok(format!("Approved payroll for {id}"))
        }
        SimulatedOperation::VerifyIntegrity => {
            let count = kernel.verify_integrity()?;
            Ok(format!("{count} events verified"))
        }
    }
}

/// Build a random org of `size` employees rooted at a single CEO, with a
/// payroll entry each, some assets and a backlog of requests.
pub fn synthetic_store(size: usize, seed: u64) -> EntityStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = EntityStore::new();
    let start = sim_date();

    for i in 0..size {
        let id = EmployeeId::from(format!("e{i}"));
        let manager = (i > 0).then(|| EmployeeId::from(format!("e{}", rng.gen_range(0..i))));
        let role = match i {
            0 => Role::Ceo,
            1..=3 => Role::Vp,
            _ if rng.gen_bool(0.15) => Role::Manager,
            _ if rng.gen_bool(0.05) => Role::ItAdmin,
            _ => Role::Employee,
        };
        let name = format!("Employee {i}");
        store.put_employee(Employee {
            id: id.clone(),
            avatar: avatar_for(&name),
            name,
            role,
            department: "Engineering".to_string(),
            location: "Berlin".to_string(),
            manager_id: manager,
            status: EmployeeStatus::Active,
            email: format!("e{i}@acme.com"),
            phone: String::new(),
            start_date: start,
            contract_type: ContractType::FullTime,
            vacation_entitlement: 30,
            vacation_used: rng.gen_range(0..30),
            sick_days: 0,
            address: String::new(),
            emergency_contact: String::new(),
            iban: String::new(),
        });
        store.put_payroll_entry(PayrollEntry {
            employee_id: id.clone(),
            base_salary: rng.gen_range(3_000..15_000),
            bonus: 0,
            deductions: 0,
            currency: Currency::Eur,
            status: PayrollStatus::Draft,
            payout_date: start,
        });

        if i % 3 == 0 {
            let holder = rng.gen_bool(0.5).then(|| id.clone());
            store.put_asset(Asset {
                id: AssetId::from(format!("s{i}")),
                kind: AssetKind::Laptop,
                model: "Fleet Laptop".to_string(),
                serial_number: format!("FL{i:06}"),
                purchase_date: start,
                status: if holder.is_some() {
                    AssetStatus::InUse
                } else {
                    AssetStatus::Available
                },
                assigned_to: holder,
            });
        }
        if i % 2 == 1 {
            let requester = Requester {
                name: format!("Employee {i}"),
                employee_id: Some(id.clone()),
            };
            let new = if rng.gen_bool(0.5) {
                NewRequest::ticket(requester, "Broken keyboard")
            } else {
                NewRequest::expense(requester, Amount::from_minor(2_500), "Taxi")
            };
            store.put_request(new.into_request(RequestId::from(format!("q{i}")), start));
        }
    }
    store
}

/// Workforce invariant checks
pub struct WorkforceInvariants;

impl WorkforceInvariants {
    /// Check all invariants after one command took `previous` to `current`.
    pub fn check_all(
        kernel: &WorkforceHandle,
        previous: &EntityStore,
        current: &EntityStore,
    ) -> Result<(), Vec<InvariantViolation>> {
        let violations: Vec<InvariantViolation> = [
            Self::check_hierarchy_invariants(current),
            Self::check_asset_invariants(current),
            Self::check_request_invariants(previous, current),
            Self::check_payroll_invariants(previous, current),
            Self::check_session_invariants(kernel, current),
            Self::check_log_invariants(kernel),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    pub fn check_hierarchy_invariants(store: &EntityStore) -> Result<(), InvariantViolation> {
        hierarchy::validate_forest(store).map_err(|e| InvariantViolation {
            check: InvariantCheck::ReportingLinesFormForest,
            details: e.to_string(),
        })?;
        if store.employee_count() > 0 && hierarchy::roots(store).is_empty() {
            return Err(InvariantViolation {
                check: InvariantCheck::NonEmptyOrgHasRoot,
                details: "no employee is without a manager".to_string(),
            });
        }
        Ok(())
    }

    pub fn check_asset_invariants(store: &EntityStore) -> Result<(), InvariantViolation> {
        for asset in store.assets() {
            let holder_known = asset
                .assigned_to
                .as_ref()
                .map_or(true, |id| store.contains_employee(id));
            if !asset.is_consistent() || !holder_known {
                return Err(InvariantViolation {
                    check: InvariantCheck::AssetAssignmentConsistent,
                    details: format!(
                        "asset {} is {:?} assigned to {:?}",
                        asset.id, asset.status, asset.assigned_to
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn check_request_invariants(
        previous: &EntityStore,
        current: &EntityStore,
    ) -> Result<(), InvariantViolation> {
        if let Some(ticket) = current
            .requests()
            .find(|r| r.status == RequestStatus::Pending && r.assignee_id().is_some())
        {
            return Err(InvariantViolation {
                check: InvariantCheck::PendingTicketsAreUnassigned,
                details: format!("ticket {} is Pending but assigned", ticket.id),
            });
        }
        for before in previous.requests().filter(|r| r.status.is_terminal()) {
            let after = current.request(&before.id).map(|r| r.status);
            if after != Some(before.status) {
                return Err(InvariantViolation {
                    check: InvariantCheck::TerminalRequestsAreFrozen,
                    details: format!("request {} left {:?} for {:?}", before.id, before.status, after),
                });
            }
        }
        Ok(())
    }

    pub fn check_payroll_invariants(
        previous: &EntityStore,
        current: &EntityStore,
    ) -> Result<(), InvariantViolation> {
        for before in previous
            .payroll_entries()
            .filter(|e| e.status == PayrollStatus::Paid)
        {
            let after = current.payroll_entry(&before.employee_id).map(|e| e.status);
            if after != Some(PayrollStatus::Paid) {
                return Err(InvariantViolation {
                    check: InvariantCheck::PaidEntriesStayPaid,
                    details: format!("entry {} is now {:?}", before.employee_id, after),
                });
            }
        }
        Ok(())
    }

    /// Profile changes are the only writers of contact details, and they
    /// refresh the session in the same command.
    pub fn check_session_invariants(
        kernel: &WorkforceHandle,
        store: &EntityStore,
    ) -> Result<(), InvariantViolation> {
        let Some(identity) = kernel.current_identity() else {
            return Ok(());
        };
        let Some(record) = store.employee(&identity.id) else {
            return Ok(());
        };
        let contact = |e: &Employee| {
            (
                e.address.clone(),
                e.phone.clone(),
                e.iban.clone(),
                e.emergency_contact.clone(),
            )
        };
        if contact(&identity) != contact(record) {
            return Err(InvariantViolation {
                check: InvariantCheck::SessionContactDetailsAreCurrent,
                details: format!("session snapshot of {} is stale", identity.id),
            });
        }
        Ok(())
    }

    /// Check log invariants
    pub fn check_log_invariants(kernel: &WorkforceHandle) -> Result<(), InvariantViolation> {
        kernel
            .verify_integrity()
            .map(|_| ())
            .map_err(|e| InvariantViolation {
                check: InvariantCheck::HashChainIsUnbroken,
                details: format!("Log verification error: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oracle_flags_cycles() {
        let store = seed::demo_store();
        let op = SimulatedOperation::Reparent("2".into(), "5".into());
        assert_eq!(
            classify_expected_result(&op, &store, true),
            ExpectedResult::ShouldFail
        );
        let op = SimulatedOperation::Reparent("5".into(), "3".into());
        assert_eq!(
            classify_expected_result(&op, &store, true),
            ExpectedResult::ShouldSucceed
        );
    }

    #[test]
    fn synthetic_store_is_a_single_tree() {
        let store = synthetic_store(200, 9);
        assert_eq!(store.employee_count(), 200);
        assert_eq!(hierarchy::roots(&store).len(), 1);
        assert!(WorkforceInvariants::check_asset_invariants(&store).is_ok());
        assert!(hierarchy::validate_forest(&store).is_ok());
    }

    #[test]
    fn short_run_passes() {
        let report = run_simulator(SimulatorConfig {
            seed: 7,
            total_operations: 300,
            ..Default::default()
        });
        assert!(report.passed(), "{}", report.generate_text());
        assert_eq!(report.stats.total_operations, 300);
    }
}
