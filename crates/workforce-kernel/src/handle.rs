use crate::api::*;
use crate::assets::{self, AssetOverride};
use crate::config::{EmployeeDefaults, WorkforceConfig};
use crate::error::*;
use crate::hierarchy::{self, OrgNode};
use crate::logging::{Event, EventLog, Outcome};
use crate::payroll::{self, PayrollRunSummary, PayrollTotals};
use crate::session::Session;
use crate::store::EntityStore;
use crate::summary::{self, WorkforceSummary};
use crate::types::*;
use crate::workflow::{self, state_machine, DecisionOutcome};
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

/// Everything a command may touch, guarded by one lock so that each command
/// is a single state transition.
#[derive(Debug, Default)]
struct State {
    store: EntityStore,
    session: Session,
}

/// Main handle that implements all workforce traits
pub struct WorkforceHandle {
    config: WorkforceConfig,
    state: RwLock<State>,
    event_log: EventLog,
}

impl WorkforceHandle {
    /// Create an empty handle with default configuration
    pub fn new() -> Self {
        Self::with_config(WorkforceConfig::default())
    }

    /// Create an empty handle with custom configuration
    pub fn with_config(config: WorkforceConfig) -> Self {
        Self::from_store(EntityStore::new(), config)
    }

    /// Wrap an existing store, e.g. the demo data set.
    pub fn from_store(store: EntityStore, config: WorkforceConfig) -> Self {
        Self {
            config,
            state: RwLock::new(State {
                store,
                session: Session::default(),
            }),
            event_log: EventLog::default(),
        }
    }

    pub fn config(&self) -> &WorkforceConfig {
        &self.config
    }

    /// Run a read-only query against the current store.
    pub fn read<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> R {
        f(&self.state.read().store)
    }

    pub fn summary(&self) -> WorkforceSummary {
        self.read(summary::summarize)
    }

    /// A consistent copy of every entity.
    pub fn snapshot(&self) -> EntityStore {
        self.state.read().store.clone()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Audit and trace the outcome of a command. Called with the state lock
    /// held so the log order matches the order of state transitions.
    fn record<T>(
        &self,
        actor: Option<EmployeeId>,
        action: &str,
        subject: &str,
        result: Result<T, KernelError>,
    ) -> Result<T, KernelError> {
        self.audit(actor, action, subject, result.as_ref().err());
        result
    }

    fn audit(
        &self,
        actor: Option<EmployeeId>,
        action: &str,
        subject: &str,
        error: Option<&KernelError>,
    ) {
        let (outcome, detail) = match error {
            None => {
                tracing::info!(action, subject, "command applied");
                (Outcome::Applied, String::new())
            }
            Some(err) => {
                tracing::warn!(action, subject, error = %err, "command rejected");
                (Outcome::Rejected, err.to_string())
            }
        };
        if self.config.audit.enabled {
            self.event_log
                .append(Event::new(actor, action, subject, outcome, detail));
        }
    }
}

impl Default for WorkforceHandle {
    fn default() -> Self {
        Self::new()
    }
}

fn actor_of(session: &Session) -> Option<EmployeeId> {
    session.actor_id().ok().cloned()
}

fn hire(
    store: &mut EntityStore,
    new: &NewEmployee,
    id: EmployeeId,
    config: &WorkforceConfig,
    today: NaiveDate,
) -> Result<Employee, KernelError> {
    if let Some(manager) = &new.manager_id {
        store.require_employee(manager)?;
    }
    let employee = new_hire(new, id, &config.employee_defaults);
    if let Some(compensation) = new.compensation {
        store.put_payroll_entry(PayrollEntry {
            employee_id: employee.id.clone(),
            base_salary: compensation.base_salary,
            bonus: 0,
            deductions: 0,
            currency: compensation
                .currency
                .unwrap_or(config.payroll.default_currency),
            status: PayrollStatus::Draft,
            payout_date: config.payroll.next_payout_date(today),
        });
    }
    store.put_employee(employee.clone());
    Ok(employee)
}

/// Build an employee record for a new hire from the configured defaults.
fn new_hire(new: &NewEmployee, id: EmployeeId, defaults: &EmployeeDefaults) -> Employee {
    Employee {
        id,
        avatar: avatar_for(&new.name),
        name: new.name.clone(),
        role: new.role,
        department: new.department.clone(),
        location: defaults.location.clone(),
        manager_id: new.manager_id.clone(),
        status: defaults.status,
        email: new.email.clone(),
        phone: String::new(),
        start_date: new.start_date,
        contract_type: defaults.contract_type,
        vacation_entitlement: defaults.vacation_entitlement,
        vacation_used: 0,
        sick_days: 0,
        address: String::new(),
        emergency_contact: String::new(),
        iban: String::new(),
    }
}

impl HierarchyManager for WorkforceHandle {
    fn reparent(
        &self,
        child: &EmployeeId,
        new_manager: &EmployeeId,
    ) -> Result<Option<EmployeeId>, KernelError> {
        let mut state = self.state.write();
        let State { store, session } = &mut *state;
        let result = hierarchy::reparent(store, child, new_manager);
        if result.is_ok() {
            if let Some(employee) = store.employee(child) {
                if session.refresh(employee) {
                    tracing::debug!(employee = %employee.id, "session identity refreshed");
                }
            }
        }
        let actor = actor_of(&state.session);
        self.record(actor, "reparent", child.as_str(), result)
    }

    fn roots(&self) -> Vec<Employee> {
        self.read(|store| hierarchy::roots(store).into_iter().cloned().collect())
    }

    fn direct_reports(&self, manager: &EmployeeId) -> Vec<Employee> {
        self.read(|store| {
            hierarchy::direct_reports(store, manager)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    fn is_descendant(&self, ancestor: &EmployeeId, id: &EmployeeId) -> bool {
        self.read(|store| hierarchy::is_descendant(store, ancestor, id))
    }

    fn chain_of_command(&self, id: &EmployeeId) -> Result<Vec<Employee>, KernelError> {
        self.read(|store| -> Result<Vec<Employee>, KernelError> {
            store.require_employee(id)?;
            Ok(hierarchy::chain_of_command(store, id)
                .into_iter()
                .cloned()
                .collect())
        })
    }

    fn subordinates(&self, id: &EmployeeId) -> Result<Vec<Employee>, KernelError> {
        self.read(|store| -> Result<Vec<Employee>, KernelError> {
            store.require_employee(id)?;
            Ok(hierarchy::subordinates(store, id)
                .into_iter()
                .cloned()
                .collect())
        })
    }

    fn org_chart(&self) -> Vec<OrgNode> {
        self.read(hierarchy::org_chart)
    }
}

impl RequestWorkflow for WorkforceHandle {
    fn submit_request(&self, new: NewRequest) -> Result<Request, KernelError> {
        let mut state = self.state.write();
        let id = RequestId::generate();
        let result = workflow::submit(&mut state.store, new, id.clone(), self.today());
        let actor = actor_of(&state.session);
        self.record(actor, "submit_request", id.as_str(), result)
    }

    fn decide(
        &self,
        request: &RequestId,
        decision: Decision,
    ) -> Result<DecisionOutcome, KernelError> {
        let mut state = self.state.write();
        let result = workflow::decide(&mut state.store, request, decision);
        if let Ok(DecisionOutcome {
            patched_employee: Some(employee),
            ..
        }) = &result
        {
            if state.session.refresh(employee) {
                tracing::debug!(employee = %employee.id, "session identity refreshed");
            }
        }
        let actor = actor_of(&state.session);
        self.record(actor, "decide", request.as_str(), result)
    }

    fn move_ticket(&self, request: &RequestId, to: RequestStatus) -> Result<Request, KernelError> {
        let mut state = self.state.write();
        let State { store, session } = &mut *state;
        let result = session
            .actor_id()
            .map_err(KernelError::from)
            .and_then(|agent| workflow::move_ticket(store, request, to, agent));
        let actor = actor_of(session);
        self.record(actor, "move_ticket", request.as_str(), result)
    }

    fn allowed_transitions(&self, request: &RequestId) -> Result<Vec<RequestStatus>, KernelError> {
        self.read(|store| -> Result<Vec<RequestStatus>, KernelError> {
            let request = store.require_request(request)?;
            Ok(state_machine::allowed_transitions(
                request.kind(),
                request.status,
            ))
        })
    }
}

impl PayrollManager for WorkforceHandle {
    fn run_payroll(&self) -> PayrollRunSummary {
        let mut state = self.state.write();
        let summary = payroll::run_payroll(&mut state.store);
        tracing::info!(
            entries = summary.entries,
            newly_paid = summary.newly_paid,
            "payroll run completed"
        );
        self.audit(actor_of(&state.session), "run_payroll", "payroll", None);
        summary
    }

    fn update_payroll(
        &self,
        employee: &EmployeeId,
        bonus: i64,
        deductions: i64,
    ) -> Result<PayrollEntry, KernelError> {
        let mut state = self.state.write();
        let result = payroll::update_entry(&mut state.store, employee, bonus, deductions);
        let actor = actor_of(&state.session);
        self.record(actor, "update_payroll", employee.as_str(), result)
    }

    fn approve_payroll(&self, employee: &EmployeeId) -> Result<PayrollEntry, KernelError> {
        let mut state = self.state.write();
        let result = payroll::approve_entry(&mut state.store, employee);
        let actor = actor_of(&state.session);
        self.record(actor, "approve_payroll", employee.as_str(), result)
    }

    fn payroll_totals(&self) -> PayrollTotals {
        self.read(payroll::totals)
    }
}

impl AssetLifecycle for WorkforceHandle {
    fn add_asset(&self, new: NewAsset) -> Result<Asset, KernelError> {
        let mut state = self.state.write();
        let id = AssetId::generate();
        let result = assets::add(&mut state.store, new, id.clone());
        let actor = actor_of(&state.session);
        self.record(actor, "add_asset", id.as_str(), result)
    }

    fn assign_asset(&self, asset: &AssetId, employee: &EmployeeId) -> Result<Asset, KernelError> {
        let mut state = self.state.write();
        let result = assets::assign(&mut state.store, asset, employee);
        let actor = actor_of(&state.session);
        self.record(actor, "assign_asset", asset.as_str(), result)
    }

    fn return_asset(&self, asset: &AssetId) -> Result<Asset, KernelError> {
        let mut state = self.state.write();
        let result = assets::return_to_inventory(&mut state.store, asset);
        let actor = actor_of(&state.session);
        self.record(actor, "return_asset", asset.as_str(), result)
    }

    fn override_asset_status(
        &self,
        asset: &AssetId,
        status: AssetOverride,
    ) -> Result<Asset, KernelError> {
        let mut state = self.state.write();
        let result = assets::override_status(&mut state.store, asset, status);
        let actor = actor_of(&state.session);
        self.record(actor, "override_asset_status", asset.as_str(), result)
    }
}

impl EntityRegistry for WorkforceHandle {
    fn add_employee(&self, new: NewEmployee) -> Result<Employee, KernelError> {
        let mut state = self.state.write();
        let id = EmployeeId::generate();
        let today = self.today();

        let result = hire(&mut state.store, &new, id.clone(), &self.config, today);

        let actor = actor_of(&state.session);
        self.record(actor, "add_employee", id.as_str(), result)
    }

    fn employee(&self, id: &EmployeeId) -> Option<Employee> {
        self.read(|store| store.employee(id).cloned())
    }

    fn employees(&self) -> Vec<Employee> {
        self.read(|store| store.employees().cloned().collect())
    }

    fn request(&self, id: &RequestId) -> Option<Request> {
        self.read(|store| store.request(id).cloned())
    }

    fn requests(&self) -> Vec<Request> {
        self.read(|store| store.requests().cloned().collect())
    }

    fn pending_requests(&self) -> Vec<Request> {
        self.read(|store| store.pending_requests().into_iter().cloned().collect())
    }

    fn tickets_assigned_to(&self, agent: &EmployeeId) -> Vec<Request> {
        self.read(|store| {
            store
                .tickets_assigned_to(agent)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    fn asset(&self, id: &AssetId) -> Option<Asset> {
        self.read(|store| store.asset(id).cloned())
    }

    fn assets(&self) -> Vec<Asset> {
        self.read(|store| store.assets().cloned().collect())
    }

    fn assets_held_by(&self, employee: &EmployeeId) -> Vec<Asset> {
        self.read(|store| store.assets_held_by(employee).into_iter().cloned().collect())
    }

    fn payroll_entry(&self, employee: &EmployeeId) -> Option<PayrollEntry> {
        self.read(|store| store.payroll_entry(employee).cloned())
    }

    fn payroll_entries(&self) -> Vec<PayrollEntry> {
        self.read(|store| store.payroll_entries().cloned().collect())
    }
}

impl SessionControl for WorkforceHandle {
    fn sign_in(&self, employee: &EmployeeId) -> Result<Employee, KernelError> {
        let mut state = self.state.write();
        let result = state
            .store
            .require_employee(employee)
            .map(Employee::clone)
            .map_err(KernelError::from);
        if let Ok(found) = &result {
            state.session.sign_in(found.clone());
        }
        self.record(Some(employee.clone()), "sign_in", employee.as_str(), result)
    }

    fn sign_out(&self) {
        let mut state = self.state.write();
        let actor = actor_of(&state.session);
        state.session.sign_out();
        self.audit(actor, "sign_out", "session", None);
    }

    fn current_identity(&self) -> Option<Employee> {
        self.state.read().session.identity().cloned()
    }
}

impl EventLogger for WorkforceHandle {
    fn events(&self) -> Vec<Event> {
        self.event_log.events()
    }

    fn verify_integrity(&self) -> Result<usize, LogError> {
        self.event_log.verify_integrity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn demo() -> WorkforceHandle {
        WorkforceHandle::from_store(seed::demo_store(), WorkforceConfig::default())
    }

    #[test]
    fn rejected_commands_are_audited() {
        let handle = demo();
        assert!(handle.reparent(&"1".into(), &"1".into()).is_err());
        handle.reparent(&"5".into(), &"3".into()).unwrap();

        let events = handle.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].outcome, Outcome::Rejected);
        assert_eq!(events[1].outcome, Outcome::Applied);
        assert_eq!(handle.verify_integrity(), Ok(2));
    }

    #[test]
    fn audit_can_be_disabled() {
        let handle = WorkforceHandle::from_store(
            seed::demo_store(),
            WorkforceConfig::default().with_audit(false),
        );
        handle.run_payroll();
        assert!(handle.events().is_empty());
    }

    #[test]
    fn move_ticket_requires_session() {
        let handle = demo();
        let err = handle
            .move_ticket(&"r3".into(), RequestStatus::InProgress)
            .unwrap_err();
        assert!(matches!(err, KernelError::Session(SessionError::NotSignedIn)));
    }

    #[test]
    fn new_hire_gets_configured_defaults() {
        let handle = WorkforceHandle::from_store(
            seed::demo_store(),
            WorkforceConfig::default().with_default_location("Lisbon"),
        );
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let hire = handle
            .add_employee(
                NewEmployee::new("emma stone", Role::Recruiter, "People", "emma@acme.com", start)
                    .reporting_to("3".into())
                    .with_base_salary(5_000),
            )
            .unwrap();

        assert_eq!(hire.avatar, "E");
        assert_eq!(hire.location, "Lisbon");
        assert_eq!(hire.status, EmployeeStatus::Onboarding);
        assert_eq!(hire.vacation_entitlement, 30);
        let entry = handle.payroll_entry(&hire.id).unwrap();
        assert_eq!(entry.currency, Currency::Eur);
        assert_eq!(entry.status, PayrollStatus::Draft);
    }

    #[test]
    fn unknown_manager_blocks_hire() {
        let handle = demo();
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let err = handle
            .add_employee(
                NewEmployee::new("Ghost", Role::Employee, "IT", "g@acme.com", start)
                    .reporting_to("404".into())
                    .with_base_salary(1),
            )
            .unwrap_err();
        assert!(matches!(err, KernelError::Lookup(LookupError::EmployeeNotFound(_))));
        assert_eq!(handle.employees().len(), 7);
        assert_eq!(handle.payroll_entries().len(), 6);
    }
}
