//! Reporting hierarchy over the employees' `manager_id` links.
//!
//! The relation must stay a forest. `reparent` is the only mutation and it
//! refuses self-management and moves that would put an employee under one of
//! their own reports, so the upward walks below always terminate.

use crate::error::{HierarchyError, KernelError};
use crate::store::EntityStore;
use crate::types::{Employee, EmployeeId};
use petgraph::graphmap::DiGraphMap;
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// Move `child` under `new_manager`. Returns the previous manager.
///
/// On any error the store is left untouched.
pub fn reparent(
    store: &mut EntityStore,
    child: &EmployeeId,
    new_manager: &EmployeeId,
) -> Result<Option<EmployeeId>, KernelError> {
    if child == new_manager {
        return Err(HierarchyError::SelfAssignment.into());
    }
    store.require_employee(new_manager)?;
    store.require_employee(child)?;

    if is_descendant(store, child, new_manager) {
        return Err(HierarchyError::CycleDetected.into());
    }

    let employee = store
        .employee_mut(child)
        .ok_or_else(|| crate::error::LookupError::EmployeeNotFound(child.clone()))?;
    let previous = employee.manager_id.replace(new_manager.clone());
    Ok(previous)
}

/// Employees without a manager.
pub fn roots(store: &EntityStore) -> Vec<&Employee> {
    store.employees_where(Employee::is_root)
}

pub fn direct_reports<'a>(store: &'a EntityStore, manager: &EmployeeId) -> Vec<&'a Employee> {
    store.employees_where(|e| e.manager_id.as_ref() == Some(manager))
}

/// Whether `id` sits strictly below `ancestor`.
///
/// Walks upward from `id`'s manager. The walk is bounded by the employee
/// count; exceeding it means the graph is already corrupt, in which case the
/// answer is `true` so that no further reparenting can build on it.
pub fn is_descendant(store: &EntityStore, ancestor: &EmployeeId, id: &EmployeeId) -> bool {
    let bound = store.employee_count();
    let mut current = store.employee(id).and_then(|e| e.manager_id.as_ref());
    let mut steps = 0usize;

    while let Some(manager) = current {
        if manager == ancestor {
            return true;
        }
        steps += 1;
        if steps > bound {
            tracing::error!(%id, %ancestor, "manager chain exceeds headcount; hierarchy is cyclic");
            return true;
        }
        current = store.employee(manager).and_then(|e| e.manager_id.as_ref());
    }
    false
}

/// Managers above `id`, nearest first.
pub fn chain_of_command<'a>(store: &'a EntityStore, id: &EmployeeId) -> Vec<&'a Employee> {
    let bound = store.employee_count();
    let mut chain = Vec::new();
    let mut current = store.employee(id).and_then(|e| e.manager_id.as_ref());

    while let Some(manager_id) = current {
        let Some(manager) = store.employee(manager_id) else {
            break;
        };
        if chain.len() >= bound {
            break;
        }
        chain.push(manager);
        current = manager.manager_id.as_ref();
    }
    chain
}

/// Everyone below `id`, breadth first.
pub fn subordinates<'a>(store: &'a EntityStore, id: &EmployeeId) -> Vec<&'a Employee> {
    let mut seen: HashSet<&EmployeeId> = HashSet::new();
    let mut out = Vec::new();
    let mut queue: VecDeque<&EmployeeId> = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
        for report in direct_reports(store, current) {
            if seen.insert(&report.id) {
                out.push(report);
                queue.push_back(&report.id);
            }
        }
    }
    out
}

/// A node of the rendered org chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgNode {
    pub employee: Employee,
    pub reports: Vec<OrgNode>,
}

impl OrgNode {
    /// Number of people in this subtree, including the root.
    pub fn size(&self) -> usize {
        1 + self.reports.iter().map(OrgNode::size).sum::<usize>()
    }
}

/// The full reporting tree, one entry per root.
pub fn org_chart(store: &EntityStore) -> Vec<OrgNode> {
    roots(store)
        .into_iter()
        .map(|root| build_node(store, root, store.employee_count()))
        .collect()
}

fn build_node(store: &EntityStore, employee: &Employee, budget: usize) -> OrgNode {
    let reports = if budget == 0 {
        Vec::new()
    } else {
        direct_reports(store, &employee.id)
            .into_iter()
            .map(|report| build_node(store, report, budget - 1))
            .collect()
    };
    OrgNode {
        employee: employee.clone(),
        reports,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestViolation {
    #[error("employee {employee} reports to unknown manager {manager}")]
    DanglingManager {
        employee: EmployeeId,
        manager: EmployeeId,
    },

    #[error("reporting lines contain a cycle")]
    Cycle,
}

/// Whole-graph check of the forest invariant.
pub fn validate_forest(store: &EntityStore) -> Result<(), ForestViolation> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for employee in store.employees() {
        graph.add_node(employee.id.as_str());
    }
    for employee in store.employees() {
        if let Some(manager) = &employee.manager_id {
            if !store.contains_employee(manager) {
                return Err(ForestViolation::DanglingManager {
                    employee: employee.id.clone(),
                    manager: manager.clone(),
                });
            }
            graph.add_edge(manager.as_str(), employee.id.as_str(), ());
        }
    }

    if petgraph::algo::is_cyclic_directed(&graph) {
        return Err(ForestViolation::Cycle);
    }
    Ok(())
}
