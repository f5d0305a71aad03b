//! Dashboard figures over the whole store.

use crate::payroll::{self, PayrollTotals};
use crate::store::EntityStore;
use crate::types::{AssetStatus, EmployeeStatus, RequestKind};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkforceSummary {
    pub headcount: usize,
    pub onboarding: usize,
    pub on_leave: usize,
    pub pending_requests: BTreeMap<RequestKind, usize>,
    pub open_tickets: usize,
    pub payroll_totals: PayrollTotals,
    pub assets_total: usize,
    pub assets_in_use: usize,
}

impl WorkforceSummary {
    /// Share of assets currently handed out, in percent.
    pub fn asset_utilisation(&self) -> u32 {
        if self.assets_total == 0 {
            return 0;
        }
        (self.assets_in_use * 100 / self.assets_total) as u32
    }
}

pub fn summarize(store: &EntityStore) -> WorkforceSummary {
    let mut pending_requests = BTreeMap::new();
    for request in store.pending_requests() {
        *pending_requests.entry(request.kind()).or_insert(0) += 1;
    }

    WorkforceSummary {
        headcount: store.employee_count(),
        onboarding: store
            .employees_where(|e| e.status == EmployeeStatus::Onboarding)
            .len(),
        on_leave: store
            .employees_where(|e| e.status == EmployeeStatus::Leave)
            .len(),
        pending_requests,
        open_tickets: store
            .requests_where(|r| r.kind() == RequestKind::Ticket && !r.status.is_terminal())
            .len(),
        payroll_totals: payroll::totals(store),
        assets_total: store.assets().count(),
        assets_in_use: store
            .assets()
            .filter(|a| a.status == AssetStatus::InUse)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn demo_dashboard() {
        let summary = summarize(&seed::demo_store());
        assert_eq!(summary.headcount, 7);
        assert_eq!(summary.onboarding, 1);
        assert_eq!(summary.pending_requests.get(&RequestKind::Ticket), Some(&1));
        assert_eq!(summary.open_tickets, 2);
        assert_eq!(summary.assets_in_use, 3);
        assert_eq!(summary.asset_utilisation(), 75);
    }

    #[test]
    fn in_progress_tickets_are_not_pending() {
        let summary = summarize(&seed::demo_store());
        let pending: usize = summary.pending_requests.values().sum();
        assert_eq!(pending, 3);
        assert!(!summary
            .pending_requests
            .keys()
            .any(|k| *k == RequestKind::ProfileChange));
    }
}
