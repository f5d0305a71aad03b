use pretty_assertions::assert_eq;
use proptest::prelude::*;
use workforce_kernel::error::{HierarchyError, KernelError, LookupError};
use workforce_kernel::hierarchy;
use workforce_kernel::store::EntityStore;
use workforce_kernel::{EmployeeId, EntityRegistry, HierarchyManager, SessionControl};
use workforce_test_utils::{chain_store, demo_handle, flat_store, ids, signed_in_handle};

#[test]
fn test_reparent_refreshes_signed_in_identity() {
    let kernel = signed_in_handle("3");
    let previous = kernel.reparent(&"3".into(), &"2".into()).unwrap();
    assert_eq!(previous, Some(EmployeeId::from("1")));

    let identity = kernel.current_identity().unwrap();
    assert_eq!(identity.manager_id, Some(EmployeeId::from("2")));
    assert_eq!(Some(identity), kernel.employee(&"3".into()));
}

#[test]
fn test_reparent_of_someone_else_keeps_identity() {
    let kernel = signed_in_handle("7");
    let before = kernel.current_identity();
    kernel.reparent(&"3".into(), &"2".into()).unwrap();
    assert_eq!(kernel.current_identity(), before);

    let kernel = signed_in_handle("3");
    let before = kernel.current_identity();
    assert!(kernel.reparent(&"3".into(), &"3".into()).is_err());
    assert_eq!(kernel.current_identity(), before);
}

fn managers(store: &EntityStore) -> Vec<Option<EmployeeId>> {
    store.employees().map(|e| e.manager_id.clone()).collect()
}

#[test]
fn test_rejects_move_under_own_report() {
    // Sarah (4) reports to Mike (2); moving Mike under Sarah closes a loop.
    let kernel = demo_handle();
    let before = kernel.snapshot();

    let err = kernel.reparent(&"2".into(), &"4".into()).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Hierarchy(HierarchyError::CycleDetected)
    ));

    assert_eq!(managers(&kernel.snapshot()), managers(&before));
    assert!(ids(&kernel.direct_reports(&"2".into())).contains(&"4".to_string()));
}

#[test]
fn test_rejects_deep_cycle() {
    let kernel = demo_handle();
    let err = kernel.reparent(&"1".into(), &"6".into()).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Hierarchy(HierarchyError::CycleDetected)
    ));
    assert_eq!(ids(&kernel.roots()), vec!["1"]);
}

#[test]
fn test_rejects_self_assignment() {
    let kernel = demo_handle();
    let before = kernel.snapshot();
    let err = kernel.reparent(&"4".into(), &"4".into()).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Hierarchy(HierarchyError::SelfAssignment)
    ));
    assert!(err.is_recoverable());
    assert!(err.is_user_facing());
    assert_eq!(managers(&kernel.snapshot()), managers(&before));
}

#[test]
fn test_unknown_employee_is_a_lookup_error() {
    let kernel = demo_handle();
    let err = kernel.reparent(&"5".into(), &"99".into()).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Lookup(LookupError::EmployeeNotFound(_))
    ));
    assert!(!err.is_recoverable());
}

#[test]
fn test_reparent_returns_previous_manager() {
    let kernel = demo_handle();
    let previous = kernel.reparent(&"5".into(), &"7".into()).unwrap();
    assert_eq!(previous, Some(EmployeeId::from("4")));
    assert_eq!(ids(&kernel.direct_reports(&"7".into())), vec!["5"]);
    assert_eq!(ids(&kernel.direct_reports(&"4".into())), vec!["6"]);
}

#[test]
fn test_moving_a_manager_moves_their_subtree() {
    let kernel = demo_handle();
    kernel.reparent(&"4".into(), &"3".into()).unwrap();

    let chain = kernel.chain_of_command(&"6".into()).unwrap();
    assert_eq!(ids(&chain), vec!["4", "3", "1"]);
    let mut below = ids(&kernel.subordinates(&"3".into()).unwrap());
    below.sort();
    assert_eq!(below, vec!["4", "5", "6"]);
}

#[test]
fn test_chain_of_command_for_unknown_employee() {
    let kernel = demo_handle();
    assert!(kernel.chain_of_command(&"nobody".into()).is_err());
}

#[test]
fn test_org_chart_nests_reports() {
    let kernel = demo_handle();
    let chart = kernel.org_chart();
    assert_eq!(chart.len(), 1);
    let ceo = &chart[0];
    assert_eq!(ceo.employee.id.as_str(), "1");
    let second_level: Vec<&str> = ceo.reports.iter().map(|n| n.employee.id.as_str()).collect();
    assert_eq!(second_level, vec!["2", "3"]);
    assert_eq!(ceo.size(), 7);
}

#[test]
fn test_long_chain_walk_terminates() {
    let store = chain_store(500);
    assert!(hierarchy::is_descendant(&store, &"c0".into(), &"c499".into()));
    assert!(!hierarchy::is_descendant(&store, &"c499".into(), &"c0".into()));
    assert_eq!(hierarchy::chain_of_command(&store, &"c499".into()).len(), 499);
}

proptest! {
    #[test]
    fn prop_reparent_keeps_forest(
        moves in proptest::collection::vec((0..8usize, 0..8usize), 0..60)
    ) {
        let mut store = flat_store(8);
        let id = |i: usize| EmployeeId::from(format!("f{i}"));

        for (child, manager) in moves {
            let (child, manager) = (id(child), id(manager));
            let was_descendant = hierarchy::is_descendant(&store, &child, &manager);
            let before = managers(&store);

            match hierarchy::reparent(&mut store, &child, &manager) {
                Ok(_) => {
                    prop_assert!(!hierarchy::is_descendant(&store, &child, &manager));
                    prop_assert_eq!(
                        store.employee(&child).unwrap().manager_id.clone(),
                        Some(manager.clone())
                    );
                }
                Err(KernelError::Hierarchy(HierarchyError::SelfAssignment)) => {
                    prop_assert_eq!(&child, &manager);
                    prop_assert_eq!(managers(&store), before);
                }
                Err(KernelError::Hierarchy(HierarchyError::CycleDetected)) => {
                    prop_assert!(was_descendant);
                    prop_assert_eq!(managers(&store), before);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }

            prop_assert!(hierarchy::validate_forest(&store).is_ok());

            let mut roots = ids(hierarchy::roots(&store));
            let mut managerless: Vec<String> = store
                .employees()
                .filter(|e| e.manager_id.is_none())
                .map(|e| e.id.to_string())
                .collect();
            roots.sort();
            managerless.sort();
            prop_assert_eq!(roots, managerless);
        }
    }
}
