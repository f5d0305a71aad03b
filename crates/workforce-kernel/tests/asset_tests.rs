use pretty_assertions::assert_eq;
use workforce_kernel::assets::AssetOverride;
use workforce_kernel::error::{AssetError, KernelError};
use workforce_kernel::*;
use workforce_test_utils::{date, demo_handle};

#[test]
fn test_assign_then_return_restores_inventory() {
    let kernel = demo_handle();
    let before = kernel.asset(&"a4".into()).unwrap();

    let assigned = kernel.assign_asset(&"a4".into(), &"6".into()).unwrap();
    assert_eq!(assigned.status, AssetStatus::InUse);
    assert_eq!(assigned.assigned_to, Some(EmployeeId::from("6")));
    assert_eq!(kernel.assets_held_by(&"6".into()).len(), 1);

    let returned = kernel.return_asset(&"a4".into()).unwrap();
    assert_eq!(returned, before);
    assert_eq!(returned.status, AssetStatus::Available);
    assert_eq!(returned.assigned_to, None);
}

#[test]
fn test_cannot_assign_held_asset() {
    let kernel = demo_handle();
    let err = kernel.assign_asset(&"a2".into(), &"6".into()).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Asset(AssetError::NotAvailable {
            status: AssetStatus::InUse
        })
    ));
    assert_eq!(
        kernel.asset(&"a2".into()).unwrap().assigned_to,
        Some(EmployeeId::from("5"))
    );
}

#[test]
fn test_cannot_return_available_asset() {
    let kernel = demo_handle();
    let err = kernel.return_asset(&"a4".into()).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Asset(AssetError::NotInUse {
            status: AssetStatus::Available
        })
    ));
}

#[test]
fn test_retired_asset_cannot_be_assigned() {
    let kernel = demo_handle();
    let retired = kernel
        .override_asset_status(&"a1".into(), AssetOverride::Retired)
        .unwrap();
    assert_eq!(retired.status, AssetStatus::Retired);
    assert_eq!(retired.assigned_to, None);
    assert!(kernel.assets_held_by(&"2".into()).is_empty());

    assert!(kernel.assign_asset(&"a1".into(), &"2".into()).is_err());

    kernel
        .override_asset_status(&"a1".into(), AssetOverride::Available)
        .unwrap();
    kernel.assign_asset(&"a1".into(), &"2".into()).unwrap();
}

#[test]
fn test_new_assets_respect_assignment_invariant() {
    let kernel = demo_handle();

    let spare = kernel
        .add_asset(NewAsset::available(
            AssetKind::Phone,
            "Pixel 8",
            "PX-100",
            date(2023, 11, 1),
        ))
        .unwrap();
    assert_eq!(spare.status, AssetStatus::Available);

    let mut handed_out = NewAsset::available(AssetKind::Monitor, "LG 27", "LG-1", date(2023, 11, 1));
    handed_out.status = AssetStatus::InUse;
    handed_out.assigned_to = Some("6".into());
    let monitor = kernel.add_asset(handed_out).unwrap();
    assert!(monitor.is_consistent());

    let mut broken = NewAsset::available(AssetKind::Laptop, "ThinkPad", "TP-1", date(2023, 11, 1));
    broken.assigned_to = Some("6".into());
    let err = kernel.add_asset(broken).unwrap_err();
    assert!(matches!(
        err,
        KernelError::Asset(AssetError::AssignmentMismatch { .. })
    ));
    assert_eq!(kernel.assets().len(), 6);
}
