//! Asset lifecycle: Available <-> In Use, plus administrative overrides.

use crate::error::{AssetError, KernelError};
use crate::store::EntityStore;
use crate::types::{Asset, AssetId, AssetStatus, EmployeeId, NewAsset};
use serde::{Deserialize, Serialize};

/// Statuses an administrator may force directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetOverride {
    Available,
    Repair,
    Retired,
}

impl From<AssetOverride> for AssetStatus {
    fn from(value: AssetOverride) -> Self {
        match value {
            AssetOverride::Available => AssetStatus::Available,
            AssetOverride::Repair => AssetStatus::Repair,
            AssetOverride::Retired => AssetStatus::Retired,
        }
    }
}

/// Register a new asset. The requested status and assignee must agree.
pub fn add(store: &mut EntityStore, new: NewAsset, id: AssetId) -> Result<Asset, KernelError> {
    if let Some(holder) = &new.assigned_to {
        store.require_employee(holder)?;
    }
    let asset = Asset {
        id,
        kind: new.kind,
        model: new.model,
        serial_number: new.serial_number,
        purchase_date: new.purchase_date,
        status: new.status,
        assigned_to: new.assigned_to,
    };
    if !asset.is_consistent() {
        return Err(AssetError::AssignmentMismatch {
            status: asset.status,
        }
        .into());
    }
    store.put_asset(asset.clone());
    Ok(asset)
}

pub fn assign(
    store: &mut EntityStore,
    asset_id: &AssetId,
    employee: &EmployeeId,
) -> Result<Asset, KernelError> {
    let mut asset = store.require_asset(asset_id)?.clone();
    if asset.status != AssetStatus::Available {
        return Err(AssetError::NotAvailable {
            status: asset.status,
        }
        .into());
    }
    store.require_employee(employee)?;

    asset.status = AssetStatus::InUse;
    asset.assigned_to = Some(employee.clone());
    store.put_asset(asset.clone());
    Ok(asset)
}

/// Take an asset back into inventory.
pub fn return_to_inventory(store: &mut EntityStore, asset_id: &AssetId) -> Result<Asset, KernelError> {
    let mut asset = store.require_asset(asset_id)?.clone();
    if asset.status != AssetStatus::InUse {
        return Err(AssetError::NotInUse {
            status: asset.status,
        }
        .into());
    }

    asset.status = AssetStatus::Available;
    asset.assigned_to = None;
    store.put_asset(asset.clone());
    Ok(asset)
}

/// Force a status. Any holder loses the asset.
pub fn override_status(
    store: &mut EntityStore,
    asset_id: &AssetId,
    status: AssetOverride,
) -> Result<Asset, KernelError> {
    let mut asset = store.require_asset(asset_id)?.clone();
    asset.status = status.into();
    asset.assigned_to = None;
    store.put_asset(asset.clone());
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::types::AssetKind;
    use chrono::NaiveDate;

    #[test]
    fn assign_requires_available() {
        let mut store = seed::demo_store();
        let err = assign(&mut store, &"a1".into(), &"5".into()).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Asset(AssetError::NotAvailable {
                status: AssetStatus::InUse
            })
        ));
        assert_eq!(
            store.asset(&"a1".into()).unwrap().assigned_to,
            Some("2".into())
        );
    }

    #[test]
    fn repair_override_clears_holder() {
        let mut store = seed::demo_store();
        let asset = override_status(&mut store, &"a2".into(), AssetOverride::Repair).unwrap();
        assert_eq!(asset.status, AssetStatus::Repair);
        assert_eq!(asset.assigned_to, None);
        assert!(asset.is_consistent());

        let err = return_to_inventory(&mut store, &"a2".into()).unwrap_err();
        assert!(matches!(err, KernelError::Asset(AssetError::NotInUse { .. })));
    }

    #[test]
    fn in_use_without_holder_is_rejected() {
        let mut store = seed::demo_store();
        let mut new = NewAsset::available(
            AssetKind::Phone,
            "Pixel 8",
            "PX-1",
            NaiveDate::from_ymd_opt(2023, 11, 1).unwrap(),
        );
        new.status = AssetStatus::InUse;

        let err = add(&mut store, new, "a9".into()).unwrap_err();
        assert!(matches!(
            err,
            KernelError::Asset(AssetError::AssignmentMismatch { .. })
        ));
        assert!(store.asset(&"a9".into()).is_none());
    }
}
