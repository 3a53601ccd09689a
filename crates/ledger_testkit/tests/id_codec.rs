//! External id codec round trips.

use ledger_core::{AssetType, CoreError, ExternalId};
use ledger_testkit::prelude::*;
use proptest::prelude::*;

#[test]
fn deposit_id_re_tagged_as_cash() {
    let id = ExternalId::with_major(AssetType::Deposit, 5, 42).unwrap();
    assert_eq!(AssetType::Deposit.id(), 1);
    assert_eq!(id.decode().unwrap(), (AssetType::Deposit, 5, 42));

    let alternate = id.to_alternate(AssetType::Cash).unwrap();
    assert_eq!(AssetType::Cash.id(), 2);
    assert_eq!(alternate.asset_type().unwrap(), AssetType::Cash);
    assert_eq!(alternate.base(), 42);
    assert_eq!(alternate.original_major(), 5);
    assert_eq!(alternate.previous_type().unwrap(), Some(AssetType::Deposit));
}

#[test]
fn major_beyond_28_bits_is_rejected() {
    let err = ExternalId::with_major(AssetType::Cash, MAJOR_LIMIT, 1).unwrap_err();
    assert!(matches!(err, CoreError::IdOutOfRange { .. }));
}

#[test]
fn wide_major_cannot_be_re_tagged() {
    let id = ExternalId::with_major(AssetType::Loan, ALTERNATE_MAJOR_LIMIT, 7).unwrap();
    assert!(id.to_alternate(AssetType::Payee).is_err());
}

#[test]
fn unknown_asset_tag() {
    let raw = 0xF000_0000_0000_0001;
    assert!(matches!(
        ExternalId::from_raw(raw).decode(),
        Err(CoreError::UnknownAssetType { tag: 0xF })
    ));
}

proptest! {
    #[test]
    fn encode_decode_round_trip((asset, major, base) in external_id_parts_strategy()) {
        let id = ExternalId::with_major(asset, major, base).unwrap();
        prop_assert_eq!(id.decode().unwrap(), (asset, major, base));
        prop_assert_eq!(ExternalId::from_raw(id.as_u64()), id);
    }

    #[test]
    fn alternate_keeps_major_and_base(
        (asset, major, base) in alternate_id_parts_strategy(),
        target in asset_type_strategy(),
    ) {
        let alternate = ExternalId::with_major(asset, major, base)
            .unwrap()
            .to_alternate(target)
            .unwrap();
        prop_assert_eq!(alternate.asset_type().unwrap(), target);
        prop_assert_eq!(alternate.original_major(), major);
        prop_assert_eq!(alternate.base(), base);
        prop_assert_eq!(alternate.previous_type().unwrap(), Some(asset));
    }
}
