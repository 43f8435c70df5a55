//! Contract Test: Domain ↔ Storage Mapping
//!
//! This test verifies the kind-code discriminator and the mappers.
//!
//! Constraints verified:
//! - "I"/"D"/"S" round-trip exactly to Invoice/Delivery/Service
//! - Any other code fails loudly, never defaults
//! - An address delta without its kind discriminator cannot be mapped
//! - Customer records join their addresses into the right kind slots
//!
//! If this test fails, address rows can silently change meaning between
//! the API and the store.

use crm_core::domain::AddressKind;
use crm_core::entity::AddressRecordField;
use crm_core::mapping::{kind_from_code, kind_to_code};
use crm_core::{
    Address, AddressMapper, AddressRecord, Audit, CustomerMapper, CustomerRecord, Delta, Error,
};
use serde_json::json;

#[test]
fn kind_codes_round_trip() {
    for kind in AddressKind::ALL {
        let code = kind_to_code(kind);
        assert_eq!(kind_from_code(code).expect("known code"), kind);
    }
    assert_eq!(kind_to_code(AddressKind::Invoice), "I");
    assert_eq!(kind_to_code(AddressKind::Delivery), "D");
    assert_eq!(kind_to_code(AddressKind::Service), "S");
}

#[test]
fn unknown_kind_code_fails_loudly() {
    for code in ["X", "", "i", "ID"] {
        let err = kind_from_code(code).unwrap_err();
        assert!(
            matches!(err, Error::NotSupported(_)),
            "code '{code}' must be rejected, got: {err}"
        );
    }
}

#[test]
fn record_with_unknown_code_does_not_map() {
    let record = AddressRecord {
        kind_code: "Z".to_owned(),
        customer_id: "C000001".to_owned(),
        ..AddressRecord::default()
    };
    let err = AddressMapper::map_record(&record).unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));
}

#[test]
fn address_delta_requires_the_discriminator() {
    let delta: Delta<Address> =
        Delta::from_json(&json!({ "street": "Main Street 1" })).expect("parse");

    let err = AddressMapper::map_delta(&delta).unwrap_err();
    assert!(matches!(err, Error::NotSupported(_)));
}

#[test]
fn address_delta_maps_fields_and_code() {
    let delta: Delta<Address> = Delta::from_json(&json!({
        "kind": "Delivery",
        "street": "Dock 7",
        "zip": "12345",
    }))
    .expect("parse");

    let mapped = AddressMapper::map_delta(&delta).expect("map");
    assert_eq!(
        mapped.try_get_value(AddressRecordField::KindCode),
        Some(&json!("D"))
    );
    assert_eq!(
        mapped.try_get_value(AddressRecordField::Street),
        Some(&json!("Dock 7"))
    );
    assert_eq!(
        mapped.try_get_value(AddressRecordField::Zip),
        Some(&json!("12345"))
    );
    // untracked fields stay untracked
    assert_eq!(mapped.try_get_value(AddressRecordField::City), None);
}

#[test]
fn numeric_kind_index_maps_like_the_name() {
    let by_name: Delta<Address> = Delta::from_json(&json!({ "kind": "Invoice" })).expect("parse");
    let by_index: Delta<Address> = Delta::from_json(&json!({ "kind": 0 })).expect("parse");

    let a = AddressMapper::map_delta(&by_name).expect("map");
    let b = AddressMapper::map_delta(&by_index).expect("map");
    assert_eq!(
        a.try_get_value(AddressRecordField::KindCode),
        b.try_get_value(AddressRecordField::KindCode),
    );
}

fn address_record(code: &str, street: &str) -> AddressRecord {
    AddressRecord {
        street: street.to_owned(),
        kind_code: code.to_owned(),
        customer_id: "C000001".to_owned(),
        audit: Audit::default(),
        ..AddressRecord::default()
    }
}

#[test]
fn customer_record_joins_addresses_into_kind_slots() {
    let record = CustomerRecord {
        id: "C000001".to_owned(),
        name: "Acme".to_owned(),
        ..CustomerRecord::default()
    };
    let addresses = [
        address_record("D", "Dock 7"),
        address_record("I", "Billing Road 1"),
    ];

    let customer = CustomerMapper::map_record(&record, &addresses).expect("map");
    assert_eq!(customer.id, "C000001");
    assert_eq!(
        customer.invoice_address.expect("invoice slot").street,
        "Billing Road 1"
    );
    assert_eq!(
        customer.delivery_address.expect("delivery slot").street,
        "Dock 7"
    );
    assert!(customer.service_address.is_none());
}

#[test]
fn mapped_address_carries_its_kind() {
    let address = AddressMapper::map_record(&address_record("S", "Depot 3")).expect("map");
    assert_eq!(address.kind, Some(AddressKind::Service));
    assert_eq!(address.street, "Depot 3");
}

#[test]
fn customer_delta_maps_scalar_fields() {
    let delta = Delta::from_json(&json!({
        "name": "Acme",
        "country": "US",
    }))
    .expect("parse");

    let mapped = CustomerMapper::map_delta(&delta);
    assert_eq!(mapped.len(), 2);
}
