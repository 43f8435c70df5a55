//! Contract Test: Address Service
//!
//! This test verifies per-kind address handling on top of the store.
//!
//! Constraints verified:
//! - A customer owns at most one address of each kind
//! - The delta's kind discriminator selects the record; the kind of an
//!   existing address can never change through an update
//! - A delta without a kind cannot create or update anything
//! - No-op updates are classified away before the store is touched
//!
//! If this test fails, customers can end up with two invoice addresses
//! (or none they can reach).

use std::sync::Arc;

use crm_core::{
    AddressKind, AddressRepository, AddressService, ChangeEvent, ChangeState, Customer,
    CustomerService, Delta, Error, MemoryStore, event_channel,
};
use serde_json::json;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;

async fn setup(store: &MemoryStore) -> (AddressService, String, ReceiverStream<ChangeEvent>) {
    let (events, stream) = event_channel(64);
    let customers = CustomerService::new(Arc::new(store.clone()), Arc::new(store.clone()));
    let addresses = AddressService::new(Arc::new(store.clone())).with_events(events);

    let customer = customers
        .create(
            Delta::<Customer>::from_json(&json!({ "name": "Acme", "country": "US" }))
                .expect("parse"),
            "tester",
        )
        .await
        .expect("create customer");
    (addresses, customer.id, stream)
}

#[tokio::test]
async fn create_without_kind_is_a_validation_rejection() {
    let store = MemoryStore::new();
    let (addresses, customer_id, _events) = setup(&store).await;

    // a missing discriminator is a client data mistake, same category as
    // the pipeline rules
    let err = addresses
        .create(
            &customer_id,
            Delta::from_json(&json!({ "street": "Main Street 1" })).expect("parse"),
            "tester",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(
        err.validation_errors(),
        Some(
            &["kind field has invalid value <unset>. Allowed set: \
               [Invoice, Delivery, Service]."
                .to_owned()][..]
        )
    );
    assert_eq!(store.address_count().await, 0);
}

#[tokio::test]
async fn update_without_kind_is_a_validation_rejection() {
    let store = MemoryStore::new();
    let (addresses, customer_id, _events) = setup(&store).await;

    addresses
        .create(
            &customer_id,
            Delta::from_json(&json!({ "kind": "Invoice" })).expect("parse"),
            "tester",
        )
        .await
        .expect("create");

    let err = addresses
        .update(
            &customer_id,
            Delta::from_json(&json!({ "street": "New Street" })).expect("parse"),
            "editor",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn create_places_the_address_in_its_kind_slot() {
    let store = MemoryStore::new();
    let (addresses, customer_id, mut events) = setup(&store).await;

    let created = addresses
        .create(
            &customer_id,
            Delta::from_json(&json!({
                "kind": "Invoice",
                "street": "Billing Road 1",
                "country": "US",
            }))
            .expect("parse"),
            "tester",
        )
        .await
        .expect("create");
    assert_eq!(created.kind, Some(AddressKind::Invoice));

    let record = store
        .find_by_customer_and_code(&customer_id, "I")
        .await
        .expect("lookup")
        .expect("stored under code I");
    assert_eq!(record.street, "Billing Road 1");
    assert_eq!(record.customer_id, customer_id);
    assert_eq!(record.audit.version, 1);

    assert_eq!(
        events.next().await,
        Some(ChangeEvent::AddressCreated {
            customer_id: customer_id.clone(),
            kind: AddressKind::Invoice,
        })
    );
}

#[tokio::test]
async fn second_address_of_same_kind_conflicts() {
    let store = MemoryStore::new();
    let (addresses, customer_id, _events) = setup(&store).await;

    let body = json!({ "kind": "Delivery", "street": "Dock 7" });
    addresses
        .create(&customer_id, Delta::from_json(&body).expect("parse"), "tester")
        .await
        .expect("first create");

    let err = addresses
        .create(&customer_id, Delta::from_json(&body).expect("parse"), "tester")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(store.address_count().await, 1);
}

#[tokio::test]
async fn different_kinds_coexist_on_one_customer() {
    let store = MemoryStore::new();
    let (addresses, customer_id, _events) = setup(&store).await;

    for kind in ["Invoice", "Delivery", "Service"] {
        addresses
            .create(
                &customer_id,
                Delta::from_json(&json!({ "kind": kind })).expect("parse"),
                "tester",
            )
            .await
            .expect("create");
    }
    assert_eq!(store.address_count().await, 3);

    let listed = addresses
        .list_for_customer(&customer_id)
        .await
        .expect("list");
    assert_eq!(listed.len(), 3);
}

#[tokio::test]
async fn create_rejects_invalid_address() {
    let store = MemoryStore::new();
    let (addresses, customer_id, _events) = setup(&store).await;

    let err = addresses
        .create(
            &customer_id,
            Delta::from_json(&json!({ "kind": "Invoice", "country": "QQ" })).expect("parse"),
            "tester",
        )
        .await
        .unwrap_err();
    assert_eq!(
        err.validation_errors(),
        Some(&["QQ is not a valid ISO 3166 country code.".to_owned()][..])
    );
}

#[tokio::test]
async fn create_for_unknown_customer_is_not_found() {
    let store = MemoryStore::new();
    let (addresses, _customer_id, _events) = setup(&store).await;

    let err = addresses
        .create(
            "C999999",
            Delta::from_json(&json!({ "kind": "Invoice" })).expect("parse"),
            "tester",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn update_selects_the_record_by_kind() {
    let store = MemoryStore::new();
    let (addresses, customer_id, mut events) = setup(&store).await;

    addresses
        .create(
            &customer_id,
            Delta::from_json(&json!({ "kind": "Invoice", "street": "Old Street" }))
                .expect("parse"),
            "tester",
        )
        .await
        .expect("create");

    let updated = addresses
        .update(
            &customer_id,
            Delta::from_json(&json!({ "kind": "Invoice", "street": "New Street" }))
                .expect("parse"),
            "editor",
        )
        .await
        .expect("update");
    assert_eq!(updated.street, "New Street");
    assert_eq!(updated.kind, Some(AddressKind::Invoice));

    let record = store
        .find_by_customer_and_code(&customer_id, "I")
        .await
        .expect("lookup")
        .expect("still under code I");
    assert_eq!(record.audit.version, 2);
    assert_eq!(record.audit.updated_by, "editor");

    assert!(matches!(
        events.next().await,
        Some(ChangeEvent::AddressCreated { .. })
    ));
    assert_eq!(
        events.next().await,
        Some(ChangeEvent::AddressUpdated {
            customer_id: customer_id.clone(),
            kind: AddressKind::Invoice,
            state: ChangeState::UPDATE,
        })
    );
}

#[tokio::test]
async fn update_of_absent_kind_is_not_found() {
    let store = MemoryStore::new();
    let (addresses, customer_id, _events) = setup(&store).await;

    addresses
        .create(
            &customer_id,
            Delta::from_json(&json!({ "kind": "Invoice" })).expect("parse"),
            "tester",
        )
        .await
        .expect("create");

    // there is no Service address to update; the kind addresses the record
    let err = addresses
        .update(
            &customer_id,
            Delta::from_json(&json!({ "kind": "Service", "street": "Depot 3" }))
                .expect("parse"),
            "editor",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(
        err.to_string(),
        format!("Not found: Address kind Service for customer id {customer_id} not found.")
    );
}

#[tokio::test]
async fn noop_update_is_classified_away() {
    let store = MemoryStore::new();
    let (addresses, customer_id, mut events) = setup(&store).await;

    let body = json!({ "kind": "Delivery", "street": "Dock 7" });
    addresses
        .create(&customer_id, Delta::from_json(&body).expect("parse"), "tester")
        .await
        .expect("create");

    addresses
        .update(&customer_id, Delta::from_json(&body).expect("parse"), "editor")
        .await
        .expect("noop update");

    let record = store
        .find_by_customer_and_code(&customer_id, "D")
        .await
        .expect("lookup")
        .expect("exists");
    assert_eq!(record.audit.version, 1);
    assert_eq!(record.audit.updated_by, "tester");

    assert!(matches!(
        events.next().await,
        Some(ChangeEvent::AddressCreated { .. })
    ));
    assert_eq!(
        events.next().await,
        Some(ChangeEvent::AddressUpdateSkipped {
            customer_id: customer_id.clone(),
            kind: AddressKind::Delivery,
        })
    );
}

#[tokio::test]
async fn delete_removes_only_the_named_kind() {
    let store = MemoryStore::new();
    let (addresses, customer_id, _events) = setup(&store).await;

    for kind in ["Invoice", "Delivery"] {
        addresses
            .create(
                &customer_id,
                Delta::from_json(&json!({ "kind": kind })).expect("parse"),
                "tester",
            )
            .await
            .expect("create");
    }

    addresses
        .delete(&customer_id, AddressKind::Invoice)
        .await
        .expect("delete");
    assert_eq!(store.address_count().await, 1);

    let err = addresses
        .get(&customer_id, AddressKind::Invoice)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    addresses
        .get(&customer_id, AddressKind::Delivery)
        .await
        .expect("delivery survives");
}

#[tokio::test]
async fn blank_customer_id_is_a_validation_rejection() {
    let store = MemoryStore::new();
    let (addresses, _customer_id, _events) = setup(&store).await;

    let err = addresses
        .create(
            "  ",
            Delta::from_json(&json!({ "kind": "Invoice" })).expect("parse"),
            "tester",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert_eq!(
        err.validation_errors(),
        Some(&["customerId field is required.".to_owned()][..])
    );
}
