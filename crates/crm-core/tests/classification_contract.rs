//! Contract Test: Change Classification
//!
//! This test verifies the delta-against-record classifier.
//!
//! Constraints verified:
//! - A field moving default → value contributes ADDITION
//! - A field moving value → default contributes DELETION
//! - A field moving value → other value contributes UPDATE
//! - A field that would not change contributes nothing
//! - Contributions from independent fields combine as flags
//! - Classification is pure: repeated runs and field order do not change
//!   the result
//!
//! If this test fails, no-op writes will start hitting the store (or real
//! changes will be silently skipped).

use crm_core::domain::CustomerField;
use crm_core::{ChangeState, Customer, Delta};
use serde_json::json;

fn existing_customer() -> Customer {
    Customer {
        id: "C000001".to_owned(),
        name: "Acme".to_owned(),
        street: "Main Street 1".to_owned(),
        ..Customer::default()
    }
}

#[test]
fn setting_an_empty_field_is_an_addition() {
    let delta: Delta<Customer> =
        Delta::from_json(&json!({ "city": "Springfield" })).expect("parse");

    let state = delta
        .change_state(&existing_customer())
        .expect("classify")
        .expect("city changes");
    assert_eq!(state, ChangeState::ADDITION);
}

#[test]
fn clearing_a_set_field_is_a_deletion() {
    let delta: Delta<Customer> = Delta::from_json(&json!({ "street": "" })).expect("parse");

    let state = delta
        .change_state(&existing_customer())
        .expect("classify")
        .expect("street changes");
    assert_eq!(state, ChangeState::DELETION);
}

#[test]
fn null_clears_like_an_empty_string() {
    // a deliberately empty string and an explicit null classify the same;
    // the emptiness policy cannot tell them apart
    let via_empty: Delta<Customer> = Delta::from_json(&json!({ "street": "" })).expect("parse");
    let via_null: Delta<Customer> = Delta::from_json(&json!({ "street": null })).expect("parse");

    let record = existing_customer();
    assert_eq!(
        via_empty.change_state(&record).expect("classify"),
        via_null.change_state(&record).expect("classify"),
    );
}

#[test]
fn null_onto_an_already_empty_field_is_no_change() {
    // city is empty on the existing record; writing null over it would
    // store the same empty string, so nothing changes and no version
    // bump is warranted
    let delta: Delta<Customer> = Delta::from_json(&json!({ "city": null })).expect("parse");

    assert_eq!(delta.change_state(&existing_customer()).expect("classify"), None);
}

#[test]
fn replacing_a_set_field_is_an_update() {
    let delta: Delta<Customer> =
        Delta::from_json(&json!({ "name": "Acme Corp" })).expect("parse");

    let state = delta
        .change_state(&existing_customer())
        .expect("classify")
        .expect("name changes");
    assert_eq!(state, ChangeState::UPDATE);
}

#[test]
fn unchanged_fields_contribute_nothing() {
    // every tracked field already holds that exact value
    let delta: Delta<Customer> = Delta::from_json(&json!({
        "name": "Acme",
        "street": "Main Street 1",
    }))
    .expect("parse");

    assert_eq!(delta.change_state(&existing_customer()).expect("classify"), None);
}

#[test]
fn empty_delta_classifies_as_no_change() {
    let delta: Delta<Customer> = Delta::new();
    assert_eq!(delta.change_state(&existing_customer()).expect("classify"), None);
}

#[test]
fn independent_fields_combine_as_flags() {
    let delta: Delta<Customer> = Delta::from_json(&json!({
        "city": "Springfield",   // addition: was empty
        "street": "",            // deletion: was set
        "name": "Acme Corp",     // update: was different
    }))
    .expect("parse");

    let state = delta
        .change_state(&existing_customer())
        .expect("classify")
        .expect("three fields change");

    assert!(state.has_addition());
    assert!(state.has_deletion());
    assert!(state.has_update());
    assert!(state.contains(ChangeState::ADDITION | ChangeState::DELETION | ChangeState::UPDATE));
}

#[test]
fn excluded_fields_do_not_contribute() {
    let mut delta: Delta<Customer> =
        Delta::from_json(&json!({ "name": "Acme Corp" })).expect("parse");
    delta.exclude(&[CustomerField::Name]);

    assert_eq!(delta.change_state(&existing_customer()).expect("classify"), None);
}

#[test]
fn classification_is_idempotent_and_order_independent() {
    let record = existing_customer();

    let delta: Delta<Customer> = Delta::from_json(&json!({
        "name": "Acme Corp",
        "city": "Springfield",
    }))
    .expect("parse");
    let first = delta.change_state(&record).expect("classify");
    let second = delta.change_state(&record).expect("classify");
    assert_eq!(first, second);

    // same fields tracked in the opposite order
    let mut reversed: Delta<Customer> = Delta::new();
    reversed.set_value(CustomerField::City, "Springfield");
    reversed.set_value(CustomerField::Name, "Acme Corp");
    assert_eq!(reversed.change_state(&record).expect("classify"), first);
}

#[test]
fn classifying_does_not_mutate_the_record() {
    let record = existing_customer();
    let delta: Delta<Customer> = Delta::from_json(&json!({ "name": "Other" })).expect("parse");

    delta.change_state(&record).expect("classify");
    assert_eq!(record.name, "Acme");
}
