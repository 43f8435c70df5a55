//! Validation pipeline
//!
//! Validates a fully materialized domain record (never a partial delta)
//! against an ordered list of independent field checks. The pipeline is
//! stable in check order, never stops at the first failure, and collects
//! every failing check's message. Zero messages means the record is clean;
//! one or more means the caller rejects the whole request and reports all
//! of them.

pub mod country;

use crate::domain::{Address, AddressKind, Customer};

/// Validation error message formats
pub mod messages {
    /// A required text field was empty or whitespace
    pub fn field_is_required(field: &str) -> String {
        format!("{field} field is required.")
    }

    /// A text field exceeded its maximum length
    pub fn too_long(field: &str, max: usize) -> String {
        format!("{field} field is too long. Max {max} characters allowed.")
    }

    /// A country field held something outside the ISO 3166 set
    pub fn not_a_country_code(value: &str) -> String {
        format!("{value} is not a valid ISO 3166 country code.")
    }

    /// A closed-set field held a value outside its set
    pub fn invalid_value(field: &str, value: &str, allowed: &str) -> String {
        format!("{field} field has invalid value {value}. Allowed set: {allowed}.")
    }
}

/// Ordered list of field checks over a record type
///
/// Each check receives the whole record and returns `Some(message)` on
/// failure. Individual rule failures are data, not errors: `validate`
/// itself never fails.
pub struct ValidationPipeline<T> {
    checks: Vec<Box<dyn Fn(&T) -> Option<String> + Send + Sync>>,
}

impl<T> ValidationPipeline<T> {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Append a check; order of registration is order of evaluation
    pub fn check(mut self, check: impl Fn(&T) -> Option<String> + Send + Sync + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Run every check and collect all failure messages
    pub fn validate(&self, record: &T) -> Vec<String> {
        self.checks.iter().filter_map(|check| check(record)).collect()
    }
}

impl<T> Default for ValidationPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Required + max-length check for a text field
///
/// Required fields fail when empty or whitespace; optional fields fail
/// only on length. Lengths are measured on the trimmed value.
pub fn check_text(field: &str, value: &str, max_len: usize, required: bool) -> Option<String> {
    let trimmed = value.trim();
    if required && trimmed.is_empty() {
        return Some(messages::field_is_required(field));
    }
    if trimmed.chars().count() > max_len {
        return Some(messages::too_long(field, max_len));
    }
    None
}

/// ISO 3166 membership check; empty values pass (length/required checks
/// own that case)
fn check_country(value: &str) -> Option<String> {
    if !value.is_empty() && !country::is_country_code(value) {
        return Some(messages::not_a_country_code(value));
    }
    None
}

/// Message for an unset address-kind discriminator
///
/// Shared between the pipeline rule and the service guards so a missing
/// kind reads the same no matter where it is caught.
pub fn kind_unset_message() -> String {
    messages::invalid_value(
        "kind",
        "<unset>",
        &format!(
            "[{}, {}, {}]",
            AddressKind::Invoice,
            AddressKind::Delivery,
            AddressKind::Service
        ),
    )
}

/// Validation rules for a customer record
pub fn customer_rules() -> ValidationPipeline<Customer> {
    ValidationPipeline::new()
        .check(|c: &Customer| check_text("name", &c.name, 100, true))
        .check(|c: &Customer| check_text("street", &c.street, 100, false))
        .check(|c: &Customer| check_text("zip", &c.zip, 20, false))
        .check(|c: &Customer| check_text("city", &c.city, 100, false))
        .check(|c: &Customer| check_text("country", &c.country, 2, false))
        .check(|c: &Customer| check_country(&c.country))
}

/// Validation rules for an address record
///
/// An unset kind discriminator is a validation failure here, not an error;
/// the closed set is spelled out in the message.
pub fn address_rules() -> ValidationPipeline<Address> {
    ValidationPipeline::new()
        .check(|a: &Address| a.kind.is_none().then(kind_unset_message))
        .check(|a: &Address| check_text("name", &a.name, 100, false))
        .check(|a: &Address| check_text("street", &a.street, 100, false))
        .check(|a: &Address| check_text("zip", &a.zip, 20, false))
        .check(|a: &Address| check_text("city", &a.city, 100, false))
        .check(|a: &Address| check_text("country", &a.country, 2, false))
        .check(|a: &Address| check_country(&a.country))
}
