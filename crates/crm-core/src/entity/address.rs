//! Address storage record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::delta::{DeltaModel, RecordField, coerce_text, text_or_empty};
use crate::entity::Audit;
use crate::error::Result;

/// Storage-facing address record
///
/// The kind discriminator is stored as a single-letter code; translation to
/// and from [`crate::domain::AddressKind`] lives in [`crate::mapping`] and
/// rejects anything outside the closed set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub name: String,
    pub street: String,
    pub zip: String,
    pub city: String,
    pub country: String,

    /// Kind code: one of [`AddressRecord::INVOICE`],
    /// [`AddressRecord::DELIVERY`], [`AddressRecord::SERVICE`]
    pub kind_code: String,

    /// Owning customer; (customer_id, kind_code) is unique in the store
    pub customer_id: String,

    #[serde(default)]
    pub audit: Audit,
}

impl AddressRecord {
    /// Storage code for invoice addresses
    pub const INVOICE: &'static str = "I";
    /// Storage code for delivery addresses
    pub const DELIVERY: &'static str = "D";
    /// Storage code for service addresses
    pub const SERVICE: &'static str = "S";
}

/// Field descriptors for [`AddressRecord`]
///
/// Audit fields are deliberately absent: they are server-managed and can
/// never arrive through a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressRecordField {
    Name,
    Street,
    Zip,
    City,
    Country,
    KindCode,
    CustomerId,
}

impl RecordField for AddressRecordField {
    fn all() -> &'static [Self] {
        &[
            AddressRecordField::Name,
            AddressRecordField::Street,
            AddressRecordField::Zip,
            AddressRecordField::City,
            AddressRecordField::Country,
            AddressRecordField::KindCode,
            AddressRecordField::CustomerId,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            AddressRecordField::Name => "name",
            AddressRecordField::Street => "street",
            AddressRecordField::Zip => "zip",
            AddressRecordField::City => "city",
            AddressRecordField::Country => "country",
            AddressRecordField::KindCode => "kind_code",
            AddressRecordField::CustomerId => "customer_id",
        }
    }
}

impl DeltaModel for AddressRecord {
    type Field = AddressRecordField;

    fn coerce(field: AddressRecordField, raw: &Value) -> Result<Value> {
        coerce_text(field.name(), raw)
    }

    fn assign(&mut self, field: AddressRecordField, value: Value) -> Result<()> {
        match field {
            AddressRecordField::Name => self.name = text_or_empty(value),
            AddressRecordField::Street => self.street = text_or_empty(value),
            AddressRecordField::Zip => self.zip = text_or_empty(value),
            AddressRecordField::City => self.city = text_or_empty(value),
            AddressRecordField::Country => self.country = text_or_empty(value),
            AddressRecordField::KindCode => self.kind_code = text_or_empty(value),
            AddressRecordField::CustomerId => self.customer_id = text_or_empty(value),
        }
        Ok(())
    }

    fn fetch(&self, field: AddressRecordField) -> Value {
        match field {
            AddressRecordField::Name => Value::String(self.name.clone()),
            AddressRecordField::Street => Value::String(self.street.clone()),
            AddressRecordField::Zip => Value::String(self.zip.clone()),
            AddressRecordField::City => Value::String(self.city.clone()),
            AddressRecordField::Country => Value::String(self.country.clone()),
            AddressRecordField::KindCode => Value::String(self.kind_code.clone()),
            AddressRecordField::CustomerId => Value::String(self.customer_id.clone()),
        }
    }
}
