//! Customer storage record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::delta::{DeltaModel, RecordField, coerce_text, text_or_empty};
use crate::entity::Audit;
use crate::error::Result;

/// Storage-facing customer record
///
/// Addresses are not embedded; they live in their own table keyed by
/// (customer_id, kind_code) and are joined by the customer mapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Store-assigned identifier
    pub id: String,
    pub name: String,
    pub street: String,
    pub zip: String,
    pub city: String,
    pub country: String,

    #[serde(default)]
    pub audit: Audit,
}

/// Field descriptors for [`CustomerRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerRecordField {
    Id,
    Name,
    Street,
    Zip,
    City,
    Country,
}

impl RecordField for CustomerRecordField {
    fn all() -> &'static [Self] {
        &[
            CustomerRecordField::Id,
            CustomerRecordField::Name,
            CustomerRecordField::Street,
            CustomerRecordField::Zip,
            CustomerRecordField::City,
            CustomerRecordField::Country,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            CustomerRecordField::Id => "id",
            CustomerRecordField::Name => "name",
            CustomerRecordField::Street => "street",
            CustomerRecordField::Zip => "zip",
            CustomerRecordField::City => "city",
            CustomerRecordField::Country => "country",
        }
    }
}

impl DeltaModel for CustomerRecord {
    type Field = CustomerRecordField;

    fn coerce(field: CustomerRecordField, raw: &Value) -> Result<Value> {
        coerce_text(field.name(), raw)
    }

    fn assign(&mut self, field: CustomerRecordField, value: Value) -> Result<()> {
        match field {
            CustomerRecordField::Id => self.id = text_or_empty(value),
            CustomerRecordField::Name => self.name = text_or_empty(value),
            CustomerRecordField::Street => self.street = text_or_empty(value),
            CustomerRecordField::Zip => self.zip = text_or_empty(value),
            CustomerRecordField::City => self.city = text_or_empty(value),
            CustomerRecordField::Country => self.country = text_or_empty(value),
        }
        Ok(())
    }

    fn fetch(&self, field: CustomerRecordField) -> Value {
        match field {
            CustomerRecordField::Id => Value::String(self.id.clone()),
            CustomerRecordField::Name => Value::String(self.name.clone()),
            CustomerRecordField::Street => Value::String(self.street.clone()),
            CustomerRecordField::Zip => Value::String(self.zip.clone()),
            CustomerRecordField::City => Value::String(self.city.clone()),
            CustomerRecordField::Country => Value::String(self.country.clone()),
        }
    }
}
