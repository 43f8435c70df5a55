//! Customer domain record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::delta::{DeltaModel, RecordField, coerce_text, text_or_empty};
use crate::domain::Address;
use crate::error::Result;

/// API-facing customer record
///
/// The three address slots are aggregates populated by the customer mapper;
/// they are not delta fields. Address changes travel through the address
/// service, keyed by customer id and kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub street: String,
    pub zip: String,
    pub city: String,
    pub country: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_address: Option<Address>,
}

/// Field descriptors for [`Customer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    Id,
    Name,
    Street,
    Zip,
    City,
    Country,
}

impl RecordField for CustomerField {
    fn all() -> &'static [Self] {
        &[
            CustomerField::Id,
            CustomerField::Name,
            CustomerField::Street,
            CustomerField::Zip,
            CustomerField::City,
            CustomerField::Country,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            CustomerField::Id => "id",
            CustomerField::Name => "name",
            CustomerField::Street => "street",
            CustomerField::Zip => "zip",
            CustomerField::City => "city",
            CustomerField::Country => "country",
        }
    }
}

impl DeltaModel for Customer {
    type Field = CustomerField;

    fn coerce(field: CustomerField, raw: &Value) -> Result<Value> {
        coerce_text(field.name(), raw)
    }

    fn assign(&mut self, field: CustomerField, value: Value) -> Result<()> {
        match field {
            CustomerField::Id => self.id = text_or_empty(value),
            CustomerField::Name => self.name = text_or_empty(value),
            CustomerField::Street => self.street = text_or_empty(value),
            CustomerField::Zip => self.zip = text_or_empty(value),
            CustomerField::City => self.city = text_or_empty(value),
            CustomerField::Country => self.country = text_or_empty(value),
        }
        Ok(())
    }

    fn fetch(&self, field: CustomerField) -> Value {
        match field {
            CustomerField::Id => Value::String(self.id.clone()),
            CustomerField::Name => Value::String(self.name.clone()),
            CustomerField::Street => Value::String(self.street.clone()),
            CustomerField::Zip => Value::String(self.zip.clone()),
            CustomerField::City => Value::String(self.city.clone()),
            CustomerField::Country => Value::String(self.country.clone()),
        }
    }
}
