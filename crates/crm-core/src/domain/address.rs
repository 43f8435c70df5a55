//! Address domain record and the address-kind discriminator

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::delta::{DeltaModel, RecordField, coerce_text, text_or_empty};
use crate::error::{Error, Result};

/// Closed set of address kinds a customer can own
///
/// One record type with an explicit tag, instead of a subtype per kind; the
/// storage representation is a single-letter code (see [`crate::mapping`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// Billing address ("I")
    Invoice,
    /// Shipping address ("D")
    Delivery,
    /// On-site service address ("S")
    Service,
}

impl AddressKind {
    /// All kinds, in discriminator-index order
    pub const ALL: [AddressKind; 3] = [
        AddressKind::Invoice,
        AddressKind::Delivery,
        AddressKind::Service,
    ];

    /// Symbolic name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            AddressKind::Invoice => "Invoice",
            AddressKind::Delivery => "Delivery",
            AddressKind::Service => "Service",
        }
    }

    /// Parse a symbolic name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Resolve the underlying numeric index (0 = Invoice, 1 = Delivery,
    /// 2 = Service)
    pub fn from_index(index: u64) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Decode a client-supplied value
    ///
    /// Accepts the symbolic name (case-insensitive), the numeric index, or
    /// explicit null. Anything else is an [`Error::InvalidInput`].
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(name) => Self::from_name(name).map(Some).ok_or_else(|| {
                Error::invalid_input(format!("'{name}' is not an address kind"))
            }),
            Value::Number(n) => n
                .as_u64()
                .and_then(Self::from_index)
                .map(Some)
                .ok_or_else(|| Error::invalid_input(format!("{n} is not an address kind index"))),
            other => Err(Error::invalid_input(format!(
                "address kind expects a name or index, got {other}"
            ))),
        }
    }

    /// Canonical value form used by deltas: the symbolic name, or null
    pub(crate) fn to_value(kind: Option<Self>) -> Value {
        match kind {
            Some(kind) => Value::String(kind.as_str().to_owned()),
            None => Value::Null,
        }
    }
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API-facing address record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub name: String,
    pub street: String,
    pub zip: String,
    pub city: String,
    pub country: String,
    /// Required discriminator; `None` here is a validation failure, not a
    /// mapping default
    pub kind: Option<AddressKind>,
}

/// Field descriptors for [`Address`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Name,
    Street,
    Zip,
    City,
    Country,
    Kind,
}

impl RecordField for AddressField {
    fn all() -> &'static [Self] {
        &[
            AddressField::Name,
            AddressField::Street,
            AddressField::Zip,
            AddressField::City,
            AddressField::Country,
            AddressField::Kind,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            AddressField::Name => "name",
            AddressField::Street => "street",
            AddressField::Zip => "zip",
            AddressField::City => "city",
            AddressField::Country => "country",
            AddressField::Kind => "kind",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        // older clients still send "addressType"
        match self {
            AddressField::Kind => &["address_type"],
            _ => &[],
        }
    }
}

impl DeltaModel for Address {
    type Field = AddressField;

    fn coerce(field: AddressField, raw: &Value) -> Result<Value> {
        match field {
            AddressField::Kind => Ok(AddressKind::to_value(AddressKind::from_value(raw)?)),
            _ => coerce_text(field.name(), raw),
        }
    }

    fn assign(&mut self, field: AddressField, value: Value) -> Result<()> {
        match field {
            AddressField::Name => self.name = text_or_empty(value),
            AddressField::Street => self.street = text_or_empty(value),
            AddressField::Zip => self.zip = text_or_empty(value),
            AddressField::City => self.city = text_or_empty(value),
            AddressField::Country => self.country = text_or_empty(value),
            AddressField::Kind => self.kind = AddressKind::from_value(&value)?,
        }
        Ok(())
    }

    fn fetch(&self, field: AddressField) -> Value {
        match field {
            AddressField::Name => Value::String(self.name.clone()),
            AddressField::Street => Value::String(self.street.clone()),
            AddressField::Zip => Value::String(self.zip.clone()),
            AddressField::City => Value::String(self.city.clone()),
            AddressField::Country => Value::String(self.country.clone()),
            AddressField::Kind => AddressKind::to_value(self.kind),
        }
    }
}
