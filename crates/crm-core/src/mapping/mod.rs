//! Domain ↔ storage mapping
//!
//! Two-way conversion between the API-facing shapes in [`crate::domain`]
//! and the storage-facing shapes in [`crate::entity`], for both full
//! records and deltas.
//!
//! The one contract that must hold exactly: the kind-code translation is
//! total over {"I", "D", "S"} and fails loudly for anything else. Silent
//! defaulting here is the only place data corruption could creep in.

use crate::delta::Delta;
use crate::domain::{Address, AddressField, AddressKind, Customer, CustomerField};
use crate::entity::{AddressRecord, AddressRecordField, CustomerRecord, CustomerRecordField};
use crate::error::{Error, Result};

/// Translate an address kind to its storage code
pub fn kind_to_code(kind: AddressKind) -> &'static str {
    match kind {
        AddressKind::Invoice => AddressRecord::INVOICE,
        AddressKind::Delivery => AddressRecord::DELIVERY,
        AddressKind::Service => AddressRecord::SERVICE,
    }
}

/// Translate a storage code back to an address kind
///
/// Rejects any code outside the closed set — never defaults.
pub fn kind_from_code(code: &str) -> Result<AddressKind> {
    match code {
        AddressRecord::INVOICE => Ok(AddressKind::Invoice),
        AddressRecord::DELIVERY => Ok(AddressKind::Delivery),
        AddressRecord::SERVICE => Ok(AddressKind::Service),
        other => Err(Error::not_supported(format!(
            "address kind code '{other}' is not supported"
        ))),
    }
}

/// Maps addresses between domain and storage shapes
pub struct AddressMapper;

impl AddressMapper {
    /// Map a domain delta into a storage delta
    ///
    /// The kind discriminator is required: a delta without one cannot be
    /// mapped, because the storage code is meaningless without it.
    pub fn map_delta(seed: &Delta<Address>) -> Result<Delta<AddressRecord>> {
        let kind = AddressKind::from_value(&seed.get_value(AddressField::Kind)?)?
            .ok_or_else(|| {
                Error::not_supported("address kind is required to map an address delta")
            })?;

        let mut delta = Delta::new();
        delta.set_value(AddressRecordField::KindCode, kind_to_code(kind));

        const FIELDS: [(AddressField, AddressRecordField); 5] = [
            (AddressField::Name, AddressRecordField::Name),
            (AddressField::Street, AddressRecordField::Street),
            (AddressField::Zip, AddressRecordField::Zip),
            (AddressField::City, AddressRecordField::City),
            (AddressField::Country, AddressRecordField::Country),
        ];
        for (source, target) in FIELDS {
            if let Some(value) = seed.try_get_value(source) {
                delta.set_value(target, value.clone());
            }
        }
        Ok(delta)
    }

    /// Map a storage record into the domain shape
    pub fn map_record(record: &AddressRecord) -> Result<Address> {
        Ok(Address {
            name: record.name.clone(),
            street: record.street.clone(),
            zip: record.zip.clone(),
            city: record.city.clone(),
            country: record.country.clone(),
            kind: Some(kind_from_code(&record.kind_code)?),
        })
    }
}

/// Maps customers between domain and storage shapes
pub struct CustomerMapper;

impl CustomerMapper {
    /// Map a domain delta into a storage delta
    ///
    /// Scalar fields only; address slots travel through the address
    /// service, never through a customer delta.
    pub fn map_delta(seed: &Delta<Customer>) -> Delta<CustomerRecord> {
        const FIELDS: [(CustomerField, CustomerRecordField); 6] = [
            (CustomerField::Id, CustomerRecordField::Id),
            (CustomerField::Name, CustomerRecordField::Name),
            (CustomerField::Street, CustomerRecordField::Street),
            (CustomerField::Zip, CustomerRecordField::Zip),
            (CustomerField::City, CustomerRecordField::City),
            (CustomerField::Country, CustomerRecordField::Country),
        ];

        let mut delta = Delta::new();
        for (source, target) in FIELDS {
            if let Some(value) = seed.try_get_value(source) {
                delta.set_value(target, value.clone());
            }
        }
        delta
    }

    /// Map a storage record plus its addresses into the domain shape
    ///
    /// At most one address per kind lands in its named slot; a duplicate
    /// kind in the input (which the store forbids anyway) keeps the first.
    pub fn map_record(record: &CustomerRecord, addresses: &[AddressRecord]) -> Result<Customer> {
        let mut customer = Customer {
            id: record.id.clone(),
            name: record.name.clone(),
            street: record.street.clone(),
            zip: record.zip.clone(),
            city: record.city.clone(),
            country: record.country.clone(),
            ..Customer::default()
        };

        for address in addresses {
            let kind = kind_from_code(&address.kind_code)?;
            let slot = match kind {
                AddressKind::Invoice => &mut customer.invoice_address,
                AddressKind::Delivery => &mut customer.delivery_address,
                AddressKind::Service => &mut customer.service_address,
            };
            if slot.is_none() {
                *slot = Some(AddressMapper::map_record(address)?);
            }
        }

        Ok(customer)
    }
}
