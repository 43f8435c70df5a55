//! Address service

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::delta::Delta;
use crate::domain::{Address, AddressField, AddressKind};
use crate::entity::AddressRecordField;
use crate::error::{Error, Result};
use crate::mapping::{AddressMapper, kind_to_code};
use crate::query::{AddressQuery, Page};
use crate::service::{ChangeEvent, emit};
use crate::traits::AddressRepository;
use crate::validation::{self, ValidationPipeline};

/// CRUD orchestration for a customer's typed addresses
///
/// Addresses are addressed by (customer id, kind): a customer owns at most
/// one address of each kind, and a created address keeps its kind for life
/// — changing it means delete and recreate.
pub struct AddressService {
    addresses: Arc<dyn AddressRepository>,
    rules: ValidationPipeline<Address>,
    events: Option<mpsc::Sender<ChangeEvent>>,
}

impl AddressService {
    /// Create a service over the given repository
    pub fn new(addresses: Arc<dyn AddressRepository>) -> Self {
        Self {
            addresses,
            rules: validation::address_rules(),
            events: None,
        }
    }

    /// Attach a change-event sender
    pub fn with_events(mut self, events: mpsc::Sender<ChangeEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// All addresses of one customer
    pub async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Address>> {
        require_customer_id(customer_id)?;
        let records = self.addresses.list_by_customer(customer_id).await?;
        records.iter().map(AddressMapper::map_record).collect()
    }

    /// One page of addresses across customers
    pub async fn list(&self, query: &AddressQuery) -> Result<Page<Address>> {
        let (records, total) = self.addresses.query(query).await?;
        let items = records
            .iter()
            .map(AddressMapper::map_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total, &query.page))
    }

    /// One address by owner and kind
    pub async fn get(&self, customer_id: &str, kind: AddressKind) -> Result<Address> {
        require_customer_id(customer_id)?;
        let record = self
            .addresses
            .find_by_customer_and_code(customer_id, kind_to_code(kind))
            .await?
            .ok_or_else(|| not_found(customer_id, kind))?;
        AddressMapper::map_record(&record)
    }

    /// Create an address for a customer from a delta
    ///
    /// The delta must carry the kind discriminator; the (customer, kind)
    /// slot must be free; the materialized record must validate.
    pub async fn create(
        &self,
        customer_id: &str,
        delta: Delta<Address>,
        actor: &str,
    ) -> Result<Address> {
        require_customer_id(customer_id)?;
        let kind = require_kind(&delta)?;

        if self
            .addresses
            .exists_by_customer_and_code(customer_id, kind_to_code(kind))
            .await?
        {
            return Err(Error::conflict(format!(
                "Address of kind {kind} exists on customer {customer_id}."
            )));
        }

        let errors = self.rules.validate(&delta.materialize()?);
        if !errors.is_empty() {
            return Err(Error::validation("Invalid address model.", errors));
        }

        let mut entity_delta = AddressMapper::map_delta(&delta)?;
        entity_delta.set_value(AddressRecordField::CustomerId, customer_id);

        let record = self.addresses.create(entity_delta, actor).await?;
        info!(customer = customer_id, %kind, "address created");
        emit(
            &self.events,
            ChangeEvent::AddressCreated {
                customer_id: customer_id.to_owned(),
                kind,
            },
        );
        AddressMapper::map_record(&record)
    }

    /// Apply a delta to an existing address
    ///
    /// The delta's kind selects the record, so the kind itself can never
    /// change here. A delta that changes nothing skips the write.
    pub async fn update(
        &self,
        customer_id: &str,
        delta: Delta<Address>,
        actor: &str,
    ) -> Result<Address> {
        require_customer_id(customer_id)?;
        let kind = require_kind(&delta)?;

        let record = self
            .addresses
            .find_by_customer_and_code(customer_id, kind_to_code(kind))
            .await?
            .ok_or_else(|| not_found(customer_id, kind))?;

        let mut entity_delta = AddressMapper::map_delta(&delta)?;
        entity_delta.exclude(&[AddressRecordField::CustomerId]);

        let Some(state) = entity_delta.change_state(&record)? else {
            debug!(customer = customer_id, %kind, "update changes nothing, skipping write");
            emit(
                &self.events,
                ChangeEvent::AddressUpdateSkipped {
                    customer_id: customer_id.to_owned(),
                    kind,
                },
            );
            return AddressMapper::map_record(&record);
        };

        let mut preview = record.clone();
        entity_delta.apply_to(&mut preview)?;
        let errors = self.rules.validate(&AddressMapper::map_record(&preview)?);
        if !errors.is_empty() {
            return Err(Error::validation("Invalid address model.", errors));
        }

        let saved = self.addresses.update(entity_delta, record, actor).await?;
        info!(customer = customer_id, %kind, state = ?state, "address updated");
        emit(
            &self.events,
            ChangeEvent::AddressUpdated {
                customer_id: customer_id.to_owned(),
                kind,
                state,
            },
        );
        AddressMapper::map_record(&saved)
    }

    /// Delete one address by owner and kind
    pub async fn delete(&self, customer_id: &str, kind: AddressKind) -> Result<()> {
        require_customer_id(customer_id)?;
        self.addresses
            .delete(customer_id, kind_to_code(kind))
            .await?;
        info!(customer = customer_id, %kind, "address deleted");
        emit(
            &self.events,
            ChangeEvent::AddressDeleted {
                customer_id: customer_id.to_owned(),
                kind,
            },
        );
        Ok(())
    }
}

// A blank owner id or an unset kind are validation failures, same
// category as the pipeline rules, not programming errors.

fn require_customer_id(customer_id: &str) -> Result<()> {
    if customer_id.trim().is_empty() {
        return Err(Error::validation(
            "Invalid address model.",
            vec![validation::messages::field_is_required("customerId")],
        ));
    }
    Ok(())
}

fn require_kind(delta: &Delta<Address>) -> Result<AddressKind> {
    AddressKind::from_value(&delta.get_value(AddressField::Kind)?)?.ok_or_else(|| {
        Error::validation(
            "Invalid address model.",
            vec![validation::kind_unset_message()],
        )
    })
}

fn not_found(customer_id: &str, kind: AddressKind) -> Error {
    Error::not_found(format!(
        "Address kind {kind} for customer id {customer_id} not found."
    ))
}
