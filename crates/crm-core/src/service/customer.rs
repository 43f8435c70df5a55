//! Customer service

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::delta::Delta;
use crate::domain::Customer;
use crate::entity::CustomerRecordField;
use crate::error::{Error, Result};
use crate::mapping::CustomerMapper;
use crate::query::{CustomerQuery, Page};
use crate::service::{ChangeEvent, emit};
use crate::traits::{AddressRepository, CustomerRepository};
use crate::validation::{self, ValidationPipeline};

/// CRUD orchestration for customers
///
/// Listing maps bare records; single-customer reads join the customer's
/// addresses into their kind slots.
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    addresses: Arc<dyn AddressRepository>,
    rules: ValidationPipeline<Customer>,
    events: Option<mpsc::Sender<ChangeEvent>>,
}

impl CustomerService {
    /// Create a service over the given repositories
    pub fn new(customers: Arc<dyn CustomerRepository>, addresses: Arc<dyn AddressRepository>) -> Self {
        Self {
            customers,
            addresses,
            rules: validation::customer_rules(),
            events: None,
        }
    }

    /// Attach a change-event sender
    pub fn with_events(mut self, events: mpsc::Sender<ChangeEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// One page of customers (without address slots)
    pub async fn list(&self, query: &CustomerQuery) -> Result<Page<Customer>> {
        let (records, total) = self.customers.query(query).await?;
        let items = records
            .iter()
            .map(|record| CustomerMapper::map_record(record, &[]))
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total, &query.page))
    }

    /// One customer with its addresses joined in
    pub async fn get(&self, id: &str) -> Result<Customer> {
        let record = self
            .customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Customer with id {id} not found.")))?;
        let addresses = self.addresses.list_by_customer(id).await?;
        CustomerMapper::map_record(&record, &addresses)
    }

    /// Create a customer from a delta
    ///
    /// The materialized record is validated as a whole; any failure rejects
    /// the request with every collected message.
    pub async fn create(&self, delta: Delta<Customer>, actor: &str) -> Result<Customer> {
        let preview = delta.materialize()?;
        let errors = self.rules.validate(&preview);
        if !errors.is_empty() {
            return Err(Error::validation("Invalid customer model.", errors));
        }

        let mut entity_delta = CustomerMapper::map_delta(&delta);
        entity_delta.exclude(&[CustomerRecordField::Id]);

        let record = self.customers.create(entity_delta, actor).await?;
        info!(customer = %record.id, "customer created");
        emit(
            &self.events,
            ChangeEvent::CustomerCreated {
                id: record.id.clone(),
            },
        );
        CustomerMapper::map_record(&record, &[])
    }

    /// Apply a delta to an existing customer
    ///
    /// Classification runs before anything else: a delta that changes no
    /// tracked field skips mapping, validation, and the write entirely.
    pub async fn update(&self, id: &str, delta: Delta<Customer>, actor: &str) -> Result<Customer> {
        let record = self
            .customers
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Customer with id {id} not found.")))?;

        let mut entity_delta = CustomerMapper::map_delta(&delta);
        entity_delta.exclude(&[CustomerRecordField::Id]);

        let Some(state) = entity_delta.change_state(&record)? else {
            debug!(customer = id, "update changes nothing, skipping write");
            emit(
                &self.events,
                ChangeEvent::CustomerUpdateSkipped { id: id.to_owned() },
            );
            let addresses = self.addresses.list_by_customer(id).await?;
            return CustomerMapper::map_record(&record, &addresses);
        };

        let mut preview = record.clone();
        entity_delta.apply_to(&mut preview)?;
        let errors = self.rules.validate(&CustomerMapper::map_record(&preview, &[])?);
        if !errors.is_empty() {
            return Err(Error::validation("Invalid customer model.", errors));
        }

        let saved = self.customers.update(entity_delta, record, actor).await?;
        info!(customer = id, state = ?state, "customer updated");
        emit(
            &self.events,
            ChangeEvent::CustomerUpdated {
                id: id.to_owned(),
                state,
            },
        );

        let addresses = self.addresses.list_by_customer(id).await?;
        CustomerMapper::map_record(&saved, &addresses)
    }

    /// Delete a customer; its addresses go with it
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.customers.delete(id).await?;
        info!(customer = id, "customer deleted");
        emit(
            &self.events,
            ChangeEvent::CustomerDeleted { id: id.to_owned() },
        );
        Ok(())
    }
}
