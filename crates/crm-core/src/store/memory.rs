// # Memory Store
//
// In-memory implementation of both repository traits.
//
// ## Purpose
//
// Backs tests, demos, and embedded deployments where persistence across
// restarts is not needed. All data is lost on restart.
//
// ## Consistency
//
// The store owns the constraints a relational schema would:
// - ids are store-assigned and unique
// - (customer_id, kind_code) is unique for addresses
// - deleting a customer cascades to its addresses
// - updates are version-counted via the audit block, and a delta that
//   changes nothing skips the write entirely (no version bump)

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::delta::Delta;
use crate::entity::{AddressRecord, CustomerRecord, CustomerRecordField};
use crate::error::Error;
use crate::query::{AddressQuery, AddressSortKey, CustomerQuery, CustomerSortKey, SortOrder};
use crate::traits::{AddressRepository, CustomerRepository};

/// Address key: (customer_id, kind_code)
type AddressKey = (String, String);

/// In-memory store implementing [`CustomerRepository`] and
/// [`AddressRepository`]
///
/// Customers and addresses live in HashMaps behind RwLocks; the struct is
/// cheaply cloneable and all clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    customers: Arc<RwLock<HashMap<String, CustomerRecord>>>,
    addresses: Arc<RwLock<HashMap<AddressKey, AddressRecord>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of customers in the store
    pub async fn customer_count(&self) -> usize {
        self.customers.read().await.len()
    }

    /// Number of addresses in the store
    pub async fn address_count(&self) -> usize {
        self.addresses.read().await.len()
    }

    /// Remove everything
    pub async fn clear(&self) {
        self.customers.write().await.clear();
        self.addresses.write().await.clear();
    }

    fn assign_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("C{n:06}")
    }
}

fn sort_customers(records: &mut [CustomerRecord], query: &CustomerQuery) {
    let descending = query.sort_order == Some(SortOrder::Descending);
    match query.sort_by {
        Some(CustomerSortKey::CreatedAt) => {
            records.sort_by(|a, b| a.audit.created_at.cmp(&b.audit.created_at));
        }
        Some(CustomerSortKey::UpdatedAt) => {
            records.sort_by(|a, b| a.audit.updated_at.cmp(&b.audit.updated_at));
        }
        Some(CustomerSortKey::Name) => records.sort_by(|a, b| a.name.cmp(&b.name)),
        // stable listing order even without an explicit sort
        None => records.sort_by(|a, b| a.id.cmp(&b.id)),
    }
    if query.sort_by.is_some() && descending {
        records.reverse();
    }
}

fn sort_addresses(records: &mut [AddressRecord], query: &AddressQuery) {
    let descending = query.sort_order == Some(SortOrder::Descending);
    match query.sort_by {
        Some(AddressSortKey::CreatedAt) => {
            records.sort_by(|a, b| a.audit.created_at.cmp(&b.audit.created_at));
        }
        Some(AddressSortKey::UpdatedAt) => {
            records.sort_by(|a, b| a.audit.updated_at.cmp(&b.audit.updated_at));
        }
        Some(AddressSortKey::Kind) => records.sort_by(|a, b| a.kind_code.cmp(&b.kind_code)),
        None => records.sort_by(|a, b| {
            (&a.customer_id, &a.kind_code).cmp(&(&b.customer_id, &b.kind_code))
        }),
    }
    if query.sort_by.is_some() && descending {
        records.reverse();
    }
}

fn page_window<T>(records: Vec<T>, offset: usize, page_size: usize) -> Vec<T> {
    records.into_iter().skip(offset).take(page_size).collect()
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn query(&self, query: &CustomerQuery) -> Result<(Vec<CustomerRecord>, usize), Error> {
        let guard = self.customers.read().await;
        let mut records: Vec<CustomerRecord> = guard.values().cloned().collect();
        drop(guard);

        let total = records.len();
        sort_customers(&mut records, query);
        let items = page_window(records, query.page.offset(), query.page.page_size);
        Ok((items, total))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CustomerRecord>, Error> {
        let guard = self.customers.read().await;
        Ok(guard.get(id).cloned())
    }

    async fn create(
        &self,
        mut delta: Delta<CustomerRecord>,
        actor: &str,
    ) -> Result<CustomerRecord, Error> {
        // ids are store-assigned; a client-supplied one is ignored
        delta.exclude(&[CustomerRecordField::Id]);

        let mut record = delta.materialize()?;
        record.id = self.assign_id();
        record.audit.stamp_created(actor);

        let mut guard = self.customers.write().await;
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        mut delta: Delta<CustomerRecord>,
        record: CustomerRecord,
        actor: &str,
    ) -> Result<CustomerRecord, Error> {
        delta.exclude(&[CustomerRecordField::Id]);

        let mut record = record;
        if delta.change_state(&record)?.is_none() {
            return Ok(record);
        }

        delta.apply_to(&mut record)?;
        record.audit.stamp_updated(actor);

        let mut guard = self.customers.write().await;
        if !guard.contains_key(&record.id) {
            return Err(Error::not_found(format!(
                "Customer with id {} not found.",
                record.id
            )));
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), Error> {
        let mut customers = self.customers.write().await;
        if customers.remove(id).is_none() {
            return Err(Error::not_found(format!("Customer with id {id} not found.")));
        }
        // cascade
        let mut addresses = self.addresses.write().await;
        addresses.retain(|(customer_id, _), _| customer_id != id);
        Ok(())
    }
}

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn query(&self, query: &AddressQuery) -> Result<(Vec<AddressRecord>, usize), Error> {
        let guard = self.addresses.read().await;
        let mut records: Vec<AddressRecord> = guard
            .values()
            .filter(|record| {
                query
                    .customer_id
                    .as_deref()
                    .is_none_or(|id| record.customer_id == id)
            })
            .cloned()
            .collect();
        drop(guard);

        let total = records.len();
        sort_addresses(&mut records, query);
        let items = page_window(records, query.page.offset(), query.page.page_size);
        Ok((items, total))
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<AddressRecord>, Error> {
        let guard = self.addresses.read().await;
        let mut records: Vec<AddressRecord> = guard
            .values()
            .filter(|record| record.customer_id == customer_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.kind_code.cmp(&b.kind_code));
        Ok(records)
    }

    async fn find_by_customer_and_code(
        &self,
        customer_id: &str,
        code: &str,
    ) -> Result<Option<AddressRecord>, Error> {
        let guard = self.addresses.read().await;
        Ok(guard
            .get(&(customer_id.to_owned(), code.to_owned()))
            .cloned())
    }

    async fn exists_by_customer_and_code(
        &self,
        customer_id: &str,
        code: &str,
    ) -> Result<bool, Error> {
        let guard = self.addresses.read().await;
        Ok(guard.contains_key(&(customer_id.to_owned(), code.to_owned())))
    }

    async fn create(
        &self,
        delta: Delta<AddressRecord>,
        actor: &str,
    ) -> Result<AddressRecord, Error> {
        let mut record = delta.materialize()?;
        if record.customer_id.is_empty() {
            return Err(Error::invalid_input("address delta must carry a customer id"));
        }
        if record.kind_code.is_empty() {
            return Err(Error::invalid_input("address delta must carry a kind code"));
        }

        let customers = self.customers.read().await;
        if !customers.contains_key(&record.customer_id) {
            return Err(Error::not_found(format!(
                "Customer with id {} not found.",
                record.customer_id
            )));
        }
        drop(customers);

        let mut guard = self.addresses.write().await;
        let key = (record.customer_id.clone(), record.kind_code.clone());
        if guard.contains_key(&key) {
            return Err(Error::conflict(format!(
                "Address of kind {} exists on customer {}.",
                record.kind_code, record.customer_id
            )));
        }

        record.audit.stamp_created(actor);
        guard.insert(key, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        mut delta: Delta<AddressRecord>,
        record: AddressRecord,
        actor: &str,
    ) -> Result<AddressRecord, Error> {
        use crate::entity::AddressRecordField;

        // the back-reference is server-managed
        delta.exclude(&[AddressRecordField::CustomerId]);

        let old_key = (record.customer_id.clone(), record.kind_code.clone());
        let mut record = record;
        if delta.change_state(&record)?.is_none() {
            return Ok(record);
        }

        delta.apply_to(&mut record)?;
        record.audit.stamp_updated(actor);

        let mut guard = self.addresses.write().await;
        if !guard.contains_key(&old_key) {
            return Err(Error::not_found(format!(
                "Address of kind {} for customer id {} not found.",
                old_key.1, old_key.0
            )));
        }

        let new_key = (record.customer_id.clone(), record.kind_code.clone());
        if new_key != old_key {
            // kind moved: the target slot must be free
            if guard.contains_key(&new_key) {
                return Err(Error::conflict(format!(
                    "Address of kind {} exists on customer {}.",
                    new_key.1, new_key.0
                )));
            }
            guard.remove(&old_key);
        }
        guard.insert(new_key, record.clone());
        Ok(record)
    }

    async fn delete(&self, customer_id: &str, code: &str) -> Result<(), Error> {
        let mut guard = self.addresses.write().await;
        if guard
            .remove(&(customer_id.to_owned(), code.to_owned()))
            .is_none()
        {
            return Err(Error::not_found(format!(
                "Address of kind {code} for customer id {customer_id} not found."
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::AddressRecordField;
    use serde_json::json;

    fn customer_delta(name: &str) -> Delta<CustomerRecord> {
        let mut delta = Delta::new();
        delta.set_value(CustomerRecordField::Name, name);
        delta
    }

    #[tokio::test]
    async fn create_assigns_id_and_stamps_audit() {
        let store = MemoryStore::new();

        let record = CustomerRepository::create(&store, customer_delta("Acme"), "tester")
            .await
            .unwrap();

        assert!(record.id.starts_with('C'));
        assert_eq!(record.name, "Acme");
        assert_eq!(record.audit.version, 1);
        assert_eq!(record.audit.created_by, "tester");
        assert_eq!(store.customer_count().await, 1);
    }

    #[tokio::test]
    async fn update_skips_write_when_nothing_changes() {
        let store = MemoryStore::new();
        let record = CustomerRepository::create(&store, customer_delta("Acme"), "tester")
            .await
            .unwrap();

        let same = customer_delta("Acme");
        let unchanged = CustomerRepository::update(&store, same, record.clone(), "tester")
            .await
            .unwrap();

        assert_eq!(unchanged.audit.version, record.audit.version);
        assert_eq!(unchanged.audit.updated_at, record.audit.updated_at);
    }

    #[tokio::test]
    async fn update_bumps_version_on_real_change() {
        let store = MemoryStore::new();
        let record = CustomerRepository::create(&store, customer_delta("Acme"), "tester")
            .await
            .unwrap();

        let renamed = customer_delta("Acme Corp");
        let updated = CustomerRepository::update(&store, renamed, record.clone(), "editor")
            .await
            .unwrap();

        assert_eq!(updated.name, "Acme Corp");
        assert_eq!(updated.audit.version, record.audit.version + 1);
        assert_eq!(updated.audit.updated_by, "editor");
    }

    #[tokio::test]
    async fn address_slot_is_unique_per_customer_and_kind() {
        let store = MemoryStore::new();
        let customer = CustomerRepository::create(&store, customer_delta("Acme"), "tester")
            .await
            .unwrap();

        let mut delta = Delta::<AddressRecord>::from_json(&json!({
            "street": "Main St 1",
            "kind_code": "I",
        }))
        .unwrap();
        delta.set_value(AddressRecordField::CustomerId, customer.id.as_str());

        AddressRepository::create(&store, delta.clone(), "tester")
            .await
            .unwrap();
        let err = AddressRepository::create(&store, delta, "tester")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn deleting_customer_cascades_to_addresses() {
        let store = MemoryStore::new();
        let customer = CustomerRepository::create(&store, customer_delta("Acme"), "tester")
            .await
            .unwrap();

        let mut delta = Delta::<AddressRecord>::new();
        delta.set_value(AddressRecordField::KindCode, "D");
        delta.set_value(AddressRecordField::CustomerId, customer.id.as_str());
        AddressRepository::create(&store, delta, "tester")
            .await
            .unwrap();

        CustomerRepository::delete(&store, &customer.id).await.unwrap();
        assert_eq!(store.customer_count().await, 0);
        assert_eq!(store.address_count().await, 0);
    }
}
