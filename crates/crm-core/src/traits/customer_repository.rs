// # Customer Repository Trait
//
// Defines the persistence interface for customer records.
//
// ## Responsibilities
//
// Repositories own the mechanics of a write, not its policy:
// - `create` materializes a record from a storage delta and stamps audit
//   fields
// - `update` re-classifies the delta against the current record and skips
//   the write (no audit stamp, no version bump) when nothing changes
// - server-managed fields (the id) are excluded before materialization
//
// Business rules (validation, discriminator translation, conflict policy
// between customers and addresses) belong to the services.

use async_trait::async_trait;

use crate::delta::Delta;
use crate::entity::CustomerRecord;
use crate::query::CustomerQuery;

/// Trait for customer persistence implementations
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Fetch one page of customers plus the total count
    ///
    /// The count reflects the whole (unfiltered) customer set, not the
    /// page; sorting and paging are applied in that order.
    async fn query(
        &self,
        query: &CustomerQuery,
    ) -> Result<(Vec<CustomerRecord>, usize), crate::Error>;

    /// Look up one customer by id
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: the customer
    /// - `Ok(None)`: no such customer
    /// - `Err(Error)`: storage error
    async fn find_by_id(&self, id: &str) -> Result<Option<CustomerRecord>, crate::Error>;

    /// Create a customer from a storage delta
    ///
    /// The store assigns the id and stamps creation audit fields with
    /// `actor`. Any tracked id in the delta is ignored.
    async fn create(
        &self,
        delta: Delta<CustomerRecord>,
        actor: &str,
    ) -> Result<CustomerRecord, crate::Error>;

    /// Apply a storage delta to an existing customer
    ///
    /// When the delta changes nothing (per classification), the record is
    /// returned untouched: no write, no version bump.
    async fn update(
        &self,
        delta: Delta<CustomerRecord>,
        record: CustomerRecord,
        actor: &str,
    ) -> Result<CustomerRecord, crate::Error>;

    /// Delete a customer and, cascading, its addresses
    async fn delete(&self, id: &str) -> Result<(), crate::Error>;
}
