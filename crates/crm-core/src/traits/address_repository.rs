// # Address Repository Trait
//
// Defines the persistence interface for address records.
//
// ## Uniqueness
//
// A customer owns zero or one address per kind. The store enforces this as
// a uniqueness constraint on (customer_id, kind_code) — it is not an
// in-memory convention the services have to remember.

use async_trait::async_trait;

use crate::delta::Delta;
use crate::entity::AddressRecord;
use crate::query::AddressQuery;

/// Trait for address persistence implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// `code` parameters are storage kind codes ("I", "D", "S"); translation
/// from [`crate::domain::AddressKind`] happens in the mapping layer.
#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Fetch one page of addresses plus the count of all matches
    ///
    /// The customer filter applies before counting; sorting and paging
    /// follow.
    async fn query(&self, query: &AddressQuery)
    -> Result<(Vec<AddressRecord>, usize), crate::Error>;

    /// All addresses of one customer
    async fn list_by_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<AddressRecord>, crate::Error>;

    /// Look up one address by owner and kind code
    async fn find_by_customer_and_code(
        &self,
        customer_id: &str,
        code: &str,
    ) -> Result<Option<AddressRecord>, crate::Error>;

    /// Whether an address of this kind exists on the customer
    async fn exists_by_customer_and_code(
        &self,
        customer_id: &str,
        code: &str,
    ) -> Result<bool, crate::Error>;

    /// Create an address from a storage delta
    ///
    /// Fails with `Conflict` when the (customer, kind) slot is taken and
    /// with `NotFound` when the owning customer does not exist.
    async fn create(
        &self,
        delta: Delta<AddressRecord>,
        actor: &str,
    ) -> Result<AddressRecord, crate::Error>;

    /// Apply a storage delta to an existing address
    ///
    /// The customer back-reference is excluded from the delta before
    /// applying; a no-change delta (per classification) returns the record
    /// untouched.
    async fn update(
        &self,
        delta: Delta<AddressRecord>,
        record: AddressRecord,
        actor: &str,
    ) -> Result<AddressRecord, crate::Error>;

    /// Delete one address by owner and kind code
    async fn delete(&self, customer_id: &str, code: &str) -> Result<(), crate::Error>;
}
