//! Storage-facing records
//!
//! Parallel representations of the domain records in [`crate::domain`],
//! shaped for the backing store: the address kind becomes a single-letter
//! code, addresses carry their owner's id, and every record carries an
//! [`Audit`] block with an optimistic-concurrency version counter.

pub mod address;
pub mod customer;

pub use address::{AddressRecord, AddressRecordField};
pub use customer::{CustomerRecord, CustomerRecordField};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Standard audit fields carried by every storage record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    /// Incremented on every persisted write, including creation
    pub version: i32,
}

impl Audit {
    /// Fill creation fields; also stamps the first update (version becomes 1)
    pub fn stamp_created(&mut self, actor: &str) {
        self.created_by = actor.to_owned();
        self.created_at = Utc::now();
        self.stamp_updated(actor);
    }

    /// Fill update fields and bump the version
    pub fn stamp_updated(&mut self, actor: &str) {
        self.updated_by = actor.to_owned();
        self.updated_at = Utc::now();
        self.version += 1;
    }
}

impl Default for Audit {
    fn default() -> Self {
        Self {
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            created_by: String::new(),
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_by: String::new(),
            version: 0,
        }
    }
}
