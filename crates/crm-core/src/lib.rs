// # crm-core
//
// Core library for the customer/address CRM service.
//
// ## Architecture Overview
//
// This library provides the building blocks for delta-driven CRUD on
// customers and their typed addresses:
// - **Delta**: sparse partial-update container over a record shape
// - **ChangeState**: addition/deletion/update classification of a delta
//   against an existing record
// - **ValidationPipeline**: ordered field checks collecting all failures
// - **Mappers**: domain ↔ storage translation, including the address-kind
//   discriminator codes
// - **Services**: orchestration (classify → map → validate → persist)
// - **MemoryStore**: in-memory repository implementation
//
// ## Design Principles
//
// 1. **Compile-time fields**: delta fields are enum descriptors, so a typo
//    in a field name cannot reach runtime
// 2. **Classify before writing**: a delta that changes nothing never touches
//    the store (and never bumps the record version)
// 3. **Loud discriminators**: an unknown address-kind code is an error,
//    never a silent default
// 4. **Library-First**: everything here is embeddable; HTTP, persistence
//    engines and auth live in the host application

pub mod config;
pub mod delta;
pub mod domain;
pub mod entity;
pub mod error;
pub mod mapping;
pub mod query;
pub mod service;
pub mod store;
pub mod traits;
pub mod validation;

// Re-export core types for convenience
pub use config::{CrmConfig, PagingConfig};
pub use delta::{ChangeState, Delta, DeltaModel, RecordField};
pub use domain::{Address, AddressKind, Customer};
pub use entity::{AddressRecord, Audit, CustomerRecord};
pub use error::{Error, Result};
pub use mapping::{AddressMapper, CustomerMapper};
pub use query::{AddressQuery, CustomerQuery, Page, ResourceQuery, SortOrder};
pub use service::{AddressService, ChangeEvent, CustomerService, event_channel};
pub use store::MemoryStore;
pub use traits::{AddressRepository, CustomerRepository};
pub use validation::ValidationPipeline;
