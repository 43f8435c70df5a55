//! Repository traits
//!
//! Abstract persistence seams consumed by the services. The in-memory
//! implementation lives in [`crate::store`]; a real deployment would back
//! these with a relational store.
//!
//! - [`CustomerRepository`]: customer records
//! - [`AddressRepository`]: address records, unique per (customer, kind)

pub mod address_repository;
pub mod customer_repository;

pub use address_repository::AddressRepository;
pub use customer_repository::CustomerRepository;
