//! API-facing domain records
//!
//! These are the shapes exposed to collaborators (services, controllers).
//! Their storage-facing counterparts live in [`crate::entity`], joined by
//! the mappers in [`crate::mapping`].

pub mod address;
pub mod customer;

pub use address::{Address, AddressField, AddressKind};
pub use customer::{Customer, CustomerField};
