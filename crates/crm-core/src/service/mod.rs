//! Business services
//!
//! Orchestration over the repositories. Every write follows the same
//! sequence: classify the delta against the existing record (skip the
//! write when nothing changes), map to the storage shape, validate the
//! fully materialized preview, and only then persist.
//!
//! ## Events
//!
//! Services can emit [`ChangeEvent`]s over a bounded channel for external
//! monitoring. Emission is best-effort: when the channel is full the event
//! is dropped with a warning, never blocking the request.

pub mod address;
pub mod customer;

pub use address::AddressService;
pub use customer::CustomerService;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use crate::delta::ChangeState;
use crate::domain::AddressKind;

/// Events emitted by the services
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// A customer was created
    CustomerCreated { id: String },
    /// A customer was updated; `state` is the delta's classification
    CustomerUpdated { id: String, state: ChangeState },
    /// A customer update changed nothing and was skipped
    CustomerUpdateSkipped { id: String },
    /// A customer (and its addresses) was deleted
    CustomerDeleted { id: String },

    /// An address was created
    AddressCreated { customer_id: String, kind: AddressKind },
    /// An address was updated; `state` is the delta's classification
    AddressUpdated {
        customer_id: String,
        kind: AddressKind,
        state: ChangeState,
    },
    /// An address update changed nothing and was skipped
    AddressUpdateSkipped { customer_id: String, kind: AddressKind },
    /// An address was deleted
    AddressDeleted { customer_id: String, kind: AddressKind },
}

/// Create a bounded change-event channel
///
/// The sender plugs into the services via `with_events`; the stream side
/// is handed to whatever wants to observe writes.
pub fn event_channel(capacity: usize) -> (mpsc::Sender<ChangeEvent>, ReceiverStream<ChangeEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (tx, ReceiverStream::new(rx))
}

/// Best-effort event emission
pub(crate) fn emit(tx: &Option<mpsc::Sender<ChangeEvent>>, event: ChangeEvent) {
    if let Some(tx) = tx
        && let Err(err) = tx.try_send(event)
    {
        warn!("change event dropped: {err}");
    }
}
