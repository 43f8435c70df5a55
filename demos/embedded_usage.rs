//! Minimal embedding example for crm-core
//!
//! This example demonstrates using crm-core as a library in a custom
//! application: deltas built from JSON bodies, classification-gated
//! updates, per-kind addresses, and the change-event stream.

use std::sync::Arc;

use crm_core::{
    AddressKind, AddressService, CustomerQuery, CustomerService, Delta, MemoryStore, Result,
    event_channel,
};
use serde_json::json;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("=== Embedded crm-core Example ===\n");

    // Wire the in-memory store to both services, sharing one event channel
    let store = MemoryStore::new();
    let (events, mut event_stream) = event_channel(100);
    let customers = CustomerService::new(Arc::new(store.clone()), Arc::new(store.clone()))
        .with_events(events.clone());
    let addresses = AddressService::new(Arc::new(store.clone())).with_events(events);

    let event_listener = tokio::spawn(async move {
        while let Some(event) = event_stream.next().await {
            println!("[Event] {:?}", event);
        }
    });

    // Create a customer from a JSON body
    println!("1. Creating customer...");
    let customer = customers
        .create(
            Delta::from_json(&json!({
                "name": "Acme Corporation",
                "street": "Main Street 42",
                "zip": "12345",
                "city": "Springfield",
                "country": "US",
            }))?,
            "demo",
        )
        .await?;
    println!("   Created {} ({})", customer.name, customer.id);

    // An update that changes nothing is classified and skipped
    println!("\n2. Re-sending the same data (skipped, no version bump)...");
    customers
        .update(
            &customer.id,
            Delta::from_json(&json!({ "name": "Acme Corporation" }))?,
            "demo",
        )
        .await?;

    // A real change goes through
    println!("\n3. Renaming the customer...");
    let renamed = customers
        .update(
            &customer.id,
            Delta::from_json(&json!({ "name": "Acme Holdings" }))?,
            "demo",
        )
        .await?;
    println!("   Now called {}", renamed.name);

    // One address per kind; the kind discriminator rides in the delta
    println!("\n4. Adding invoice and delivery addresses...");
    addresses
        .create(
            &customer.id,
            Delta::from_json(&json!({
                "kind": "Invoice",
                "street": "Billing Road 1",
                "zip": "12345",
                "city": "Springfield",
                "country": "US",
            }))?,
            "demo",
        )
        .await?;
    addresses
        .create(
            &customer.id,
            Delta::from_json(&json!({
                "kind": "Delivery",
                "street": "Dock 7",
                "zip": "12345",
                "city": "Springfield",
                "country": "US",
            }))?,
            "demo",
        )
        .await?;

    // Reading the customer joins its addresses into the kind slots
    let full = customers.get(&customer.id).await?;
    println!(
        "   Customer has invoice address: {}",
        full.invoice_address.is_some()
    );
    println!(
        "   Customer has delivery address: {}",
        full.delivery_address.is_some()
    );

    // Listing is paged
    println!("\n5. Listing customers...");
    let page = customers.list(&CustomerQuery::default()).await?;
    println!(
        "   Page {}/{} with {} item(s)",
        page.page_index + 1,
        page.total_pages,
        page.items.len()
    );

    // Cleanup cascades
    println!("\n6. Deleting the delivery address and then the customer...");
    addresses
        .delete(&customer.id, AddressKind::Delivery)
        .await?;
    customers.delete(&customer.id).await?;

    // Dropping the services closes the event channel
    drop(customers);
    drop(addresses);
    let _ = event_listener.await;

    println!("\n=== Embedding Successful ===");
    Ok(())
}
