// # crmd - CRM Daemon
//
// The crmd daemon is a THIN integration layer: it reads configuration,
// wires the in-memory store to the services, and logs change events.
// All customer/address logic lives in crm-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Paging
// - `CRM_DEFAULT_PAGE_SIZE`: Page size used when a query asks for 0
// - `CRM_MAX_PAGE_SIZE`: Hard upper bound on items per page
//
// ### Identity
// - `CRM_SYSTEM_USER_ID`: Actor recorded for writes the daemon makes itself
//
// ### Events
// - `CRM_EVENT_CHANNEL_CAPACITY`: Capacity of the change-event channel
//
// ### Seed data
// - `CRM_SEED`: Set to `true` to create a demo customer at startup
//
// ### Logging
// - `CRM_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export CRM_DEFAULT_PAGE_SIZE=50
// export CRM_MAX_PAGE_SIZE=200
// export CRM_SEED=true
//
// crmd
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use std::sync::Arc;

use crm_core::{
    AddressService, ChangeEvent, CrmConfig, CustomerService, Delta, MemoryStore, event_channel,
};
use serde_json::json;
use tokio_stream::StreamExt;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum CrmExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<CrmExitCode> for ExitCode {
    fn from(code: CrmExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    crm: CrmConfig,
    seed: bool,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let mut crm = CrmConfig::new();

        if let Some(size) = env::var("CRM_DEFAULT_PAGE_SIZE")
            .ok()
            .map(|s| s.parse())
            .transpose()?
        {
            crm.paging.default_page_size = size;
        }
        if let Some(size) = env::var("CRM_MAX_PAGE_SIZE")
            .ok()
            .map(|s| s.parse())
            .transpose()?
        {
            crm.paging.max_page_size = size;
        }
        if let Ok(actor) = env::var("CRM_SYSTEM_USER_ID") {
            crm.system_user_id = actor;
        }
        if let Some(capacity) = env::var("CRM_EVENT_CHANNEL_CAPACITY")
            .ok()
            .map(|s| s.parse())
            .transpose()?
        {
            crm.event_channel_capacity = capacity;
        }

        Ok(Self {
            crm,
            seed: env::var("CRM_SEED").is_ok_and(|s| s == "true" || s == "1"),
            log_level: env::var("CRM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.crm.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "CRM_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CrmExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CrmExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CrmExitCode::ConfigError.into();
    }

    info!("Starting crmd daemon");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CrmExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            CrmExitCode::RuntimeError
        } else {
            CrmExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let store = MemoryStore::new();
    let (events, mut event_stream) = event_channel(config.crm.event_channel_capacity);

    let customers = CustomerService::new(Arc::new(store.clone()), Arc::new(store.clone()))
        .with_events(events.clone());
    let addresses = AddressService::new(Arc::new(store.clone())).with_events(events);

    // Log every change event as it happens
    let event_logger = tokio::spawn(async move {
        while let Some(event) = event_stream.next().await {
            log_event(&event);
        }
    });

    if config.seed {
        seed_demo_data(&customers, &addresses, &config.crm.system_user_id).await?;
    }

    let customer_count = store.customer_count().await;
    let address_count = store.address_count().await;
    info!(
        customers = customer_count,
        addresses = address_count,
        "Daemon initialized successfully"
    );

    // Wait for shutdown signal
    let signal_name = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal_name);
    info!("Shutting down daemon");

    drop(customers);
    drop(addresses);
    event_logger.await?;

    Ok(())
}

/// Create one demo customer with an invoice address
async fn seed_demo_data(
    customers: &CustomerService,
    addresses: &AddressService,
    actor: &str,
) -> Result<()> {
    let customer = customers
        .create(
            Delta::from_json(&json!({
                "name": "Demo Industries",
                "street": "Main Street 1",
                "zip": "12345",
                "city": "Springfield",
                "country": "US",
            }))?,
            actor,
        )
        .await?;

    addresses
        .create(
            &customer.id,
            Delta::from_json(&json!({
                "kind": "Invoice",
                "street": "Billing Road 2",
                "zip": "12345",
                "city": "Springfield",
                "country": "US",
            }))?,
            actor,
        )
        .await?;

    info!(customer = %customer.id, "seeded demo data");
    Ok(())
}

fn log_event(event: &ChangeEvent) {
    match event {
        ChangeEvent::CustomerCreated { id } => info!(customer = %id, "event: customer created"),
        ChangeEvent::CustomerUpdated { id, state } => {
            info!(customer = %id, state = ?state, "event: customer updated")
        }
        ChangeEvent::CustomerUpdateSkipped { id } => {
            info!(customer = %id, "event: customer update skipped")
        }
        ChangeEvent::CustomerDeleted { id } => info!(customer = %id, "event: customer deleted"),
        ChangeEvent::AddressCreated { customer_id, kind } => {
            info!(customer = %customer_id, %kind, "event: address created")
        }
        ChangeEvent::AddressUpdated {
            customer_id,
            kind,
            state,
        } => info!(customer = %customer_id, %kind, state = ?state, "event: address updated"),
        ChangeEvent::AddressUpdateSkipped { customer_id, kind } => {
            info!(customer = %customer_id, %kind, "event: address update skipped")
        }
        ChangeEvent::AddressDeleted { customer_id, kind } => {
            info!(customer = %customer_id, %kind, "event: address deleted")
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(name)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
