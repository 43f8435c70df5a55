//! Configuration types for embedding the CRM core
//!
//! This module defines the configuration structure a host application
//! (the daemon, a test harness, an HTTP layer) uses to wire the core.

use serde::{Deserialize, Serialize};

use crate::query::ResourceQuery;

/// Main CRM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmConfig {
    /// Paging limits
    #[serde(default)]
    pub paging: PagingConfig,

    /// Actor recorded in audit fields for writes the system itself makes
    #[serde(default = "default_system_user_id")]
    pub system_user_id: String,

    /// Capacity of the change-event channel
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl CrmConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            paging: PagingConfig::default(),
            system_user_id: default_system_user_id(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.system_user_id.trim().is_empty() {
            return Err(crate::Error::config("system_user_id cannot be empty"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config(
                "event_channel_capacity must be > 0",
            ));
        }
        self.paging.validate()?;
        Ok(())
    }
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Paging limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// Page size used when a query asks for 0 items per page
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Hard upper bound on items per page
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl PagingConfig {
    /// Validate the paging limits
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_page_size == 0 {
            return Err(crate::Error::config("max_page_size must be > 0"));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(crate::Error::config(
                "default_page_size must be between 1 and max_page_size",
            ));
        }
        Ok(())
    }

    /// Clamp a caller-supplied query to these limits
    ///
    /// A zero page size falls back to the default; oversized requests are
    /// capped at the maximum.
    pub fn constrain(&self, query: &mut ResourceQuery) {
        if query.page_size == 0 {
            query.page_size = self.default_page_size;
        }
        if query.page_size > self.max_page_size {
            query.page_size = self.max_page_size;
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    crate::query::DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> usize {
    200
}

fn default_system_user_id() -> String {
    "system".to_owned()
}

fn default_event_channel_capacity() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        CrmConfig::new().validate().unwrap();
    }

    #[test]
    fn default_page_size_must_fit_under_max() {
        let mut config = CrmConfig::new();
        config.paging.default_page_size = config.paging.max_page_size + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn constrain_clamps_queries() {
        let paging = PagingConfig {
            default_page_size: 25,
            max_page_size: 100,
        };

        let mut zero = ResourceQuery {
            page_size: 0,
            page_index: 0,
        };
        paging.constrain(&mut zero);
        assert_eq!(zero.page_size, 25);

        let mut oversized = ResourceQuery {
            page_size: 5000,
            page_index: 2,
        };
        paging.constrain(&mut oversized);
        assert_eq!(oversized.page_size, 100);
        assert_eq!(oversized.page_index, 2);
    }
}
