//! Runtime configuration for card services and storage.
//!
//! Configuration can be deserialised from JSON (camelCase keys) or read from
//! `CLARIFIER_*` environment variables. Unset values take their defaults.

use crate::card::{
    adapters::postgres::CardPgPool,
    domain::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the default list page size.
pub const ENV_DEFAULT_PAGE_SIZE: &str = "CLARIFIER_DEFAULT_PAGE_SIZE";
/// Environment variable holding the largest accepted list page size.
pub const ENV_MAX_PAGE_SIZE: &str = "CLARIFIER_MAX_PAGE_SIZE";
/// Environment variable holding the `PostgreSQL` connection URL.
pub const ENV_DATABASE_URL: &str = "CLARIFIER_DATABASE_URL";
/// Environment variable holding the connection pool size.
pub const ENV_DB_MAX_CONNECTIONS: &str = "CLARIFIER_DB_MAX_CONNECTIONS";

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while loading configuration or building resources from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber {
        /// Setting name.
        key: &'static str,
        /// Rejected raw value.
        value: String,
    },

    /// Listing limits are inconsistent.
    #[error("page sizes must satisfy 1 <= default ({default}) <= max ({max})")]
    InvalidListing {
        /// Configured default page size.
        default: u64,
        /// Configured maximum page size.
        max: u64,
    },

    /// The connection pool could not be built.
    #[error("failed to build database pool: {0}")]
    Pool(#[from] PoolError),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClarifierConfig {
    /// List pagination limits.
    pub listing: ListingConfig,
    /// Database settings; `None` means no `PostgreSQL` backend.
    pub database: Option<DatabaseConfig>,
}

impl ClarifierConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is malformed or the listing
    /// limits are inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is malformed or the listing
    /// limits are inconsistent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = ListingConfig::default();
        let listing = ListingConfig {
            default_page_size: parse_number(&lookup, ENV_DEFAULT_PAGE_SIZE)?
                .unwrap_or(defaults.default_page_size),
            max_page_size: parse_number(&lookup, ENV_MAX_PAGE_SIZE)?
                .unwrap_or(defaults.max_page_size),
        }
        .validated()?;

        let database = match lookup(ENV_DATABASE_URL).filter(|url| !url.trim().is_empty()) {
            Some(database_url) => Some(DatabaseConfig {
                database_url,
                max_connections: parse_number(&lookup, ENV_DB_MAX_CONNECTIONS)?
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            }),
            None => None,
        };

        Ok(Self { listing, database })
    }
}

/// Pagination limits for card listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListingConfig {
    /// Page size applied when a request omits one.
    pub default_page_size: u64,
    /// Largest page size a request may ask for.
    pub max_page_size: u64,
}

impl ListingConfig {
    /// Checks that `1 <= default_page_size <= max_page_size`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidListing`] otherwise.
    pub const fn validated(self) -> Result<Self, ConfigError> {
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::InvalidListing {
                default: self.default_page_size,
                max: self.max_page_size,
            });
        }
        Ok(self)
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Connection URL.
    pub database_url: String,
    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Builds an r2d2 connection pool for the card repository.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot establish its
    /// initial connections.
    pub fn build_pool(&self) -> Result<CardPgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(self.database_url.as_str());
        Ok(Pool::builder()
            .max_size(self.max_connections)
            .build(manager)?)
    }
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
        })
        .transpose()
}
