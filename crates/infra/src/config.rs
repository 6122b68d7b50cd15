//! Configuration loading and representation.
//!
//! Settings come from `MEDSTOCK_*` environment variables (a `.env` file is
//! loaded by the binary beforehand). Inside the function runtime, the
//! endpoint and project id fall back to the variables the runtime injects.
//!
//! Loading never fails on missing values: each function asks for the part it
//! needs and gets a [`ConfigError::Missing`] naming every absent variable,
//! before any remote call is made.

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use secrecy::Secret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "MEDSTOCK_";

/// Page size used by the document store's list endpoints.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Upper bound on page requests per paginated fetch.
pub const DEFAULT_MAX_PAGES: usize = 1_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("missing required configuration: {}", .0.join(", "))]
    Missing(Vec<String>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Load(Box::new(value))
    }
}

/// Raw process settings, every remote-facing value optional.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub endpoint: Option<String>,
    pub project_id: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<Secret<String>>,
    pub database_id: Option<String>,
    pub inventories_collection_id: Option<String>,
    pub inventory_details_collection_id: Option<String>,
    pub selling_prices_collection_id: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            project_id: None,
            api_key: None,
            database_id: None,
            inventories_collection_id: None,
            inventory_details_collection_id: None,
            selling_prices_collection_id: None,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            bind_addr: default_bind_addr(),
        }
    }
}

/// Connection details for the document store.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: Secret<String>,
}

/// Where the aggregator reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryCollections {
    pub database_id: String,
    pub inventories: String,
    pub inventory_details: String,
    pub selling_prices: String,
}

/// Pagination bounds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageLimits {
    pub page_size: usize,
    pub max_pages: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Variables set by the function runtime itself.
fn runtime_env() -> Env {
    Env::raw().filter_map(|key| {
        if key == "APPWRITE_FUNCTION_API_ENDPOINT" {
            Some("endpoint".into())
        } else if key == "APPWRITE_FUNCTION_PROJECT_ID" {
            Some("project_id".into())
        } else {
            None
        }
    })
}

fn env_name(key: &str) -> String {
    format!("{ENV_PREFIX}{}", key.to_uppercase())
}

fn require<'a, T>(value: &'a Option<T>, key: &str, missing: &mut Vec<String>) -> Option<&'a T> {
    let v = value.as_ref();
    if v.is_none() {
        missing.push(env_name(key));
    }
    v
}

impl Settings {
    /// Load from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Settings::default()))
                .merge(runtime_env())
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let mut settings: Settings = figment.extract()?;
        settings.normalize();
        settings.pagination()?;
        Ok(settings)
    }

    /// Blank strings count as unset.
    fn normalize(&mut self) {
        for field in [
            &mut self.endpoint,
            &mut self.project_id,
            &mut self.database_id,
            &mut self.inventories_collection_id,
            &mut self.inventory_details_collection_id,
            &mut self.selling_prices_collection_id,
        ] {
            if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *field = None;
            }
        }
        if let Some(endpoint) = &mut self.endpoint {
            *endpoint = endpoint.trim().trim_end_matches('/').to_string();
        }
    }

    pub fn store(&self) -> Result<StoreSettings, ConfigError> {
        let mut missing = Vec::new();
        let endpoint = require(&self.endpoint, "endpoint", &mut missing);
        let project_id = require(&self.project_id, "project_id", &mut missing);
        let api_key = require(&self.api_key, "api_key", &mut missing);

        match (endpoint, project_id, api_key) {
            (Some(endpoint), Some(project_id), Some(api_key)) => Ok(StoreSettings {
                endpoint: endpoint.clone(),
                project_id: project_id.clone(),
                api_key: api_key.clone(),
            }),
            _ => Err(ConfigError::Missing(missing)),
        }
    }

    pub fn inventory_collections(&self) -> Result<InventoryCollections, ConfigError> {
        let mut missing = Vec::new();
        let database_id = require(&self.database_id, "database_id", &mut missing);
        let inventories = require(&self.inventories_collection_id, "inventories_collection_id", &mut missing);
        let details = require(
            &self.inventory_details_collection_id,
            "inventory_details_collection_id",
            &mut missing,
        );
        let prices = require(
            &self.selling_prices_collection_id,
            "selling_prices_collection_id",
            &mut missing,
        );

        match (database_id, inventories, details, prices) {
            (Some(db), Some(inv), Some(det), Some(pr)) => Ok(InventoryCollections {
                database_id: db.clone(),
                inventories: inv.clone(),
                inventory_details: det.clone(),
                selling_prices: pr.clone(),
            }),
            _ => Err(ConfigError::Missing(missing)),
        }
    }

    pub fn pagination(&self) -> Result<PageLimits, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::Invalid("max_pages must be at least 1".to_string()));
        }
        Ok(PageLimits {
            page_size: self.page_size,
            max_pages: self.max_pages,
        })
    }
}
