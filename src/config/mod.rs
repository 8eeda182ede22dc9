#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::{BioverseError, Result};
use crate::utils::validation::{self, Validate};
use serde::Serialize;

/// Resolved runtime settings. Built from defaults, then an optional TOML
/// file, then command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub gbif_base_url: String,
    pub iucn_base_url: String,
    #[serde(skip_serializing)]
    pub iucn_api_token: Option<String>,
    pub default_country: String,
    pub occurrence_limit: usize,
    pub facet_limit: usize,
    pub enrich_limit: usize,
    pub concurrent_requests: usize,
    pub request_timeout_seconds: u64,
    pub cache_ttl_seconds: u64,
    pub cache_capacity: u64,
    pub bind_address: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gbif_base_url: "https://api.gbif.org/v1".to_string(),
            iucn_base_url: "https://apiv3.iucnredlist.org/api/v3".to_string(),
            iucn_api_token: None,
            default_country: "BR".to_string(),
            occurrence_limit: 5,
            facet_limit: 20,
            enrich_limit: 10,
            concurrent_requests: 5,
            request_timeout_seconds: 30,
            cache_ttl_seconds: 3600,
            cache_capacity: 1000,
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, overlaid with the TOML file at `path` when given.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut settings = Self::default();
        if let Some(path) = path {
            tracing::debug!("Loading config file {}", path);
            toml_config::TomlConfig::from_file(path)?.apply_to(&mut settings);
        }
        Ok(settings)
    }
}

impl ConfigProvider for Settings {
    fn gbif_base_url(&self) -> &str {
        &self.gbif_base_url
    }

    fn iucn_base_url(&self) -> &str {
        &self.iucn_base_url
    }

    fn iucn_api_token(&self) -> Option<&str> {
        self.iucn_api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    fn default_country(&self) -> &str {
        &self.default_country
    }

    fn occurrence_limit(&self) -> usize {
        self.occurrence_limit
    }

    fn facet_limit(&self) -> usize {
        self.facet_limit
    }

    fn enrich_limit(&self) -> usize {
        self.enrich_limit
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.request_timeout_seconds
    }

    fn cache_ttl_seconds(&self) -> u64 {
        self.cache_ttl_seconds
    }

    fn cache_capacity(&self) -> u64 {
        self.cache_capacity
    }

    fn bind_address(&self) -> &str {
        &self.bind_address
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("gbif_base_url", &self.gbif_base_url)?;
        validation::validate_url("iucn_base_url", &self.iucn_base_url)?;
        validation::validate_socket_addr("bind_address", &self.bind_address)?;
        validation::validate_positive_number("occurrence_limit", self.occurrence_limit, 1)?;
        validation::validate_positive_number("facet_limit", self.facet_limit, 1)?;
        validation::validate_positive_number("enrich_limit", self.enrich_limit, 1)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;
        validation::validate_positive_number(
            "request_timeout_seconds",
            self.request_timeout_seconds as usize,
            1,
        )?;

        if self.enrich_limit > self.facet_limit {
            return Err(BioverseError::InvalidConfigValueError {
                field: "enrich_limit".to_string(),
                value: self.enrich_limit.to_string(),
                reason: format!("Cannot exceed facet_limit ({})", self.facet_limit),
            });
        }

        validation::normalize_country_code(&self.default_country).map_err(|_| {
            BioverseError::InvalidConfigValueError {
                field: "default_country".to_string(),
                value: self.default_country.clone(),
                reason: "Must be a two-letter country code".to_string(),
            }
        })?;

        Ok(())
    }
}
