use crate::config::Settings;
use crate::utils::error::{BioverseError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// On-disk configuration. Every section and field is optional; missing values
/// keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub sources: Option<SourcesSection>,
    pub analysis: Option<AnalysisSection>,
    pub cache: Option<CacheSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind_address: Option<String>,
    pub default_country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesSection {
    pub gbif_base_url: Option<String>,
    pub iucn_base_url: Option<String>,
    pub iucn_api_token: Option<String>,
    pub request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub occurrence_limit: Option<usize>,
    pub facet_limit: Option<usize>,
    pub enrich_limit: Option<usize>,
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSection {
    pub ttl_seconds: Option<u64>,
    pub capacity: Option<u64>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| BioverseError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Overlays every value present in the file onto `settings`.
    pub fn apply_to(self, settings: &mut Settings) {
        if let Some(server) = self.server {
            if let Some(v) = server.bind_address {
                settings.bind_address = v;
            }
            if let Some(v) = server.default_country {
                settings.default_country = v;
            }
        }

        if let Some(sources) = self.sources {
            if let Some(v) = sources.gbif_base_url {
                settings.gbif_base_url = v;
            }
            if let Some(v) = sources.iucn_base_url {
                settings.iucn_base_url = v;
            }
            // an unresolved ${VAR} means the variable was not set
            if let Some(v) = sources.iucn_api_token.filter(|t| !env_var_pattern().is_match(t)) {
                settings.iucn_api_token = Some(v);
            }
            if let Some(v) = sources.request_timeout_seconds {
                settings.request_timeout_seconds = v;
            }
        }

        if let Some(analysis) = self.analysis {
            if let Some(v) = analysis.occurrence_limit {
                settings.occurrence_limit = v;
            }
            if let Some(v) = analysis.facet_limit {
                settings.facet_limit = v;
            }
            if let Some(v) = analysis.enrich_limit {
                settings.enrich_limit = v;
            }
            if let Some(v) = analysis.concurrent_requests {
                settings.concurrent_requests = v;
            }
        }

        if let Some(cache) = self.cache {
            if let Some(v) = cache.ttl_seconds {
                settings.cache_ttl_seconds = v;
            }
            if let Some(v) = cache.capacity {
                settings.cache_capacity = v;
            }
        }
    }
}
