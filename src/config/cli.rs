use crate::config::Settings;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "bioverse")]
#[command(about = "Biodiversity-adjusted carbon credit pricing from GBIF and IUCN data")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<String>,

    #[arg(long, global = true, env = "IUCN_API_TOKEN", hide_env_values = true)]
    pub iucn_token: Option<String>,

    #[arg(long, global = true)]
    pub gbif_base_url: Option<String>,

    #[arg(long, global = true)]
    pub iucn_base_url: Option<String>,

    #[arg(long, global = true)]
    pub concurrent_requests: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, help = "Address to listen on, e.g. 0.0.0.0:3000")]
        bind: Option<String>,
    },
    /// Analyze one country and print the report as JSON
    Analyze {
        #[arg(long, help = "Two-letter country code (defaults to the configured one)")]
        country: Option<String>,

        #[arg(long, help = "Print the built-in demo report instead of querying GBIF")]
        mock: bool,

        #[arg(long)]
        pretty: bool,
    },
}

impl CliConfig {
    /// Config file values overlaid with any flags given on the command line.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;

        if let Some(token) = &self.iucn_token {
            settings.iucn_api_token = Some(token.clone());
        }
        if let Some(url) = &self.gbif_base_url {
            settings.gbif_base_url = url.clone();
        }
        if let Some(url) = &self.iucn_base_url {
            settings.iucn_base_url = url.clone();
        }
        if let Some(n) = self.concurrent_requests {
            settings.concurrent_requests = n;
        }
        if let Command::Serve { bind: Some(bind) } = &self.command {
            settings.bind_address = bind.clone();
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_analyze_flags() {
        let cli = CliConfig::try_parse_from([
            "bioverse",
            "--concurrent-requests",
            "3",
            "analyze",
            "--country",
            "ke",
            "--pretty",
        ])
        .unwrap();

        match &cli.command {
            Command::Analyze { country, mock, pretty } => {
                assert_eq!(country.as_deref(), Some("ke"));
                assert!(!mock);
                assert!(pretty);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.settings().unwrap().concurrent_requests(), 3);
    }

    #[test]
    fn test_serve_bind_overrides_settings() {
        let cli = CliConfig::try_parse_from([
            "bioverse",
            "serve",
            "--bind",
            "127.0.0.1:9000",
            "--gbif-base-url",
            "http://localhost:1234",
        ])
        .unwrap();

        let settings = cli.settings().unwrap();
        assert_eq!(settings.bind_address(), "127.0.0.1:9000");
        assert_eq!(settings.gbif_base_url(), "http://localhost:1234");
    }
}
