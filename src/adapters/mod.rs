// Adapters layer: concrete HTTP clients for the external data sources.

pub mod gbif;
pub mod iucn;

use crate::core::analysis::BiodiversityAnalyzer;
use crate::core::ConfigProvider;
use crate::utils::error::Result;

pub use gbif::GbifClient;
pub use iucn::IucnClient;

pub type LiveAnalyzer = BiodiversityAnalyzer<GbifClient, IucnClient>;

/// Analyzer wired to the real GBIF and IUCN APIs.
///
/// Without an IUCN token the analyzer still runs; every species gets `DD`.
pub fn live_analyzer<C: ConfigProvider>(config: &C) -> Result<LiveAnalyzer> {
    let gbif = GbifClient::from_config(config)?;
    let iucn = IucnClient::from_config(config)?;
    if iucn.is_none() {
        tracing::error!(
            "IUCN API token not configured; conservation status will default to DD"
        );
    }

    Ok(BiodiversityAnalyzer::new(
        gbif,
        iucn,
        config.enrich_limit(),
        config.concurrent_requests(),
    ))
}
