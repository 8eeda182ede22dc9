use crate::domain::model::{ConservationStatus, OccurrenceSummary, SpeciesDetail};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Species occurrence data, e.g. GBIF.
#[async_trait]
pub trait OccurrenceSource: Send + Sync {
    /// Occurrence facet for a country, top `facet_limit` taxa by count.
    async fn search_occurrences(&self, country: &str) -> Result<OccurrenceSummary>;

    async fn species_detail(&self, taxon_key: &str) -> Result<SpeciesDetail>;
}

/// Conservation status lookups, e.g. the IUCN Red List.
#[async_trait]
pub trait ConservationSource: Send + Sync {
    /// `Ok(None)` means the source has no assessment for this name.
    async fn conservation_status(&self, scientific_name: &str)
        -> Result<Option<ConservationStatus>>;
}

pub trait ConfigProvider: Send + Sync {
    fn gbif_base_url(&self) -> &str;
    fn iucn_base_url(&self) -> &str;
    fn iucn_api_token(&self) -> Option<&str>;
    fn default_country(&self) -> &str;
    fn occurrence_limit(&self) -> usize;
    fn facet_limit(&self) -> usize;
    fn enrich_limit(&self) -> usize;
    fn concurrent_requests(&self) -> usize;
    fn request_timeout_seconds(&self) -> u64;
    fn cache_ttl_seconds(&self) -> u64;
    fn cache_capacity(&self) -> u64;
    fn bind_address(&self) -> &str;
}
