use crate::domain::model::{OccurrenceSummary, SpeciesDetail, TaxonCount};
use crate::domain::ports::{ConfigProvider, OccurrenceSource};
use crate::utils::error::{BioverseError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const SOURCE_NAME: &str = "GBIF";
const TAXON_KEY_FACET: &str = "TAXON_KEY";

/// Client for the GBIF occurrence and species APIs.
#[derive(Debug, Clone)]
pub struct GbifClient {
    base_url: String,
    occurrence_limit: usize,
    facet_limit: usize,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct OccurrenceSearchResponse {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    facets: Vec<Facet>,
}

#[derive(Debug, Deserialize)]
struct Facet {
    field: String,
    #[serde(default)]
    counts: Vec<FacetCount>,
}

#[derive(Debug, Deserialize)]
struct FacetCount {
    name: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeciesResponse {
    scientific_name: Option<String>,
    vernacular_name: Option<String>,
}

impl GbifClient {
    pub fn new(
        base_url: &str,
        occurrence_limit: usize,
        facet_limit: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            occurrence_limit,
            facet_limit,
            client,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.gbif_base_url(),
            config.occurrence_limit(),
            config.facet_limit(),
            Duration::from_secs(config.request_timeout_seconds()),
        )
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| BioverseError::ConfigError {
            message: format!("invalid GBIF base URL '{}': {}", self.base_url, e),
        })?;
        url.path_segments_mut()
            .map_err(|_| BioverseError::ConfigError {
                message: format!("GBIF base URL '{}' cannot have a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl OccurrenceSource for GbifClient {
    async fn search_occurrences(&self, country: &str) -> Result<OccurrenceSummary> {
        let url = self.endpoint(&["occurrence", "search"])?;
        tracing::debug!("GBIF occurrence search for {} at {}", country, url);

        let response = self
            .client
            .get(url)
            .query(&[
                ("country", country),
                ("hasCoordinate", "true"),
                ("facet", "taxonKey"),
            ])
            .query(&[
                ("limit", self.occurrence_limit),
                ("facetLimit", self.facet_limit),
            ])
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("GBIF occurrence search status: {}", status);
        if !status.is_success() {
            return Err(BioverseError::upstream(
                SOURCE_NAME,
                Some(status.as_u16()),
                format!("occurrence search for {} failed", country),
            ));
        }

        let body: OccurrenceSearchResponse = response.json().await?;
        let taxa = body
            .facets
            .into_iter()
            .find(|f| f.field == TAXON_KEY_FACET)
            .map(|f| {
                f.counts
                    .into_iter()
                    .map(|c| TaxonCount {
                        taxon_key: c.name,
                        count: c.count,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(OccurrenceSummary {
            total_count: body.count,
            taxa,
        })
    }

    async fn species_detail(&self, taxon_key: &str) -> Result<SpeciesDetail> {
        let url = self.endpoint(&["species", taxon_key])?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BioverseError::upstream(
                SOURCE_NAME,
                Some(status.as_u16()),
                format!("species lookup for taxon {} failed", taxon_key),
            ));
        }

        let body: SpeciesResponse = response.json().await?;
        Ok(SpeciesDetail {
            scientific_name: body.scientific_name.filter(|n| !n.trim().is_empty()),
            vernacular_name: body.vernacular_name.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> GbifClient {
        GbifClient::new(&server.base_url(), 5, 20, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_search_reads_taxon_key_facet() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/occurrence/search")
                .query_param("country", "BR")
                .query_param("hasCoordinate", "true")
                .query_param("facet", "taxonKey")
                .query_param("limit", "5")
                .query_param("facetLimit", "20");
            then.status(200).json_body(serde_json::json!({
                "count": 1234,
                "results": [],
                "facets": [
                    {"field": "BASIS_OF_RECORD", "counts": [{"name": "HUMAN_OBSERVATION", "count": 9}]},
                    {"field": "TAXON_KEY", "counts": [
                        {"name": "212", "count": 700},
                        {"name": "5219404", "count": 12}
                    ]}
                ]
            }));
        });

        let summary = client_for(&server).search_occurrences("BR").await.unwrap();

        mock.assert();
        assert_eq!(summary.total_count, 1234);
        assert_eq!(
            summary.taxa,
            vec![
                TaxonCount { taxon_key: "212".to_string(), count: 700 },
                TaxonCount { taxon_key: "5219404".to_string(), count: 12 },
            ]
        );
    }

    #[tokio::test]
    async fn test_search_without_facet_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/occurrence/search");
            then.status(200).json_body(serde_json::json!({"count": 0, "results": []}));
        });

        let summary = client_for(&server).search_occurrences("AQ").await.unwrap();
        assert_eq!(summary, OccurrenceSummary::default());
    }

    #[tokio::test]
    async fn test_search_server_error_is_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/occurrence/search");
            then.status(503);
        });

        let err = client_for(&server).search_occurrences("BR").await.unwrap_err();
        match err {
            BioverseError::UpstreamError { source_name, status, .. } => {
                assert_eq!(source_name, "GBIF");
                assert_eq!(status, Some(503));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_species_detail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/species/5219404");
            then.status(200).json_body(serde_json::json!({
                "key": 5219404,
                "scientificName": "Panthera onca (Linnaeus, 1758)",
                "vernacularName": "Jaguar"
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/species/1");
            then.status(200).json_body(serde_json::json!({"key": 1, "scientificName": ""}));
        });

        let client = client_for(&server);
        let detail = client.species_detail("5219404").await.unwrap();
        assert_eq!(detail.scientific_name.as_deref(), Some("Panthera onca (Linnaeus, 1758)"));
        assert_eq!(detail.vernacular_name.as_deref(), Some("Jaguar"));

        let blank = client.species_detail("1").await.unwrap();
        assert_eq!(blank, SpeciesDetail::default());
    }
}
