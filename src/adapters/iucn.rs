use crate::domain::model::ConservationStatus;
use crate::domain::ports::{ConfigProvider, ConservationSource};
use crate::utils::error::{BioverseError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const SOURCE_NAME: &str = "IUCN";

/// IUCN Red List v3 client. Requires an API token.
#[derive(Debug, Clone)]
pub struct IucnClient {
    base_url: String,
    token: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SpeciesByNameResponse {
    #[serde(default)]
    result: Vec<Assessment>,
}

#[derive(Debug, Deserialize)]
struct Assessment {
    category: Option<String>,
}

impl IucnClient {
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    /// `None` when no token is configured; callers then fall back to `DD`.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Option<Self>> {
        match config.iucn_api_token() {
            Some(token) => Self::new(
                config.iucn_base_url(),
                token,
                Duration::from_secs(config.request_timeout_seconds()),
            )
            .map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ConservationSource for IucnClient {
    async fn conservation_status(
        &self,
        scientific_name: &str,
    ) -> Result<Option<ConservationStatus>> {
        let mut url = Url::parse(&self.base_url).map_err(|e| BioverseError::ConfigError {
            message: format!("invalid IUCN base URL '{}': {}", self.base_url, e),
        })?;
        url.path_segments_mut()
            .map_err(|_| BioverseError::ConfigError {
                message: format!("IUCN base URL '{}' cannot have a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["species", "name", scientific_name]);

        let response = self
            .client
            .get(url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BioverseError::upstream(
                SOURCE_NAME,
                Some(status.as_u16()),
                format!("status lookup for '{}' failed", scientific_name),
            ));
        }

        let body: SpeciesByNameResponse = response.json().await?;
        Ok(body
            .result
            .into_iter()
            .next()
            .and_then(|a| a.category)
            .map(|c| ConservationStatus::from_category(&c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> IucnClient {
        IucnClient::new(&server.base_url(), "secret", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_first_assessment_category_is_used() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path_contains("/species/name/Panthera")
                .query_param("token", "secret");
            then.status(200).json_body(serde_json::json!({
                "name": "Panthera onca",
                "result": [
                    {"taxonid": 15953, "scientific_name": "Panthera onca", "category": "NT"},
                    {"taxonid": 1, "category": "LC"}
                ]
            }));
        });

        let status = client_for(&server)
            .conservation_status("Panthera onca")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(status, Some(ConservationStatus::NT));
    }

    #[tokio::test]
    async fn test_empty_result_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_contains("/species/name/");
            then.status(200)
                .json_body(serde_json::json!({"name": "Nomen nudum", "result": []}));
        });

        let status = client_for(&server)
            .conservation_status("Nomen nudum")
            .await
            .unwrap();
        assert_eq!(status, None);
    }

    #[tokio::test]
    async fn test_not_found_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path_contains("/species/name/");
            then.status(404);
        });

        let err = client_for(&server)
            .conservation_status("Panthera onca")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BioverseError::UpstreamError { status: Some(404), .. }
        ));
    }
}
