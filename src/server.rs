use crate::adapters::live_analyzer;
use crate::config::Settings;
use crate::core::analysis::BiodiversityAnalyzer;
use crate::core::sample::sample_report;
use crate::core::{ConfigProvider, ConservationSource, OccurrenceSource};
use crate::domain::report::{BiodiversityReport, ErrorDocument};
use crate::utils::error::{BioverseError, Result};
use crate::utils::validation::normalize_country_code;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

// ============================================================================
// Application State
// ============================================================================

pub struct AppState<O: OccurrenceSource, C: ConservationSource> {
    pub analyzer: Arc<BiodiversityAnalyzer<O, C>>,
    /// Finished reports keyed by country code.
    pub cache: Cache<String, BiodiversityReport>,
    pub default_country: Arc<str>,
}

impl<O: OccurrenceSource, C: ConservationSource> Clone for AppState<O, C> {
    fn clone(&self) -> Self {
        Self {
            analyzer: Arc::clone(&self.analyzer),
            cache: self.cache.clone(),
            default_country: Arc::clone(&self.default_country),
        }
    }
}

impl<O: OccurrenceSource, C: ConservationSource> AppState<O, C> {
    pub fn new<P: ConfigProvider>(analyzer: BiodiversityAnalyzer<O, C>, config: &P) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity())
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds()))
            .build();

        Self {
            analyzer: Arc::new(analyzer),
            cache,
            default_country: Arc::from(config.default_country()),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router<O, C>(state: AppState<O, C>) -> Router
where
    O: OccurrenceSource + 'static,
    C: ConservationSource + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/biodiversity", get(get_biodiversity::<O, C>))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `settings.bind_address` until Ctrl-C.
pub async fn serve(settings: Settings) -> Result<()> {
    let analyzer = live_analyzer(&settings)?;
    let app = create_router(AppState::new(analyzer, &settings));

    let listener = tokio::net::TcpListener::bind(&settings.bind_address).await?;
    tracing::info!("🌱 Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[derive(Debug, Deserialize)]
pub struct BiodiversityQuery {
    pub country: Option<String>,
    #[serde(default)]
    pub mock: bool,
}

async fn get_biodiversity<O, C>(
    State(state): State<AppState<O, C>>,
    query: std::result::Result<Query<BiodiversityQuery>, QueryRejection>,
) -> std::result::Result<Json<BiodiversityReport>, AppError>
where
    O: OccurrenceSource + 'static,
    C: ConservationSource + 'static,
{
    let Query(query) = query.map_err(|rejection| BioverseError::ValidationError {
        message: rejection.body_text(),
    })?;

    if query.mock {
        return Ok(Json(sample_report()));
    }

    let requested = query
        .country
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(state.default_country.as_ref());
    let country = normalize_country_code(requested)?;

    // Concurrent misses for one country share a single analysis.
    let analyzer = Arc::clone(&state.analyzer);
    let report = state
        .cache
        .try_get_with(country.clone(), async move {
            tracing::debug!("Cache miss for {}", country);
            analyzer.analyze(&country).await.map_err(|e| {
                tracing::error!("❌ Analysis for {} failed: {}", country, e);
                e
            })
        })
        .await?;

    Ok(Json(report))
}

// ============================================================================
// Error Handling
// ============================================================================

/// Shared so a failed analysis can be reported to every waiting request.
#[derive(Debug)]
pub struct AppError(Arc<BioverseError>);

impl From<BioverseError> for AppError {
    fn from(err: BioverseError) -> Self {
        Self(Arc::new(err))
    }
}

impl From<Arc<BioverseError>> for AppError {
    fn from(err: Arc<BioverseError>) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = if self.0.is_client_error() {
            (StatusCode::BAD_REQUEST, "Invalid biodiversity request")
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error fetching biodiversity data",
            )
        };

        let body = ErrorDocument {
            message: message.to_string(),
            error: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
