//! JSON document returned by the analysis endpoint and the `analyze` command.
//!
//! Field names are camelCase to stay compatible with the dashboard that
//! renders them.

use crate::domain::model::ConservationStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiodiversityReport {
    pub location: Location,
    pub biodiversity_data: BiodiversityData,
    pub biodiversity_score: ScoreSection,
    pub carbon_credit: CarbonCreditSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub country: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiodiversityData {
    /// Occurrence records matched by the search.
    pub total_species: u64,
    pub species_list: Vec<SpeciesEntry>,
    pub metrics: MetricsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesEntry {
    pub scientific_name: String,
    pub common_name: String,
    pub taxon_key: String,
    pub occurrences: u64,
    pub dna_sequence: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conservation_status: Option<ConservationStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSection {
    pub species_richness: usize,
    pub shannon_index: f64,
    /// Legacy `1 - 1/H²` transform of the Shannon index, not Simpson's D.
    /// `None` when H is zero.
    pub simpson_index: Option<f64>,
    pub endemic_species: usize,
    pub threatened_species: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSection {
    pub overall: u32,
    pub components: ScoreComponents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub diversity: u32,
    pub rarity: u32,
    pub endemism: u32,
    pub conservation: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonCreditSection {
    pub base_price: f64,
    pub biodiversity_multiplier: f64,
    pub adjusted_price: f64,
    pub premium_percentage: f64,
}

/// Body of every non-2xx response from the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    pub message: String,
    pub error: String,
}
