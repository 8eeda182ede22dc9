use serde::{Deserialize, Serialize};
use std::fmt;

/// IUCN Red List category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConservationStatus {
    /// Least Concern
    LC,
    /// Near Threatened
    NT,
    /// Vulnerable
    VU,
    /// Endangered
    EN,
    /// Critically Endangered
    CR,
    /// Extinct in the Wild
    EW,
    /// Extinct
    EX,
    /// Data Deficient
    #[default]
    DD,
    /// Not Evaluated
    NE,
}

impl ConservationStatus {
    /// Maps a category string as returned by the Red List API.
    ///
    /// Matching is case-insensitive. The pre-2001 "lower risk" subcategories
    /// fold into their current equivalents; anything unrecognised is `NE`.
    pub fn from_category(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "LC" | "LR/LC" => Self::LC,
            "NT" | "LR/NT" | "LR/CD" => Self::NT,
            "VU" => Self::VU,
            "EN" => Self::EN,
            "CR" => Self::CR,
            "EW" => Self::EW,
            "EX" => Self::EX,
            "DD" => Self::DD,
            _ => Self::NE,
        }
    }

    /// Vulnerable, Endangered and Critically Endangered count as threatened.
    pub fn is_threatened(self) -> bool {
        matches!(self, Self::VU | Self::EN | Self::CR)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LC => "LC",
            Self::NT => "NT",
            Self::VU => "VU",
            Self::EN => "EN",
            Self::CR => "CR",
            Self::EW => "EW",
            Self::EX => "EX",
            Self::DD => "DD",
            Self::NE => "NE",
        }
    }
}

impl fmt::Display for ConservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One facet bucket of an occurrence search: a taxon and how often it was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonCount {
    pub taxon_key: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceSummary {
    /// Total matching occurrence records, not distinct species.
    pub total_count: u64,
    /// Facet buckets ordered by descending count.
    pub taxa: Vec<TaxonCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesDetail {
    pub scientific_name: Option<String>,
    pub vernacular_name: Option<String>,
}

/// A species seen in the region after enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesObservation {
    pub taxon_id: String,
    pub occurrence_count: u64,
    pub scientific_name: String,
    pub common_name: Option<String>,
    pub conservation_status: ConservationStatus,
}

impl SpeciesObservation {
    pub fn unknown_name(taxon_id: &str) -> String {
        format!("Unknown Species ({})", taxon_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiversityMetrics {
    pub species_richness: usize,
    pub shannon_index: f64,
    pub normalized_shannon: f64,
    pub threatened_species_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiodiversityScore {
    /// Composite score in `0..=100`.
    pub overall: u32,
    pub diversity_component: u32,
    pub conservation_component: u32,
}

/// Carbon credit price derived from a biodiversity score. Values are unrounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonCreditQuote {
    pub base_price: f64,
    pub multiplier: f64,
    pub adjusted_price: f64,
    pub premium_percentage: f64,
}
