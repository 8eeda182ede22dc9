use crate::core::metrics::{self, Valuation};
use crate::domain::model::{
    ConservationStatus, DiversityMetrics, SpeciesObservation, TaxonCount,
};
use crate::domain::ports::{ConservationSource, OccurrenceSource};
use crate::domain::report::{
    BiodiversityData, BiodiversityReport, CarbonCreditSection, Coordinates, Location,
    MetricsSection, ScoreComponents, ScoreSection, SpeciesEntry,
};
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};

const MOCK_DNA_SEQUENCE: &str = "MOCKED_DNA_SEQUENCE_ATCG...";
const SPECIES_SOURCE: &str = "GBIF + IUCN";
const NO_COMMON_NAME: &str = "N/A";

/// How a single species' enrichment went. Failures stay per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Status came back from the conservation source.
    Assessed,
    /// The conservation source has no assessment for the name.
    NotAssessed,
    /// No lookup was made: no conservation source or no scientific name.
    Skipped,
    DetailFailed(String),
    StatusFailed(String),
}

impl LookupOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::DetailFailed(_) | Self::StatusFailed(_))
    }
}

#[derive(Debug, Clone)]
pub struct Enrichment {
    pub observation: SpeciesObservation,
    pub outcome: LookupOutcome,
}

/// Runs one regional analysis: occurrence search, per-species enrichment,
/// metrics, report.
pub struct BiodiversityAnalyzer<O: OccurrenceSource, C: ConservationSource> {
    occurrences: O,
    conservation: Option<C>,
    enrich_limit: usize,
    concurrent_requests: usize,
}

impl<O: OccurrenceSource, C: ConservationSource> BiodiversityAnalyzer<O, C> {
    pub fn new(
        occurrences: O,
        conservation: Option<C>,
        enrich_limit: usize,
        concurrent_requests: usize,
    ) -> Self {
        Self {
            occurrences,
            conservation,
            enrich_limit,
            concurrent_requests: concurrent_requests.max(1),
        }
    }

    /// Fails only when the occurrence search itself fails.
    pub async fn analyze(&self, country: &str) -> Result<BiodiversityReport> {
        tracing::info!("🔎 Analyzing biodiversity for {}", country);

        let summary = self.occurrences.search_occurrences(country).await?;
        tracing::info!(
            "📥 {}: {} occurrence records across {} taxa",
            country,
            summary.total_count,
            summary.taxa.len()
        );

        let enriched = self.enrich(&summary.taxa).await;
        let failures = enriched.iter().filter(|e| e.outcome.is_failure()).count();
        if failures > 0 {
            tracing::warn!(
                "⚠️ {}: {} of {} species lookups failed, marked NE",
                country,
                failures,
                enriched.len()
            );
        }

        let observations: Vec<SpeciesObservation> =
            enriched.into_iter().map(|e| e.observation).collect();
        let counts: Vec<u64> = summary.taxa.iter().map(|t| t.count).collect();

        let diversity = metrics::diversity_metrics(&counts, &observations);
        let valuation = diversity.valuation();
        tracing::info!(
            "📊 {}: richness={}, shannon={:.3}, threatened={}, score={}",
            country,
            diversity.species_richness,
            diversity.shannon_index,
            diversity.threatened_species_count,
            valuation.score.overall
        );

        Ok(build_report(
            country,
            summary.total_count,
            &observations,
            &diversity,
            &valuation,
        ))
    }

    /// Enriches the first `enrich_limit` taxa, at most `concurrent_requests`
    /// at a time. Output order follows input order.
    pub async fn enrich(&self, taxa: &[TaxonCount]) -> Vec<Enrichment> {
        let lookups: Vec<_> = taxa
            .iter()
            .take(self.enrich_limit)
            .map(|taxon| self.enrich_one(taxon))
            .collect();

        stream::iter(lookups)
            .buffered(self.concurrent_requests)
            .collect()
            .await
    }

    async fn enrich_one(&self, taxon: &TaxonCount) -> Enrichment {
        let observation = |scientific_name: String,
                           common_name: Option<String>,
                           status: ConservationStatus| SpeciesObservation {
            taxon_id: taxon.taxon_key.clone(),
            occurrence_count: taxon.count,
            scientific_name,
            common_name,
            conservation_status: status,
        };

        let detail = match self.occurrences.species_detail(&taxon.taxon_key).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!("Species lookup failed for taxon {}: {}", taxon.taxon_key, e);
                return Enrichment {
                    observation: observation(
                        SpeciesObservation::unknown_name(&taxon.taxon_key),
                        None,
                        ConservationStatus::NE,
                    ),
                    outcome: LookupOutcome::DetailFailed(e.to_string()),
                };
            }
        };

        let (status, outcome) = match (&self.conservation, detail.scientific_name.as_deref()) {
            (Some(source), Some(name)) => match source.conservation_status(name).await {
                Ok(Some(status)) => (status, LookupOutcome::Assessed),
                Ok(None) => (ConservationStatus::DD, LookupOutcome::NotAssessed),
                Err(e) => {
                    tracing::warn!("Conservation lookup failed for {}: {}", name, e);
                    (ConservationStatus::NE, LookupOutcome::StatusFailed(e.to_string()))
                }
            },
            _ => (ConservationStatus::DD, LookupOutcome::Skipped),
        };

        let name = detail
            .scientific_name
            .unwrap_or_else(|| SpeciesObservation::unknown_name(&taxon.taxon_key));

        Enrichment {
            observation: observation(name, detail.vernacular_name, status),
            outcome,
        }
    }
}

pub fn build_report(
    country: &str,
    total_count: u64,
    observations: &[SpeciesObservation],
    diversity: &DiversityMetrics,
    valuation: &Valuation,
) -> BiodiversityReport {
    let species_list = observations
        .iter()
        .map(|o| SpeciesEntry {
            scientific_name: o.scientific_name.clone(),
            common_name: o
                .common_name
                .clone()
                .unwrap_or_else(|| NO_COMMON_NAME.to_string()),
            taxon_key: o.taxon_id.clone(),
            occurrences: o.occurrence_count,
            dna_sequence: MOCK_DNA_SEQUENCE.to_string(),
            source: SPECIES_SOURCE.to_string(),
            conservation_status: Some(o.conservation_status),
        })
        .collect();

    BiodiversityReport {
        location: Location {
            name: format!("GBIF Data for Country: {}", country),
            country: country.to_string(),
            coordinates: Coordinates::default(),
        },
        biodiversity_data: BiodiversityData {
            total_species: total_count,
            species_list,
            metrics: MetricsSection {
                species_richness: diversity.species_richness,
                shannon_index: metrics::round_to(diversity.shannon_index, 2),
                simpson_index: metrics::legacy_simpson_index(diversity.shannon_index),
                endemic_species: metrics::estimated_endemic_species(diversity.species_richness),
                threatened_species: diversity.threatened_species_count,
            },
        },
        biodiversity_score: ScoreSection {
            overall: valuation.score.overall,
            components: ScoreComponents {
                diversity: valuation.score.diversity_component,
                rarity: 0,
                endemism: 0,
                conservation: valuation.score.conservation_component,
            },
        },
        carbon_credit: CarbonCreditSection {
            base_price: valuation.quote.base_price,
            biodiversity_multiplier: metrics::round_to(valuation.quote.multiplier, 2),
            adjusted_price: metrics::round_to(valuation.quote.adjusted_price, 2),
            premium_percentage: metrics::round_to(valuation.quote.premium_percentage, 0),
        },
    }
}
