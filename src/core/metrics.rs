//! Diversity metrics and the biodiversity-adjusted carbon credit price.
//!
//! Everything here is pure and total over non-negative inputs: no I/O, no
//! logging, no shared state.

use crate::domain::model::{
    BiodiversityScore, CarbonCreditQuote, DiversityMetrics, SpeciesObservation,
};

/// Shannon index treated as "maximally diverse" when normalizing.
///
/// Empirical upper bound for real-world assemblages, not derived from the
/// data. Tune here.
pub const SHANNON_UPPER_BOUND: f64 = 4.5;

/// Carbon credit price before the biodiversity premium, USD per tCO2e.
pub const BASE_PRICE: f64 = 15.0;

/// Points available from normalized Shannon diversity.
pub const DIVERSITY_WEIGHT: f64 = 80.0;

/// Points available from species richness.
pub const RICHNESS_WEIGHT: f64 = 20.0;

/// Richness at which the richness points saturate.
pub const RICHNESS_CAP: f64 = 100.0;

pub const MAX_SCORE: u32 = 100;

/// Share of richness reported as endemic. A rough estimate only.
const ENDEMIC_SHARE: f64 = 0.1;

/// Shannon diversity index `H = -Σ pᵢ ln pᵢ` over per-species counts.
///
/// Returns 0 for an empty slice or a zero total.
pub fn shannon_index(counts: &[u64]) -> f64 {
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    counts
        .iter()
        .map(|&count| count as f64 / total)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum()
}

/// Maps a raw Shannon index onto `[0, 1]`.
pub fn normalize(raw_shannon: f64) -> f64 {
    (raw_shannon / SHANNON_UPPER_BOUND).min(1.0)
}

/// Extra score points for threatened species in the region.
///
/// More threatened species raise the score: at-risk habitats earn a larger
/// conservation premium.
pub fn conservation_bonus(threatened_count: usize) -> u32 {
    if threatened_count > 5 {
        10
    } else if threatened_count > 0 {
        5
    } else {
        0
    }
}

pub fn count_threatened(observations: &[SpeciesObservation]) -> usize {
    observations
        .iter()
        .filter(|o| o.conservation_status.is_threatened())
        .count()
}

/// Builds the metrics for a region.
///
/// `counts` covers every taxon in the occurrence facet; `observations` only
/// the enriched subset, which is where conservation status is known.
pub fn diversity_metrics(counts: &[u64], observations: &[SpeciesObservation]) -> DiversityMetrics {
    let shannon = shannon_index(counts);
    DiversityMetrics {
        species_richness: counts.len(),
        shannon_index: shannon,
        normalized_shannon: normalize(shannon),
        threatened_species_count: count_threatened(observations),
    }
}

/// Score and price for one region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub normalized_shannon: f64,
    pub diversity_score: f64,
    pub richness_score: f64,
    pub conservation_bonus: u32,
    pub score: BiodiversityScore,
    pub quote: CarbonCreditQuote,
}

pub fn score_and_price(species_richness: usize, raw_shannon: f64, threatened_count: usize) -> Valuation {
    let normalized_shannon = normalize(raw_shannon);
    let diversity_score = normalized_shannon * DIVERSITY_WEIGHT;
    let richness_score = (species_richness as f64 / RICHNESS_CAP).min(1.0) * RICHNESS_WEIGHT;
    let bonus = conservation_bonus(threatened_count);

    // All three terms are non-negative, so only the upper bound needs clamping.
    let overall = ((diversity_score + richness_score + f64::from(bonus)).floor() as u32).min(MAX_SCORE);

    let multiplier = 1.0 + f64::from(overall) / 100.0;

    Valuation {
        normalized_shannon,
        diversity_score,
        richness_score,
        conservation_bonus: bonus,
        score: BiodiversityScore {
            overall,
            diversity_component: diversity_score.floor() as u32,
            conservation_component: (richness_score + f64::from(bonus)).floor() as u32,
        },
        quote: CarbonCreditQuote {
            base_price: BASE_PRICE,
            multiplier,
            adjusted_price: BASE_PRICE * multiplier,
            premium_percentage: (multiplier - 1.0) * 100.0,
        },
    }
}

impl DiversityMetrics {
    pub fn valuation(&self) -> Valuation {
        score_and_price(
            self.species_richness,
            self.shannon_index,
            self.threatened_species_count,
        )
    }
}

/// The legacy "simpsonIndex" field: `1 - 1/H²`.
///
/// This is a transform of the Shannon index, not Simpson's `1 - Σ pᵢ²`, and
/// is kept only so existing consumers see the same numbers. `None` when H is
/// zero.
pub fn legacy_simpson_index(shannon: f64) -> Option<f64> {
    if shannon > 0.0 {
        Some(round_to(1.0 - 1.0 / (shannon * shannon), 2))
    } else {
        None
    }
}

pub fn estimated_endemic_species(species_richness: usize) -> usize {
    (species_richness as f64 * ENDEMIC_SHARE).floor() as usize
}

/// Rounds half away from zero to `places` decimals, for presentation only.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
