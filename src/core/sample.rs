use crate::domain::report::{
    BiodiversityData, BiodiversityReport, CarbonCreditSection, Coordinates, Location,
    MetricsSection, ScoreComponents, ScoreSection, SpeciesEntry,
};

/// Fixed demo report served for `mock=true`. No upstream calls involved.
pub fn sample_report() -> BiodiversityReport {
    BiodiversityReport {
        location: Location {
            name: "Amazon Rainforest, Brazil (Demo Data)".to_string(),
            country: "BR".to_string(),
            coordinates: Coordinates {
                lat: -3.4653,
                lng: -62.2159,
            },
        },
        biodiversity_data: BiodiversityData {
            total_species: 156,
            species_list: vec![
                sample_species("Panthera onca", "Jaguar", "5219404", 12, "ATCGATCG..."),
                sample_species(
                    "Aotus azarae",
                    "Azara's night monkey",
                    "5786435",
                    5,
                    "GCTAGCTA...",
                ),
            ],
            metrics: MetricsSection {
                species_richness: 156,
                shannon_index: 3.45,
                simpson_index: Some(0.92),
                endemic_species: 23,
                threatened_species: 8,
            },
        },
        biodiversity_score: ScoreSection {
            overall: 87,
            components: ScoreComponents {
                diversity: 90,
                rarity: 85,
                endemism: 82,
                conservation: 89,
            },
        },
        carbon_credit: CarbonCreditSection {
            base_price: 15.0,
            biodiversity_multiplier: 1.45,
            adjusted_price: 21.75,
            premium_percentage: 45.0,
        },
    }
}

fn sample_species(
    scientific_name: &str,
    common_name: &str,
    taxon_key: &str,
    occurrences: u64,
    dna_sequence: &str,
) -> SpeciesEntry {
    SpeciesEntry {
        scientific_name: scientific_name.to_string(),
        common_name: common_name.to_string(),
        taxon_key: taxon_key.to_string(),
        occurrences,
        dna_sequence: dna_sequence.to_string(),
        source: "GBIF+GenBank".to_string(),
        conservation_status: None,
    }
}
