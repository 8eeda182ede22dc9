use bioverse_credits::domain::model::ConservationStatus;
use bioverse_credits::{live_analyzer, BioverseError, Settings};
use httpmock::prelude::*;

fn settings_for(gbif: &MockServer, iucn: &MockServer, token: Option<&str>) -> Settings {
    Settings {
        gbif_base_url: gbif.base_url(),
        iucn_base_url: iucn.base_url(),
        iucn_api_token: token.map(str::to_string),
        request_timeout_seconds: 5,
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_end_to_end_with_one_failed_status_lookup() {
    let gbif = MockServer::start();
    let iucn = MockServer::start();

    let search = gbif.mock(|when, then| {
        when.method(GET)
            .path("/occurrence/search")
            .query_param("country", "BR")
            .query_param("hasCoordinate", "true")
            .query_param("facet", "taxonKey");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "count": 98765,
                "facets": [{"field": "TAXON_KEY", "counts": [
                    {"name": "5219404", "count": 50},
                    {"name": "5786435", "count": 30},
                    {"name": "2440898", "count": 20}
                ]}]
            }));
    });

    for (key, name, common) in [
        ("5219404", "Panthera onca", Some("Jaguar")),
        ("5786435", "Aotus azarae", None),
        ("2440898", "Tapirus terrestris", Some("Lowland Tapir")),
    ] {
        gbif.mock(|when, then| {
            when.method(GET).path(format!("/species/{}", key));
            then.status(200).json_body(serde_json::json!({
                "key": key,
                "scientificName": name,
                "vernacularName": common
            }));
        });
    }

    iucn.mock(|when, then| {
        when.method(GET)
            .path_contains("Panthera")
            .query_param("token", "test-token");
        then.status(200)
            .json_body(serde_json::json!({"result": [{"category": "VU"}]}));
    });
    iucn.mock(|when, then| {
        when.method(GET).path_contains("Aotus");
        then.status(404)
            .json_body(serde_json::json!({"message": "Not found"}));
    });
    iucn.mock(|when, then| {
        when.method(GET).path_contains("Tapirus");
        then.status(200)
            .json_body(serde_json::json!({"result": [{"category": "EN"}]}));
    });

    let analyzer = live_analyzer(&settings_for(&gbif, &iucn, Some("test-token"))).unwrap();
    let report = analyzer.analyze("BR").await.unwrap();

    search.assert();
    assert_eq!(report.location.country, "BR");
    assert_eq!(report.biodiversity_data.total_species, 98765);

    let species = &report.biodiversity_data.species_list;
    assert_eq!(species.len(), 3);
    assert_eq!(species[0].scientific_name, "Panthera onca");
    assert_eq!(species[0].common_name, "Jaguar");
    assert_eq!(species[0].conservation_status, Some(ConservationStatus::VU));
    assert_eq!(species[1].common_name, "N/A");
    assert_eq!(species[1].conservation_status, Some(ConservationStatus::NE));
    assert_eq!(species[2].conservation_status, Some(ConservationStatus::EN));
    assert!(species.iter().all(|s| s.source == "GBIF + IUCN"));

    let metrics = &report.biodiversity_data.metrics;
    assert_eq!(metrics.species_richness, 3);
    assert_eq!(metrics.threatened_species, 2);
    // H for 50/30/20 is 1.0297
    assert_eq!(metrics.shannon_index, 1.03);
    assert_eq!(metrics.endemic_species, 0);

    // 1.0297 / 4.5 * 80 = 18.3, richness 0.6, bonus 5
    assert_eq!(report.biodiversity_score.overall, 23);
    assert_eq!(report.biodiversity_score.components.diversity, 18);
    assert_eq!(report.biodiversity_score.components.conservation, 5);
    assert_eq!(report.carbon_credit.biodiversity_multiplier, 1.23);
    assert_eq!(report.carbon_credit.adjusted_price, 18.45);
    assert_eq!(report.carbon_credit.premium_percentage, 23.0);
}

#[tokio::test]
async fn test_missing_token_skips_iucn_entirely() {
    let gbif = MockServer::start();
    let iucn = MockServer::start();

    gbif.mock(|when, then| {
        when.method(GET).path("/occurrence/search");
        then.status(200).json_body(serde_json::json!({
            "count": 10,
            "facets": [{"field": "TAXON_KEY", "counts": [
                {"name": "1", "count": 6},
                {"name": "2", "count": 4}
            ]}]
        }));
    });
    gbif.mock(|when, then| {
        when.method(GET).path_contains("/species/");
        then.status(200)
            .json_body(serde_json::json!({"scientificName": "Bos taurus"}));
    });
    let iucn_calls = iucn.mock(|_when, then| {
        then.status(200)
            .json_body(serde_json::json!({"result": [{"category": "CR"}]}));
    });

    let analyzer = live_analyzer(&settings_for(&gbif, &iucn, None)).unwrap();
    let report = analyzer.analyze("US").await.unwrap();

    iucn_calls.assert_hits(0);
    assert!(report
        .biodiversity_data
        .species_list
        .iter()
        .all(|s| s.conservation_status == Some(ConservationStatus::DD)));
    assert_eq!(report.biodiversity_data.metrics.threatened_species, 0);
}

#[tokio::test]
async fn test_failed_species_detail_becomes_unknown_species() {
    let gbif = MockServer::start();
    let iucn = MockServer::start();

    gbif.mock(|when, then| {
        when.method(GET).path("/occurrence/search");
        then.status(200).json_body(serde_json::json!({
            "count": 3,
            "facets": [{"field": "TAXON_KEY", "counts": [{"name": "777", "count": 3}]}]
        }));
    });
    gbif.mock(|when, then| {
        when.method(GET).path("/species/777");
        then.status(500);
    });
    let iucn_calls = iucn.mock(|_when, then| {
        then.status(200).json_body(serde_json::json!({"result": []}));
    });

    let analyzer = live_analyzer(&settings_for(&gbif, &iucn, Some("t"))).unwrap();
    let report = analyzer.analyze("PE").await.unwrap();

    iucn_calls.assert_hits(0);
    let species = &report.biodiversity_data.species_list[0];
    assert_eq!(species.scientific_name, "Unknown Species (777)");
    assert_eq!(species.conservation_status, Some(ConservationStatus::NE));
    assert_eq!(report.biodiversity_data.metrics.shannon_index, 0.0);
    assert_eq!(report.biodiversity_data.metrics.simpson_index, None);
    assert_eq!(report.carbon_credit.adjusted_price, 15.0);
}

#[tokio::test]
async fn test_search_failure_surfaces_as_upstream_error() {
    let gbif = MockServer::start();
    let iucn = MockServer::start();

    gbif.mock(|when, then| {
        when.method(GET).path("/occurrence/search");
        then.status(502);
    });

    let analyzer = live_analyzer(&settings_for(&gbif, &iucn, Some("t"))).unwrap();
    let err = analyzer.analyze("BR").await.unwrap_err();

    assert!(matches!(
        err,
        BioverseError::UpstreamError { status: Some(502), .. }
    ));
}
