use bioverse_credits::core::sample::sample_report;
use bioverse_credits::utils::validation::{normalize_country_code, Validate};
use bioverse_credits::utils::{error::BioverseError, logger};
use bioverse_credits::{live_analyzer, server, CliConfig, Command, Settings};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting bioverse");

    let settings = match cli.settings().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if cli.verbose {
        tracing::debug!(
            "Settings: gbif={}, iucn={}, token={}, facet_limit={}, enrich_limit={}, concurrency={}",
            settings.gbif_base_url,
            settings.iucn_base_url,
            if settings.iucn_api_token.is_some() { "set" } else { "unset" },
            settings.facet_limit,
            settings.enrich_limit,
            settings.concurrent_requests
        );
    }

    let outcome = match cli.command {
        Command::Serve { .. } => server::serve(settings).await,
        Command::Analyze {
            country,
            mock,
            pretty,
        } => analyze(&settings, country.as_deref(), mock, pretty).await,
    };

    if let Err(e) = outcome {
        tracing::error!("❌ {}", e);
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = if e.is_client_error() || e.is_config_error() {
            1
        } else if matches!(
            e,
            BioverseError::ApiError(_) | BioverseError::UpstreamError { .. }
        ) {
            2
        } else {
            3
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn analyze(
    settings: &Settings,
    country: Option<&str>,
    mock: bool,
    pretty: bool,
) -> bioverse_credits::Result<()> {
    let report = if mock {
        sample_report()
    } else {
        let country = normalize_country_code(country.unwrap_or(&settings.default_country))?;
        live_analyzer(settings)?.analyze(&country).await?
    };

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);

    tracing::info!(
        "✅ {}: score {} / 100, ${:.2} per tCO2e ({}% premium)",
        report.location.country,
        report.biodiversity_score.overall,
        report.carbon_credit.adjusted_price,
        report.carbon_credit.premium_percentage
    );
    Ok(())
}
