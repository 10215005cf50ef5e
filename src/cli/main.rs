use anyhow::Context;
use clap::{Parser, Subcommand};
use idss_backend::{
    analysis::AnalysisService, config::Config, enrichment::ScenarioEnricher,
};
use reqwest::Client;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "idss-cli")]
#[command(about = "IDSS incident decision support CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "IDSS_ENDPOINT", default_value = "http://localhost:3000")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the analysis in-process and print the result
    Analyze {
        /// Directory holding incident_data.geojson and shipping_data.geojson
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Skip enrichment and use seed scenarios only
        #[arg(long)]
        offline: bool,
    },

    /// Ask a running server to run the analysis
    Run {
        /// Data directory as seen by the server
        #[arg(short, long)]
        data_dir: Option<String>,
    },

    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { data_dir, offline } => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "idss_backend=warn".into()),
                )
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();

            let mut config = Config::load().context("failed to load configuration")?;
            if offline {
                config.enrichment.enabled = false;
            }

            let enricher = ScenarioEnricher::from_config(config.enrichment.clone())?;
            let service = AnalysisService::with_uuid_ids(config.data_files(), enricher);

            let result = service.run(data_dir.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Run { data_dir } => {
            let client = Client::new();
            let body = match data_dir {
                Some(dir) => json!({ "dataDir": dir }),
                None => json!({}),
            };

            let response = client
                .post(format!("{}/run-analysis", cli.endpoint))
                .json(&body)
                .send()
                .await
                .with_context(|| format!("failed to reach {}", cli.endpoint))?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }

        Commands::Health => {
            let client = Client::new();
            let response = client
                .get(format!("{}/health", cli.endpoint))
                .send()
                .await
                .with_context(|| format!("failed to reach {}", cli.endpoint))?;

            let body: serde_json::Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
