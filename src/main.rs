mod app;
mod contracts;
mod network;
mod util;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::contracts::{FileSource, HttpSource, ServiceSource};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the contract registry.
    #[arg(long, env = "CONTRACT_GRAPH_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Read environments from a JSON file instead of the registry.
    #[arg(long)]
    services_file: Option<PathBuf>,

    /// Environment to show first.
    #[arg(long)]
    environment: Option<String>,

    /// Also show services that take part in no link.
    #[arg(long)]
    show_all: bool,

    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
}

fn source_from_args(args: &Args) -> anyhow::Result<Arc<dyn ServiceSource>> {
    let source: Arc<dyn ServiceSource> = match &args.services_file {
        Some(path) => Arc::new(FileSource::new(path)),
        None => Arc::new(
            HttpSource::new(&args.api_url, Duration::from_secs(args.timeout_secs))
                .with_context(|| format!("invalid registry url {}", args.api_url))?,
        ),
    };
    Ok(source)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contract_graph=info")),
        )
        .init();

    let args = Args::parse();
    let source = source_from_args(&args)?;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "contract-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ContractGraphApp::new(
                cc,
                source,
                args.environment.clone(),
                args.show_all,
            )))
        }),
    )
    .map_err(|error| anyhow::anyhow!("failed to run the viewer: {error}"))
}
