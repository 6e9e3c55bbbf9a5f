use std::time::Duration;

use clap::Parser;
use reqwest::ClientBuilder;
use statedash_core::{ChartData, DerivedMetrics, Event, PipelineConfig, StateMetadata, StatePipeline};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "statedash", about = "State COVID breakthrough dashboard")]
struct Cli {
    /// State code to display, deep-link style fragments accepted (`ca` or `#ca`).
    /// Falls back to the configured default state.
    state: Option<String>,

    /// Override the data base URL from the config file.
    #[arg(long)]
    base_url: Option<String>,

    /// Print the full chart series instead of just the summary.
    #[arg(long)]
    chart: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut config = PipelineConfig::load();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    let client = ClientBuilder::new()
        .timeout(config.request_timeout())
        .user_agent("statedash/0.1")
        .build()
        .expect("failed to build HTTP client");

    let (events_tx, mut events_rx) = mpsc::channel(8);
    let pipeline = StatePipeline::new(client, config, events_tx);

    let state = pipeline.resolve_initial(cli.state.as_deref());
    if let Err(err) = pipeline.select_state(&state).await {
        eprintln!(
            "error: {err} (supported: {})",
            pipeline.supported_states().join(", ")
        );
        std::process::exit(2);
    }

    let event = tokio::time::timeout(Duration::from_secs(30), events_rx.recv()).await;
    match event {
        Ok(Some(Event::Render {
            metadata,
            metrics,
            chart,
            ..
        })) => {
            print_summary(&metadata, &metrics);
            if cli.chart {
                print_chart(&chart);
            }
            if let Some(fragment) = pipeline.location_fragment().await {
                println!("\npermalink fragment: {fragment}");
            }
        }
        Ok(Some(Event::FetchFailed { state, reason })) => {
            eprintln!("could not load data for {state}: {reason}");
            std::process::exit(1);
        }
        Ok(None) | Err(_) => {
            eprintln!("timed out waiting for data");
            std::process::exit(1);
        }
    }
}

fn print_summary(metadata: &StateMetadata, metrics: &DerivedMetrics) {
    println!("{} — {}", metadata.state_label, metadata.human_label);
    println!(
        "  total deaths:        {:>8}  (as of {})",
        metrics.latest_epi_deaths, metrics.epi_as_of_date
    );
    println!("  last 30 days:        {:>8}", metrics.epi_deaths_last_30_days);
    println!(
        "  breakthrough deaths: {:>8}  (as of {})",
        metrics.latest_breakthrough_deaths, metrics.breakthrough_as_of_date
    );
    println!(
        "  last 30 days:        {:>8}",
        metrics.breakthrough_deaths_last_30_days
    );
    println!(
        "  breakthrough share:  {:>8}",
        metrics.breakthrough_percentage_display()
    );
}

fn print_chart(chart: &ChartData) {
    for series in [&chart.epi, &chart.breakthrough] {
        println!("\n{}", series.label);
        for point in &series.points {
            println!("  {}  {:>8}", point.x, point.y);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
