//! Ocean velocity glyph service.
//!
//! Fetches a velocity sub-volume from the array server and turns it into
//! instanced glyph batches, with:
//! - Arrow batches colored by speed and land markers for still cells
//! - Newest-request-wins publication
//! - Optional periodic refresh
//! - HTTP status API for monitoring

mod server;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use field_pipeline::{Pipeline, RunOutcome};
use field_sampler::SamplerConfig;
use seaview_common::GradientConfig;
use server::ServerState;
use visus_client::{AxisRange, ClientConfig, QueryDescriptor, VisusClient};

#[derive(Parser, Debug)]
#[command(name = "seaview")]
#[command(about = "Ocean velocity field to instanced glyph batches")]
struct Args {
    /// Run a single request and exit
    #[arg(long)]
    once: bool,

    /// Array server endpoint
    #[arg(long, env = "SEAVIEW_BASE_URL")]
    base_url: Option<String>,

    /// Resolution level requested from the server
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    quality: i32,

    /// Timestep index
    #[arg(long, default_value = "0")]
    time: u32,

    /// Depth range as MIN,MAX
    #[arg(long, default_value = "0,1", value_parser = parse_range)]
    z: AxisRange,

    /// Horizontal x range as MIN,MAX
    #[arg(long, default_value = "0,200", value_parser = parse_range)]
    x_range: AxisRange,

    /// Horizontal y range as MIN,MAX
    #[arg(long, default_value = "0,200", value_parser = parse_range)]
    y_range: AxisRange,

    /// Swap inverted ranges before sending them
    #[arg(long)]
    normalize_ranges: bool,

    /// World distance between adjacent cells
    #[arg(long)]
    spacing: Option<f32>,

    /// Maximum instances per draw batch (1-1023)
    #[arg(long)]
    instance_cap: Option<usize>,

    /// Uniform glyph scale
    #[arg(long)]
    glyph_scale: Option<f32>,

    /// Gradient definition (JSON stop list); defaults to the ocean ramp
    #[arg(long, env = "SEAVIEW_GRADIENT")]
    gradient: Option<PathBuf>,

    /// Re-issue the request every N seconds (0 disables)
    #[arg(long, default_value = "0")]
    refresh_secs: u64,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Port for status HTTP server
    #[arg(long, env = "STATUS_PORT", default_value = "8090")]
    status_port: u16,

    /// Disable status HTTP server
    #[arg(long)]
    no_status_server: bool,
}

fn parse_range(s: &str) -> std::result::Result<AxisRange, String> {
    let (min, max) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got '{}'", s))?;
    let min = min.trim().parse().map_err(|e| format!("bad minimum: {}", e))?;
    let max = max.trim().parse().map_err(|e| format!("bad maximum: {}", e))?;
    Ok(AxisRange::new(min, max))
}

impl Args {
    fn query(&self) -> QueryDescriptor {
        let (z, x_range, y_range) = if self.normalize_ranges {
            (
                self.z.normalized(),
                self.x_range.normalized(),
                self.y_range.normalized(),
            )
        } else {
            (self.z, self.x_range, self.y_range)
        };
        QueryDescriptor::build(self.quality, self.time, z, x_range, y_range)
    }

    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        config
    }

    fn sampler_config(&self) -> SamplerConfig {
        let mut config = SamplerConfig::from_env();
        if let Some(spacing) = self.spacing {
            config.spacing = spacing;
        }
        if let Some(cap) = self.instance_cap {
            config.instance_cap = cap;
        }
        if let Some(scale) = self.glyph_scale {
            config.glyph_scale = scale;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting seaview");

    let gradient = match &args.gradient {
        Some(path) => GradientConfig::from_file(path)
            .with_context(|| format!("loading gradient from {}", path.display()))?,
        None => GradientConfig::ocean(),
    };
    let gradient = Arc::new(gradient);

    let client_config = args.client_config();
    let client = VisusClient::new(&client_config).context("creating array client")?;
    info!(base_url = %client.base_url(), "Array client ready");

    let pipeline = Pipeline::new(client, args.sampler_config(), gradient.clone())
        .context("creating pipeline")?;
    let pipeline = Arc::new(pipeline);

    let query = args.query();

    if args.once {
        // Single run mode
        info!(?query, "Running single request");

        match pipeline.request(query).await? {
            RunOutcome::Published { summary, .. } => info!(
                arrow_batches = summary.arrow_batches,
                land_batches = summary.land_batches,
                arrows = summary.arrow_instances,
                land = summary.land_instances,
                max_magnitude = summary.max_magnitude,
                "Request complete"
            ),
            RunOutcome::Superseded { generation } => {
                info!(generation, "Request superseded")
            }
        }
        return Ok(());
    }

    // Start status server
    if !args.no_status_server {
        let server_state = Arc::new(ServerState {
            pipeline: pipeline.clone(),
            gradient: gradient.clone(),
        });
        let status_port = args.status_port;
        tokio::spawn(async move {
            if let Err(e) = server::run_server(server_state, status_port).await {
                error!(error = %e, "Status server failed");
            }
        });
    }

    pipeline.replace_request(query);

    if args.refresh_secs > 0 {
        let refresher = pipeline.clone();
        let period = Duration::from_secs(args.refresh_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; the initial request is already issued.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                // A refresh supersedes a run that is still downloading.
                refresher.replace_request(query);
            }
        });
    }

    tokio::signal::ctrl_c().await.ok();
    info!("Received shutdown signal");

    let latest = pipeline.latest();
    info!(
        generation = latest.generation,
        published = latest.batches.is_some(),
        "Seaview session complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0,200").unwrap(), AxisRange::new(0, 200));
        assert_eq!(parse_range(" 5 , -3 ").unwrap(), AxisRange::new(5, -3));
        assert!(parse_range("0").is_err());
        assert!(parse_range("a,1").is_err());
    }

    #[test]
    fn test_default_args_give_reference_query() {
        let args = Args::parse_from(["seaview"]);
        assert_eq!(args.query(), QueryDescriptor::default());
        assert!(!args.once);
    }

    #[test]
    fn test_normalize_ranges_flag() {
        let args = Args::parse_from([
            "seaview",
            "--x-range",
            "200,0",
            "--quality",
            "-3",
            "--normalize-ranges",
        ]);
        let query = args.query();
        assert_eq!(query.x_range, AxisRange::new(0, 200));
        assert_eq!(query.quality, -3);
    }

    #[test]
    fn test_inverted_ranges_kept_without_flag() {
        let args = Args::parse_from(["seaview", "--y-range", "9,1"]);
        assert_eq!(args.query().y_range, AxisRange::new(9, 1));
    }

    #[test]
    fn test_sampler_overrides() {
        let args = Args::parse_from(["seaview", "--spacing", "4", "--instance-cap", "500"]);
        let config = args.sampler_config();
        assert_eq!(config.spacing, 4.0);
        assert_eq!(config.instance_cap, 500);
    }
}
