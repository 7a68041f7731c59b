use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use cf_ddns::{logging, Cloudflare, Config, HttpIpResolver, Reconciler};

#[derive(Parser, Debug)]
#[command(name = "cf-ddns")]
#[command(about = "Point a Cloudflare DNS record at the current public IP")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Append log lines to this file instead of the one in the config
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (before logger init)
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let log_file = args.log_file.as_deref().or(config.log_file.as_deref());
    logging::builder(&config.log_level, log_file)
        .context("Failed to open log file")?
        .init();

    info!("Loaded configuration from: {}", args.config.display());

    if let Err(e) = run(&config).await {
        // Logged only; returning the error would print it a second time.
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(config: &Config) -> Result<()> {
    let ip_source = HttpIpResolver::new(&config.json_ip_service, &config.json_query)?;
    let provider = Cloudflare::with_api_base(&config.access_token, &config.api_base);

    let outcome = Reconciler::new(config, &ip_source, &provider)
        .run()
        .await
        .context("DNS update failed")?;

    info!(
        "{} {} ({}) -> {} [zone {}, record {}]",
        if outcome.created { "Created" } else { "Updated" },
        config.record_name,
        config.record_type,
        outcome.ip,
        outcome.zone_id,
        outcome.record_id
    );

    Ok(())
}
