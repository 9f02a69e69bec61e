//! maxpurge - purge MaxCDN zone and file caches from the command line.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Result, ensure};
use clap::Parser;
use maxcdn::{ApiResponse, MaxCdn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "maxpurge",
    version,
    about = "Purge cached content from MaxCDN zones"
)]
struct Cli {
    /// Consumer alias for the API account.
    #[arg(short, long, env = "ALIAS")]
    alias: String,

    /// Consumer token.
    #[arg(short, long, env = "TOKEN")]
    token: String,

    /// Consumer secret.
    #[arg(short, long, env = "SECRET")]
    secret: String,

    /// Zone id(s) to purge, comma separated.
    #[arg(short, long, env = "ZONE", value_delimiter = ',', required = true)]
    zone: Vec<i64>,

    /// Cached file path(s) to purge instead of the whole zone.
    #[arg(short, long, value_delimiter = ',')]
    file: Vec<String>,

    /// API host override (staging, testing).
    #[arg(long, env = "API_HOST")]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let start = Instant::now();

    match run(cli).await {
        Ok(()) => {
            println!("Purge successful after {}.", elapsed(start));
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err:#}.\n\nPurge failed after {}.", elapsed(start));
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut max = MaxCdn::new(cli.alias, cli.token, cli.secret);
    if let Some(host) = cli.host {
        max = max.with_api_host(host);
    }

    if !cli.file.is_empty() {
        ensure!(
            cli.zone.len() == 1,
            "file purges target exactly one zone, got {}",
            cli.zone.len()
        );
        let zone = cli.zone[0];
        if let [file] = cli.file.as_slice() {
            ensure_purged(&max.purge_file(zone, file).await?)?;
        } else {
            for response in max.purge_files(zone, &cli.file).await.into_result()? {
                ensure_purged(&response)?;
            }
        }
    } else if let [zone] = cli.zone.as_slice() {
        ensure_purged(&max.purge_zone(*zone).await?)?;
    } else {
        for response in max.purge_zones(&cli.zone).await.into_result()? {
            ensure_purged(&response)?;
        }
    }
    Ok(())
}

/// The vendor reports a completed purge as an in-body 200. Anything else
/// is a failed purge even when the transport and envelope were clean.
fn ensure_purged(response: &ApiResponse) -> Result<()> {
    ensure!(
        response.code == 200,
        "unexpected response code {}",
        response.code
    );
    Ok(())
}

/// Wall time since `start`, trimmed to millisecond precision so the
/// humantime rendering stays readable.
fn elapsed(start: Instant) -> String {
    let millis = start.elapsed().as_millis() as u64;
    humantime::format_duration(Duration::from_millis(millis)).to_string()
}
