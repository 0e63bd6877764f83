use std::collections::BTreeMap;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{error, info};
use serde_json::json;

use hw2_scout::cli::Cli;
use hw2_scout::{EventCache, Gamertag, HaloApiClient, HaloStatsSource, PlayerReportBuilder};

#[tokio::main]
async fn main() -> ExitCode {
    sensible_env_logger::init!();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("Error: {:#}", err).red());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let key = cli
        .key
        .clone()
        .or_else(|| std::env::var("HW2_API_KEY").ok())
        .context("Api key not found. Pass --key or set HW2_API_KEY.")?;

    let client = HaloApiClient::new(key)?;
    let cache = EventCache::new(&cli.cache_dir)?;
    cache.prune(cli.cache_days)?;
    let source = HaloStatsSource::new(client, cache);

    let mode = cli.mode();
    let mut data = BTreeMap::new();
    for (slot, raw_gamertag) in cli.players() {
        let Some(gamertag) = Gamertag::parse(raw_gamertag) else {
            error!(
                "Incorrect gamertag format provided for the {} player: {:?}",
                slot, raw_gamertag
            );
            continue;
        };
        info!("Building {} report for {} ({})", mode.label(), gamertag, slot);
        let report = PlayerReportBuilder::new(gamertag, mode).build(&source).await?;
        data.insert(slot, report);
    }

    let output = json!({"status": "Success", "data": data});
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
