// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::bangs::{BangRegistry, BangService, BangsConfig, LanguageTag, RegionCode};

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Search query, e.g. `!g rust lifetimes`
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Region code used to pick a regional template
    #[arg(long, default_value = "us")]
    pub region: String,

    /// Language tag substituted into the URL template
    #[arg(long, default_value = "en")]
    pub lang: String,

    /// Bang data file (defaults to the built-in set)
    #[arg(long, env = "BANGS_FILE")]
    pub bangs_file: Option<PathBuf>,
}

/// Arguments for the suggest command
#[derive(Args, Debug)]
pub struct SuggestArgs {
    /// Partial trigger, e.g. `!g`
    pub prefix: String,

    /// Maximum number of suggestions (defaults to BANG_SUGGEST_LIMIT)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Bang data file (defaults to the built-in set)
    #[arg(long, env = "BANGS_FILE")]
    pub bangs_file: Option<PathBuf>,
}

/// Arguments for commands that only need the registry source
#[derive(Args, Debug)]
pub struct RegistryArgs {
    /// Bang data file (defaults to the built-in set)
    #[arg(long, env = "BANGS_FILE")]
    pub bangs_file: Option<PathBuf>,
}

fn load_config(bangs_file: Option<PathBuf>) -> BangsConfig {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let mut config = BangsConfig::from_env();
    if bangs_file.is_some() {
        config.bangs_file = bangs_file;
    }
    config
}

/// Resolve a query to its redirect URL
pub fn detect(args: DetectArgs) -> Result<()> {
    let config = load_config(args.bangs_file);
    let registry = BangRegistry::from_config(&config)?;

    let query = args.query.join(" ");
    let region = RegionCode::new(&args.region);
    let lang = LanguageTag::new(&args.lang);

    match registry.detect(&query, &region, &lang) {
        Some(url) => println!("{}", url),
        None => println!("No bang detected in {:?}", query),
    }
    Ok(())
}

/// Query the suggestion backend and print enriched results as JSON
pub async fn suggest(args: SuggestArgs) -> Result<()> {
    let config = load_config(args.bangs_file);
    let service = BangService::from_config(&config)?;
    let limit = args.limit.unwrap_or(config.suggest_limit);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let results = service.suggest(&args.prefix, limit, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Recreate the backend index from the registry
pub async fn rebuild_index(args: RegistryArgs) -> Result<()> {
    let config = load_config(args.bangs_file);
    let service = BangService::from_config(&config)?;

    service.rebuild_index().await?;
    println!(
        "✅ Rebuilt index {} with {} bangs",
        config.elasticsearch.index,
        service.registry().len()
    );
    Ok(())
}

/// Load the registry and report anything suspicious
pub fn validate(args: RegistryArgs) -> Result<()> {
    let config = load_config(args.bangs_file);
    let registry = BangRegistry::from_config(&config)?;
    let report = registry.validate();

    info!("Validated {} bangs", registry.len());

    for name in &report.missing_favicons {
        warn!("{:?} bang needs a favicon", name);
    }
    for dup in &report.duplicate_triggers {
        println!(
            "❌ trigger {:?} of {:?} is shadowed by {:?}",
            dup.trigger, dup.shadowed, dup.winner
        );
    }

    if !report.duplicate_triggers.is_empty() {
        return Err(anyhow!(
            "{} duplicate trigger(s) found",
            report.duplicate_triggers.len()
        ));
    }

    println!("✅ {} bangs OK", registry.len());
    Ok(())
}
