// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod bangs;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Bangs CLI
#[derive(Parser, Debug)]
#[command(name = "bangs-cli")]
#[command(version)]
#[command(about = "Resolve, autocomplete and index !bangs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the redirect URL for a query containing a !bang
    Detect(bangs::DetectArgs),

    /// Autocomplete !bang triggers through the suggestion backend
    Suggest(bangs::SuggestArgs),

    /// Drop and recreate the suggestion backend index
    RebuildIndex(bangs::RegistryArgs),

    /// Check the bang data for duplicate triggers and missing favicons
    Validate(bangs::RegistryArgs),
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Detect(args) => bangs::detect(args),
        Commands::Suggest(args) => bangs::suggest(args).await,
        Commands::RebuildIndex(args) => bangs::rebuild_index(args).await,
        Commands::Validate(args) => bangs::validate(args),
    }
}
