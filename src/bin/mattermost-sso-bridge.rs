// ABOUTME: Command-line entry point for the Mattermost SSO bridge
// ABOUTME: Runs the HTTP server or seeds roles referenced by default role codes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Mattermost SSO Bridge Binary
//!
//! `mattermost-sso-bridge` (or `serve`) starts the HTTP server;
//! `seed-role --code member --name Member` provisions a role.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mattermost_sso_bridge::{
    config::ServerConfig,
    database::{Database, UserRepository},
    logging,
    providers::MattermostProvider,
    server::{self, ServerResources},
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "mattermost-sso-bridge")]
#[command(about = "Mattermost OAuth2 identity bridge issuing local sessions")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create or rename a role so it can be granted to new users
    SeedRole {
        /// Stable role code, e.g. `member`
        #[arg(long)]
        code: String,
        /// Display name
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    let database = Database::new(&config.database.url)
        .await
        .context("Failed to open database")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("{}", config.summary());
            let provider = Arc::new(MattermostProvider::new(&config.mattermost));
            let resources = Arc::new(ServerResources::new(database, provider, &config));
            server::run(&config, resources).await
        }
        Command::SeedRole { code, name } => {
            let role = database
                .upsert_role(&code, &name)
                .await
                .context("Failed to seed role")?;
            info!(role.id = %role.id, role.code = %role.code, "Role ready");
            Ok(())
        }
    }
}
