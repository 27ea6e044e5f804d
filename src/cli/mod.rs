//! CLI module for the PMP data layer
//!
//! Account commands run against the configured cache and store:
//! - `register`: create an account
//! - `login`: check credentials
//! - `show-user`: fetch an account through the cache as a given actor
//! - `list-users`: list every account

pub mod users;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::AppState;

/// PMP Data Layer - account operations over the cache-aside repository
#[derive(Parser)]
#[command(name = "pmp-data-layer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a new account
    Register(users::RegisterArgs),

    /// Check an email and password
    Login(users::LoginArgs),

    /// Show one account
    ShowUser(users::ShowUserArgs),

    /// List all accounts
    ListUsers,
}

/// Loads `.env` and configuration, starts logging and builds the services
pub(crate) async fn bootstrap() -> anyhow::Result<AppState> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    crate::create_app_state_with_config(&config).await
}
