//! `mro`: admin CLI for role assignments and feature access.
//!
//! Talks to the same backend as the web app, configured from `.env`,
//! `.env.local` and the process environment.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mro_core::exit_code;

/// MRO admin CLI.
#[derive(Parser, Debug)]
#[command(name = "mro", about = "MRO role and access administration")]
struct Cli {
    /// Directory holding `.env` / `.env.local` (default: current directory).
    #[arg(long = "env-dir", global = true, default_value = ".")]
    env_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Role assignments.
    Roles {
        #[command(subcommand)]
        action: RolesAction,
    },

    /// Feature access checks.
    Access {
        #[command(subcommand)]
        action: AccessAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum RolesAction {
    /// List a user's roles.
    List { user_id: String },
    /// Grant a system role (e.g. `admin`), or a custom role by name or id.
    Assign { user_id: String, role: String },
    /// Revoke a system role, or a custom role by name or id.
    Remove { user_id: String, role: String },
}

#[derive(Subcommand, Debug)]
enum AccessAction {
    /// List the features a user can use.
    Features { user_id: String },
    /// Check feature access. Exits 3 when denied.
    Check {
        user_id: String,
        /// Feature names (e.g. `batchManagement`).
        #[arg(required = true)]
        features: Vec<String>,
        /// Require every feature instead of any one.
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    mro_core::init_logging("warn");
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code::FAILURE as u8)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    if let Commands::Version = cli.command {
        println!("mro cli v{}", env!("CARGO_PKG_VERSION"));
        return Ok(exit_code::OK);
    }
    let service = commands::connect(&cli.env_dir)?;

    match cli.command {
        Commands::Roles { action } => match action {
            RolesAction::List { user_id } => commands::roles::list(&service, &user_id).await,
            RolesAction::Assign { user_id, role } => {
                commands::roles::assign(&service, &user_id, &role).await
            }
            RolesAction::Remove { user_id, role } => {
                commands::roles::remove(&service, &user_id, &role).await
            }
        },
        Commands::Access { action } => match action {
            AccessAction::Features { user_id } => {
                commands::access::features(&service, &user_id).await
            }
            AccessAction::Check {
                user_id,
                features,
                all,
            } => commands::access::check(&service, &user_id, &features, all).await,
        },
        Commands::Version => Ok(exit_code::OK),
    }
}
