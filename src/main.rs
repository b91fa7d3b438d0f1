//! Rollcall - attendance and permission administration CLI
//!
//! Applies migrations, seeds the default role policy and answers permission
//! and access-code questions against a configured store.

#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use rollcall_rs::core::models::{CodeVerification, PermissionScopeRef};
use rollcall_rs::utils::logging::init_tracing;
use rollcall_rs::{AttendanceService, Config, Database, PermissionResolver, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "rollcall", version, about = "Attendance session and permission administration")]
struct Cli {
    /// YAML configuration file; environment variables are used when absent
    #[arg(short, long, env = "ROLLCALL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations
    Migrate,
    /// Insert the default permission catalog and role grants
    SeedPolicy,
    /// List the permission codes a user holds in a scope
    Permissions {
        user_id: i64,
        #[arg(long)]
        offering: Option<i64>,
        #[arg(long)]
        team: Option<i64>,
        /// Show the per-channel breakdown for one code instead
        #[arg(long)]
        code: Option<String>,
    },
    /// Check an access code the way a check-in would
    VerifyCode { code: String },
    /// Print row counts of the main tables
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };
    init_tracing(&config.logging)?;

    let db = Arc::new(Database::new(&config.database).await?);

    match cli.command {
        Command::Migrate => {
            db.migrate().await?;
            println!("Migrations applied");
        }
        Command::SeedPolicy => {
            db.migrate().await?;
            let summary = rollcall_rs::auth::rbac::seed_default_policy(&db).await?;
            println!(
                "Seeded {} permissions, {} new grants",
                summary.permissions, summary.new_grants
            );
        }
        Command::Permissions {
            user_id,
            offering,
            team,
            code,
        } => {
            let resolver = PermissionResolver::uncached(db.clone());
            match code {
                Some(code) => {
                    let grants = resolver
                        .channel_grants(user_id, &code, PermissionScopeRef::new(offering, team))
                        .await?;
                    println!(
                        "{}: global={} course={} team={} => {}",
                        code,
                        grants.global,
                        grants.course,
                        grants.team,
                        if grants.granted() { "granted" } else { "denied" }
                    );
                }
                None => {
                    for code in resolver.list_permission_codes(user_id, offering, team).await? {
                        println!("{}", code);
                    }
                }
            }
        }
        Command::VerifyCode { code } => {
            let service = AttendanceService::from_config(db.clone(), &config)?;
            match service.verify_access_code(&code).await? {
                CodeVerification::Valid(session) => println!(
                    "valid: session {} '{}' (offering {}, team {:?})",
                    session.id, session.title, session.offering_id, session.team_id
                ),
                CodeVerification::NotOpen(status) => println!("rejected: not_open ({})", status),
                other => println!("rejected: {}", other.reason().unwrap_or("invalid")),
            }
        }
        Command::Stats => {
            let stats = db.stats().await?;
            println!("users:           {}", stats.users);
            println!("offerings:       {}", stats.offerings);
            println!("active sessions: {}", stats.active_sessions);
            println!("permissions:     {}", stats.permissions);
        }
    }

    info!("Command completed");
    Ok(())
}
