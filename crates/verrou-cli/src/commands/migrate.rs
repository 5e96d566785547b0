//! Database migration commands.

use clap::{Args, Subcommand};
use sqlx::PgPool;

use verrou_database::migration;

use crate::output;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply all pending migrations
    Run,
    /// List embedded migrations and whether each is applied
    Status,
}

pub async fn execute(args: &MigrateArgs, pool: &PgPool) -> anyhow::Result<()> {
    match args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(pool).await?;
            output::print_success("All migrations applied.");
        }
        MigrateCommand::Status => {
            let status = migration::migration_status(pool).await?;
            let pending = status.iter().filter(|(_, _, applied)| !applied).count();
            for (version, description, applied) in &status {
                let state = if *applied { "applied" } else { "pending" };
                output::print_kv(&version.to_string(), &format!("{description} ({state})"));
            }
            if pending > 0 {
                output::print_warning(&format!("{pending} migration(s) pending"));
            } else {
                output::print_success("Database is up to date.");
            }
        }
    }
    Ok(())
}
