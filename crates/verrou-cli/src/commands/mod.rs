//! CLI command definitions and dispatch.

pub mod admin;
pub mod logs;
pub mod migrate;
pub mod seed;
pub mod user;

use anyhow::Context;
use clap::{Parser, Subcommand};
use sqlx::PgPool;

use verrou_core::config::AppConfig;
use verrou_database::DatabasePool;

use crate::output::OutputFormat;

/// Verrou administration tool.
#[derive(Debug, Parser)]
#[command(name = "verrou", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (`config/<env>.toml`); falls back to `VERROU_ENV`
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Seed reference data
    Seed(seed::SeedArgs),
    /// Administrator accounts
    Admin(admin::AdminArgs),
    /// User inspection
    User(user::UserArgs),
    /// Audit log inspection and cleanup
    Logs(logs::LogsArgs),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let pool = connect(&config).await?;

        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &pool).await,
            Commands::Seed(args) => seed::execute(args, &pool).await,
            Commands::Admin(args) => admin::execute(args, &config, &pool).await,
            Commands::User(args) => user::execute(args, &pool, self.format).await,
            Commands::Logs(args) => logs::execute(args, &pool, self.format).await,
        }
    }

    fn environment(&self) -> String {
        self.env
            .clone()
            .or_else(|| std::env::var("VERROU_ENV").ok())
            .unwrap_or_else(|| "development".to_string())
    }

    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let env = self.environment();
        AppConfig::load(&env).with_context(|| format!("Failed to load configuration for '{env}'"))
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = DatabasePool::connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    Ok(pool.into_pool())
}

/// Ask for a yes/no confirmation unless `assume_yes` is set.
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_logs_cleanup_with_days() {
        let cli = Cli::try_parse_from(["verrou", "logs", "cleanup", "--days", "30", "--yes"]).unwrap();
        match cli.command {
            Commands::Logs(logs::LogsArgs {
                command: logs::LogsCommand::Cleanup { days, yes },
            }) => {
                assert_eq!(days, 30);
                assert!(yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn logs_cleanup_rejects_out_of_range_days() {
        for days in ["0", "36501", "9999999999999"] {
            let parsed = Cli::try_parse_from(["verrou", "logs", "cleanup", "--days", days, "--yes"]);
            assert!(parsed.is_err(), "--days {days} was accepted");
        }
    }

    #[test]
    fn explicit_env_wins() {
        let cli = Cli::try_parse_from(["verrou", "--env", "staging", "migrate", "status"]).unwrap();
        assert_eq!(cli.environment(), "staging");
    }

    #[test]
    fn json_format_is_accepted() {
        let cli = Cli::try_parse_from(["verrou", "-f", "json", "user", "list"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
