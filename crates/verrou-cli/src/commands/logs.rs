//! Audit log inspection and retention.

use clap::{Args, Subcommand};
use serde::Serialize;
use sqlx::PgPool;
use tabled::Tabled;

use verrou_core::types::{Filter, FilterValue, PageQuery};
use verrou_database::repositories::{LogRepository, MAX_RETENTION_DAYS};
use verrou_entity::log::{Log, LogAction};

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// Show recent entries
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 20)]
        limit: u64,
        /// CREATE, UPDATE or DELETE
        #[arg(short, long)]
        action: Option<LogAction>,
    },
    /// Delete entries older than the given number of days
    Cleanup {
        #[arg(
            short,
            long,
            default_value_t = 90,
            value_parser = clap::value_parser!(i64).range(1..=MAX_RETENTION_DAYS)
        )]
        days: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct LogRow {
    created_at: String,
    action: String,
    entity: String,
    entity_id: String,
    user_id: String,
    ip: String,
}

impl From<&Log> for LogRow {
    fn from(log: &Log) -> Self {
        Self {
            created_at: log.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            action: log.action.to_string(),
            entity: log.entity.to_string(),
            entity_id: log.entity_id.map(|id| id.to_string()).unwrap_or_default(),
            user_id: log.user_id.map(|id| id.to_string()).unwrap_or_default(),
            ip: log.ip_address.clone().unwrap_or_default(),
        }
    }
}

pub async fn execute(args: &LogsArgs, pool: &PgPool, format: OutputFormat) -> anyhow::Result<()> {
    let repo = LogRepository::new(pool.clone());

    match &args.command {
        LogsCommand::List {
            page,
            limit,
            action,
        } => {
            let filter = match action {
                Some(action) => Filter::new().eq(
                    "action::text",
                    FilterValue::String(action.as_str().to_string()),
                ),
                None => Filter::new(),
            };
            let result = repo.list(&filter, &PageQuery::new(*page, *limit)).await?;
            let rows: Vec<LogRow> = result.items.iter().map(LogRow::from).collect();
            output::print_list(&rows, format);
        }
        LogsCommand::Cleanup { days, yes } => {
            let prompt = format!("Delete audit entries older than {days} days?");
            if !super::confirm(&prompt, *yes)? {
                output::print_warning("Cancelled.");
                return Ok(());
            }
            let deleted = repo.delete_older_than(*days).await?;
            output::print_success(&format!("Deleted {deleted} audit entries."));
        }
    }
    Ok(())
}
