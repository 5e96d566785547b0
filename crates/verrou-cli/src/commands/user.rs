//! User inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use sqlx::PgPool;
use tabled::Tabled;

use verrou_core::types::PageQuery;
use verrou_database::repositories::UserRepository;
use verrou_entity::user::UserWithRole;

use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users, newest first
    List {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 20)]
        limit: u64,
        /// Match against names, pseudo, email and phone
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    pseudo: String,
    name: String,
    email: String,
    role: String,
    active: bool,
    verified: bool,
    created_at: String,
}

impl From<&UserWithRole> for UserRow {
    fn from(u: &UserWithRole) -> Self {
        Self {
            id: u.user.id.to_string(),
            pseudo: u.user.pseudo.clone(),
            name: u.user.full_name(),
            email: u.user.email.clone(),
            role: u.role_name.to_string(),
            active: u.user.is_active,
            verified: u.user.is_verified,
            created_at: u.user.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

pub async fn execute(args: &UserArgs, pool: &PgPool, format: OutputFormat) -> anyhow::Result<()> {
    match &args.command {
        UserCommand::List {
            page,
            limit,
            search,
        } => {
            let mut query = PageQuery::new(*page, *limit);
            if let Some(term) = search {
                query = query.with_search(term.clone());
            }
            let result = UserRepository::new(pool.clone()).list(&query).await?;
            let rows: Vec<UserRow> = result.items.iter().map(UserRow::from).collect();
            output::print_list(&rows, format);
            if format == OutputFormat::Table {
                println!(
                    "Page {}/{} ({} users)",
                    result.meta.page, result.meta.total_pages, result.meta.total
                );
            }
        }
    }
    Ok(())
}
