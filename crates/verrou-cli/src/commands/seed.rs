//! Reference data seeding.

use clap::{Args, Subcommand};
use sqlx::PgPool;

use verrou_database::repositories::RoleRepository;

use crate::output;

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Insert the built-in roles that are missing
    Roles,
}

pub async fn execute(args: &SeedArgs, pool: &PgPool) -> anyhow::Result<()> {
    match args.command {
        SeedCommand::Roles => {
            let created = RoleRepository::new(pool.clone()).seed().await?;
            if created == 0 {
                output::print_success("All roles already present.");
            } else {
                output::print_success(&format!("Created {created} role(s)."));
            }
        }
    }
    Ok(())
}
