//! Administrator bootstrap.

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use sqlx::PgPool;

use verrou_auth::{PasswordHasher, PasswordValidator};
use verrou_core::config::AppConfig;
use verrou_core::text::generate_pseudo;
use verrou_database::repositories::{RoleRepository, UserRepository};
use verrou_entity::role::RoleName;
use verrou_entity::user::CreateUser;

use crate::output;

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create an account with the admin role
    Create {
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
        /// Given name
        #[arg(long)]
        first_name: Option<String>,
        /// Family name
        #[arg(long)]
        last_name: Option<String>,
        /// Phone number
        #[arg(long)]
        phone: Option<String>,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

pub async fn execute(args: &AdminArgs, config: &AppConfig, pool: &PgPool) -> anyhow::Result<()> {
    match &args.command {
        AdminCommand::Create {
            email,
            first_name,
            last_name,
            phone,
            password,
        } => {
            let email = prompt_or(email, "Admin email")?.trim().to_lowercase();
            let first_name = prompt_or(first_name, "First name")?;
            let last_name = prompt_or(last_name, "Last name")?;
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Admin password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .context("Failed to read password")?,
            };

            PasswordValidator::new(&config.auth).validate(&password)?;

            let user_repo = UserRepository::new(pool.clone());
            if user_repo.email_taken(&email, None).await? {
                bail!("A user with email '{email}' already exists");
            }

            let role_repo = RoleRepository::new(pool.clone());
            let role = match role_repo.find_by_name(RoleName::Admin).await? {
                Some(role) => role,
                None => {
                    role_repo.seed().await?;
                    role_repo
                        .find_by_name(RoleName::Admin)
                        .await?
                        .context("Admin role is missing after seeding")?
                }
            };

            let password_hash = PasswordHasher::new().hash_password(&password)?;
            let user = user_repo
                .create(&CreateUser {
                    first_name,
                    last_name,
                    pseudo: generate_pseudo(),
                    email: email.clone(),
                    phone: phone.clone(),
                    password_hash,
                    role_id: role.id,
                })
                .await?;

            output::print_success(&format!("Admin '{email}' created"));
            output::print_kv("id", &user.id.to_string());
            output::print_kv("pseudo", &user.pseudo);
        }
    }
    Ok(())
}

fn prompt_or(value: &Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(v) => Ok(v.clone()),
        None => dialoguer::Input::new()
            .with_prompt(prompt)
            .interact_text()
            .with_context(|| format!("Failed to read {prompt}")),
    }
}
