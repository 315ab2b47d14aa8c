//! CLI command definitions.

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use uuid::Uuid;

use orgdir_core::organisation::{CreateOrganisation, UpdateOrganisation};
use orgdir_core::user::{CreateUser, UpdateUser};

use crate::config::{CacheBackend, Config, StorageBackend};
use crate::seed;
use crate::state::AppState;

/// orgdir - Multi-tenant organisation and user directory
#[derive(Debug, Parser)]
#[command(name = "orgdir")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Storage backend (overrides STORAGE_BACKEND).
    #[arg(long, global = true, value_enum)]
    pub storage: Option<StorageBackend>,

    /// Cache backend (overrides CACHE_BACKEND).
    #[arg(long, global = true, value_enum)]
    pub cache: Option<CacheBackend>,

    /// Emit logs as JSON.
    #[arg(long, global = true, env = "LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Applies the backend flags on top of the environment configuration.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(storage) = self.storage {
            config.storage_backend = storage;
        }
        if let Some(cache) = self.cache {
            config.cache_backend = cache;
        }
        config
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP API server.
    Serve(ServeCommand),
    /// Organisation management.
    #[command(alias = "orgs")]
    Organisations(OrganisationsCommand),
    /// User management.
    Users(UsersCommand),
    /// Fill the directory with synthetic data.
    Seed(SeedCommand),
}

/// Server options.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    pub port: u16,
}

/// Seed options.
#[derive(Debug, Args)]
pub struct SeedCommand {
    /// Number of organisations to create.
    #[arg(long, default_value = "5")]
    pub organisations: usize,

    /// Number of users to create in each organisation.
    #[arg(long, default_value = "10")]
    pub users_per_organisation: usize,
}

impl SeedCommand {
    pub async fn run(self, state: &AppState) -> Result<()> {
        let report = seed::seed(state, self.organisations, self.users_per_organisation).await?;
        println!(
            "Created {} organisations and {} users ({} skipped)",
            report.organisations, report.users, report.skipped
        );
        Ok(())
    }
}

/// Organisation management commands.
#[derive(Debug, Parser)]
pub struct OrganisationsCommand {
    #[command(subcommand)]
    pub action: OrganisationsAction,
}

/// Available organisation actions.
#[derive(Debug, Subcommand)]
pub enum OrganisationsAction {
    /// List organisations, sorted by name.
    List {
        /// Show at most this many organisations.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Create an organisation.
    Add {
        name: String,
        email: String,
        /// Create the organisation as inactive.
        #[arg(long)]
        inactive: bool,
    },
    /// Update an organisation.
    Update {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[command(flatten)]
        activity: ActivityFlags,
    },
    /// Delete an organisation and all of its users.
    Delete { id: Uuid },
}

impl OrganisationsCommand {
    pub async fn run(self, state: &AppState) -> Result<()> {
        let organisations = &state.organisations;

        match self.action {
            OrganisationsAction::List { limit } => {
                let mut all = organisations.get_organisations().await?;
                if let Some(limit) = limit {
                    all.truncate(limit);
                }
                print_json(&all)?;
            }
            OrganisationsAction::Add {
                name,
                email,
                inactive,
            } => {
                let request = CreateOrganisation::new(name, email).with_active(!inactive);
                let id = organisations.add_organisation(request).await?;
                println!("{id}");
            }
            OrganisationsAction::Update {
                id,
                name,
                email,
                activity,
            } => {
                let request = UpdateOrganisation {
                    name,
                    email,
                    is_active: activity.value(),
                };
                if request.is_empty() {
                    bail!("Nothing to update: pass --name, --email, --active or --inactive");
                }
                let updated = organisations.update_organisation(id, request).await?;
                print_json(&updated)?;
            }
            OrganisationsAction::Delete { id } => {
                organisations.delete_organisation(id).await?;
                println!("Deleted organisation {id}");
            }
        }

        Ok(())
    }
}

/// User management commands.
#[derive(Debug, Parser)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// Available user actions.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// List the users of an organisation.
    List { organisation_id: Uuid },
    /// Create a user.
    Add {
        organisation_id: Uuid,
        first_name: String,
        last_name: String,
        email: String,
        /// Create the user as inactive.
        #[arg(long)]
        inactive: bool,
    },
    /// Update a user.
    Update {
        organisation_id: Uuid,
        id: Uuid,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[command(flatten)]
        activity: ActivityFlags,
    },
    /// Delete a user.
    Delete { organisation_id: Uuid, id: Uuid },
}

impl UsersCommand {
    pub async fn run(self, state: &AppState) -> Result<()> {
        let users = &state.users;

        match self.action {
            UsersAction::List { organisation_id } => {
                print_json(&users.get_users(organisation_id).await?)?;
            }
            UsersAction::Add {
                organisation_id,
                first_name,
                last_name,
                email,
                inactive,
            } => {
                let request = CreateUser::new(first_name, last_name, email).with_active(!inactive);
                let id = users.add_user(organisation_id, request).await?;
                println!("{id}");
            }
            UsersAction::Update {
                organisation_id,
                id,
                first_name,
                last_name,
                email,
                activity,
            } => {
                let request = UpdateUser {
                    first_name,
                    last_name,
                    email,
                    is_active: activity.value(),
                };
                if request.is_empty() {
                    bail!(
                        "Nothing to update: pass --first-name, --last-name, --email, \
                         --active or --inactive"
                    );
                }
                let updated = users.update_user(organisation_id, id, request).await?;
                print_json(&updated)?;
            }
            UsersAction::Delete {
                organisation_id,
                id,
            } => {
                users.delete_user(organisation_id, id).await?;
                println!("Deleted user {id}");
            }
        }

        Ok(())
    }
}

/// Mutually exclusive `--active` / `--inactive` switches.
#[derive(Debug, Args)]
pub struct ActivityFlags {
    /// Mark as active.
    #[arg(long, conflicts_with = "inactive")]
    pub active: bool,
    /// Mark as inactive.
    #[arg(long)]
    pub inactive: bool,
}

impl ActivityFlags {
    /// The requested active flag, if either switch was given.
    pub fn value(&self) -> Option<bool> {
        match (self.active, self.inactive) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
