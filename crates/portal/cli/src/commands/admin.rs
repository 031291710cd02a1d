//! Account administration commands

use crate::commands::require_role;
use crate::error::{CliError, CliResult};
use crate::output::{self, print_success, OutputFormat};
use clap::Subcommand;
use portal_client::{NewUser, PortalClient, UserFilter, UserUpdate};
use portal_types::{OptionId, Role, UserId};
use serde::Serialize;
use tabled::Tabled;

/// Admin subcommands
#[derive(Subcommand)]
pub enum AdminCommands {
    /// List accounts
    Users {
        /// Only accounts with this role
        #[arg(long)]
        role: Option<String>,

        /// Only enabled (true) or disabled (false) accounts
        #[arg(long)]
        actif: Option<bool>,

        /// Free-text search on name and email
        #[arg(long)]
        search: Option<String>,
    },

    /// Create an account
    CreateUser {
        #[arg(long)]
        email: String,

        /// Role (candidat, responsable_filiere, admin_academique, super_admin)
        #[arg(long)]
        role: String,

        #[arg(long)]
        nom: String,

        #[arg(long)]
        prenom: String,

        /// Filière id, for program-manager accounts
        #[arg(long)]
        filiere: Option<i64>,
    },

    /// Update an account's profile or role
    UpdateUser {
        id: i64,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        nom: Option<String>,

        #[arg(long)]
        prenom: Option<String>,

        #[arg(long)]
        filiere: Option<i64>,
    },

    /// Flip an account between enabled and disabled
    ToggleActive { id: i64 },

    /// Trigger a password reset
    ResetPassword { id: i64 },

    /// Delete an account; a reason is mandatory
    DeleteUser {
        id: i64,

        /// Audit reason for the deletion
        #[arg(short, long)]
        motif: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Portal-wide statistics
    Stats,

    /// Audit trail of administrative actions
    Logs,
}

/// Table row for account lists
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    email: String,
    role: String,
    nom: String,
    prenom: String,
    actif: String,
}

fn parse_role(raw: &str) -> CliResult<Role> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| CliError::InvalidInput(format!("rôle inconnu: {raw}")))
}

pub async fn execute(
    command: AdminCommands,
    client: &PortalClient,
    format: OutputFormat,
) -> CliResult<()> {
    require_role(
        client.session(),
        &[Role::AcademicAdmin, Role::SuperAdmin],
    )?;

    match command {
        AdminCommands::Users { role, actif, search } => {
            let filter = UserFilter {
                role: role.as_deref().map(parse_role).transpose()?,
                active: actif,
                search,
            };
            let rows: Vec<UserRow> = client
                .list_users(&filter)
                .await?
                .into_iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    email: u.email,
                    role: u.role.label().to_string(),
                    nom: u.last_name,
                    prenom: u.first_name,
                    actif: if u.active { "oui" } else { "non" }.to_string(),
                })
                .collect();
            output::print_output(&rows, format);
        }
        AdminCommands::CreateUser {
            email,
            role,
            nom,
            prenom,
            filiere,
        } => {
            let password = dialoguer::Password::new()
                .with_prompt("Mot de passe initial")
                .with_confirmation("Confirmez", "Les mots de passe diffèrent")
                .interact()?;
            let created = client
                .create_user(&NewUser {
                    email,
                    role: parse_role(&role)?,
                    last_name: nom,
                    first_name: prenom,
                    password,
                    program_id: filiere.map(OptionId::new),
                })
                .await?;
            print_success(&format!("Compte {} créé (id {})", created.email, created.id));
        }
        AdminCommands::UpdateUser {
            id,
            email,
            role,
            nom,
            prenom,
            filiere,
        } => {
            let update = UserUpdate {
                email,
                last_name: nom,
                first_name: prenom,
                role: role.as_deref().map(parse_role).transpose()?,
                program_id: filiere.map(OptionId::new),
            };
            let updated = client.update_user(UserId::new(id), &update).await?;
            print_success(&format!("Compte {} mis à jour", updated.email));
        }
        AdminCommands::ToggleActive { id } => {
            let user = client.toggle_user_active(UserId::new(id)).await?;
            let state = if user.active { "activé" } else { "désactivé" };
            print_success(&format!("Compte {} {state}", user.email));
        }
        AdminCommands::ResetPassword { id } => {
            let message = client.reset_user_password(UserId::new(id)).await?;
            print_success(&message);
        }
        AdminCommands::DeleteUser { id, motif, yes } => {
            let confirmed = yes
                || dialoguer::Confirm::new()
                    .with_prompt(format!("Supprimer définitivement le compte {id} ?"))
                    .default(false)
                    .interact()?;
            if confirmed {
                let message = client.delete_user(UserId::new(id), &motif).await?;
                print_success(&message);
            }
        }
        AdminCommands::Stats => {
            let stats = client.admin_statistics().await?;
            output::print_single(&stats);
        }
        AdminCommands::Logs => {
            let logs = client.action_logs().await?;
            output::print_single(&logs);
        }
    }
    Ok(())
}
