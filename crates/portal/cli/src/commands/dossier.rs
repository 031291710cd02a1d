//! Dossier review commands for program managers

use crate::commands::require_role;
use crate::error::{CliError, CliResult};
use crate::output::{self, print_success, OutputFormat};
use clap::Subcommand;
use portal_client::{CandidateFilter, PortalClient};
use portal_types::{DossierId, DossierStatus, Role};
use serde::Serialize;
use tabled::Tabled;

/// Dossier subcommands
#[derive(Subcommand)]
pub enum DossierCommands {
    /// Per-status dossier counts for your filière
    Stats,

    /// List the candidates of your filière
    List {
        /// Filter by status (en_attente, complet, valide, rejete)
        #[arg(short, long)]
        statut: Option<String>,

        /// Free-text search on name or matricule
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one dossier in full
    Show {
        /// Dossier id
        id: i64,
    },

    /// Validate a dossier
    Validate {
        /// Dossier id
        id: i64,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Reject a dossier; a reason is mandatory
    Reject {
        /// Dossier id
        id: i64,

        /// Rejection reason shown to the candidate
        #[arg(short, long)]
        motif: String,

        /// Skip confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Table row for candidate lists
#[derive(Debug, Serialize, Tabled)]
struct CandidateRow {
    id: String,
    matricule: String,
    nom: String,
    prenom: String,
    statut: String,
    soumis: String,
}

fn parse_status(raw: &str) -> CliResult<DossierStatus> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| CliError::InvalidInput(format!("statut inconnu: {raw}")))
}

fn confirm(prompt: &str, yes: bool) -> CliResult<bool> {
    if yes {
        return Ok(true);
    }
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

pub async fn execute(
    command: DossierCommands,
    client: &PortalClient,
    format: OutputFormat,
) -> CliResult<()> {
    require_role(client.session(), &[Role::ProgramManager])?;

    match command {
        DossierCommands::Stats => {
            let stats = client.dashboard_stats().await?;
            output::print_single(&stats);
        }
        DossierCommands::List { statut, search } => {
            let filter = CandidateFilter {
                status: statut.as_deref().map(parse_status).transpose()?,
                search,
            };
            let rows: Vec<CandidateRow> = client
                .my_candidates(&filter)
                .await?
                .into_iter()
                .map(|c| CandidateRow {
                    id: c.id.to_string(),
                    matricule: c.matricule.unwrap_or_default(),
                    nom: c.last_name,
                    prenom: c.first_name,
                    statut: c.status.label().to_string(),
                    soumis: c
                        .submitted_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default(),
                })
                .collect();
            output::print_output(&rows, format);
        }
        DossierCommands::Show { id } => {
            let detail = client.candidate_detail(DossierId::new(id)).await?;
            output::print_single(&detail);
        }
        DossierCommands::Validate { id, yes } => {
            if confirm(&format!("Valider le dossier {id} ?"), yes)? {
                let message = client.validate_dossier(DossierId::new(id)).await?;
                print_success(&message);
            }
        }
        DossierCommands::Reject { id, motif, yes } => {
            if confirm(&format!("Rejeter le dossier {id} ?"), yes)? {
                let message = client.reject_dossier(DossierId::new(id), &motif).await?;
                print_success(&message);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_wire_names() {
        assert_eq!(parse_status("en_attente").unwrap(), DossierStatus::Pending);
        assert_eq!(parse_status("valide").unwrap(), DossierStatus::Validated);
        assert!(parse_status("inconnu").is_err());
    }
}
