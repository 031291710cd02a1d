//! Catalog browsing commands

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Subcommand;
use portal_client::PortalClient;
use portal_types::OptionId;
use serde::Serialize;
use tabled::Tabled;

/// Catalog subcommands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List diploma schemes (BAC, GCE, ...)
    Bacs,

    /// List the séries of a diploma scheme
    Series {
        /// Diploma scheme id
        bac_id: i64,
    },

    /// List the filières open to a série
    Filieres {
        /// Série id
        serie_id: i64,
    },

    /// List the niveaux of a filière within a série
    Niveaux {
        /// Série id
        serie_id: i64,
        /// Filière id
        filiere_id: i64,
    },

    /// List diploma mentions
    Mentions,

    /// List exam centers
    CentresExamen,

    /// List deposit centers
    CentresDepot,

    /// List regions
    Regions,

    /// List departments, optionally for one region
    Departements {
        /// Region id
        #[arg(long)]
        region: Option<i64>,
    },
}

/// Table row for coded catalog options
#[derive(Debug, Serialize, Tabled)]
struct OptionRow {
    id: String,
    code: String,
    libelle: String,
}

/// Table row for named divisions (regions, departments)
#[derive(Debug, Serialize, Tabled)]
struct NameRow {
    id: String,
    nom: String,
}

pub async fn execute(
    command: CatalogCommands,
    client: &PortalClient,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        CatalogCommands::Bacs => {
            let rows: Vec<OptionRow> = client
                .exam_types()
                .await?
                .into_iter()
                .map(|e| OptionRow {
                    id: e.id.to_string(),
                    code: e.code,
                    libelle: e.label,
                })
                .collect();
            output::print_output(&rows, format);
        }
        CatalogCommands::Series { bac_id } => {
            let rows: Vec<OptionRow> = client
                .tracks_of(OptionId::new(bac_id))
                .await?
                .into_iter()
                .map(|t| OptionRow {
                    id: t.id.to_string(),
                    code: t.code,
                    libelle: t.label,
                })
                .collect();
            output::print_output(&rows, format);
        }
        CatalogCommands::Filieres { serie_id } => {
            let rows: Vec<OptionRow> = client
                .programs_of(OptionId::new(serie_id))
                .await?
                .into_iter()
                .map(|p| OptionRow {
                    id: p.id.to_string(),
                    code: p.code,
                    libelle: p.label,
                })
                .collect();
            output::print_output(&rows, format);
        }
        CatalogCommands::Niveaux {
            serie_id,
            filiere_id,
        } => {
            let rows: Vec<OptionRow> = client
                .levels_of(OptionId::new(serie_id), OptionId::new(filiere_id))
                .await?
                .into_iter()
                .map(|l| OptionRow {
                    id: l.id.to_string(),
                    code: l.code,
                    libelle: l.label,
                })
                .collect();
            output::print_output(&rows, format);
        }
        CatalogCommands::Mentions => {
            let rows: Vec<NameRow> = client
                .mentions()
                .await?
                .into_iter()
                .map(|m| NameRow {
                    id: m.id.to_string(),
                    nom: m.label,
                })
                .collect();
            output::print_output(&rows, format);
        }
        CatalogCommands::CentresExamen => {
            let rows = center_rows(client.exam_centers().await?);
            output::print_output(&rows, format);
        }
        CatalogCommands::CentresDepot => {
            let rows = center_rows(client.deposit_centers().await?);
            output::print_output(&rows, format);
        }
        CatalogCommands::Regions => {
            let rows: Vec<NameRow> = client
                .regions()
                .await?
                .into_iter()
                .map(|r| NameRow {
                    id: r.id.to_string(),
                    nom: r.name,
                })
                .collect();
            output::print_output(&rows, format);
        }
        CatalogCommands::Departements { region } => {
            let rows: Vec<NameRow> = client
                .departments(region.map(OptionId::new))
                .await?
                .into_iter()
                .map(|d| NameRow {
                    id: d.id.to_string(),
                    nom: d.name,
                })
                .collect();
            output::print_output(&rows, format);
        }
    }
    Ok(())
}

#[derive(Debug, Serialize, Tabled)]
struct CenterRow {
    id: String,
    code: String,
    nom: String,
    ville: String,
}

fn center_rows(centers: Vec<portal_types::Center>) -> Vec<CenterRow> {
    centers
        .into_iter()
        .map(|c| CenterRow {
            id: c.id.to_string(),
            code: c.code,
            nom: c.name,
            ville: c.city,
        })
        .collect()
}
