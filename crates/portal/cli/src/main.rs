//! SGEE CLI - Terminal interface to the student enrollment portal
//!
//! This CLI covers the portal's flows end to end:
//! - Authentication and session persistence across invocations
//! - Quitus code verification
//! - Catalog browsing (diploma schemes, séries, filières, niveaux, ...)
//! - Enrollment submission from a draft file
//! - Dossier review for program managers
//! - Account administration

use clap::{Parser, Subcommand};
use portal_client::PortalClient;
use portal_session::{JsonFileCredentialStore, SessionStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{admin, auth, catalog, dossier, enroll};
use error::CliResult;

/// SGEE CLI application
#[derive(Parser)]
#[command(name = "sgee")]
#[command(about = "SGEE - student enrollment portal CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Portal backend endpoint
    #[arg(
        short,
        long,
        env = "SGEE_ENDPOINT",
        default_value = "http://localhost:8000"
    )]
    endpoint: String,

    /// Session file (defaults to the user configuration directory)
    #[arg(long, env = "SGEE_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email
        email: String,

        /// Password; prompted interactively when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// End the session
    Logout,

    /// Show the authenticated profile
    Whoami,

    /// Verify a quitus code
    Verify {
        /// 6-digit code from the payment receipt
        code: String,
    },

    /// Browse catalog lists
    Catalog {
        #[command(subcommand)]
        command: catalog::CatalogCommands,
    },

    /// Submit an enrollment dossier
    Enroll(enroll::EnrollArgs),

    /// Review dossiers (program managers)
    Dossier {
        #[command(subcommand)]
        command: dossier::DossierCommands,
    },

    /// Administer accounts (academic administrators)
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    // Open the persisted session and restore it without a network call.
    let session_path = match cli.session_file {
        Some(path) => path,
        None => JsonFileCredentialStore::default_path()?,
    };
    let storage = JsonFileCredentialStore::open(session_path)?;
    let session = Arc::new(SessionStore::new(Box::new(storage)));
    session.restore()?;

    let client = PortalClient::new(&cli.endpoint, session)?;

    match cli.command {
        Commands::Login { email, password } => auth::login(&client, &email, password).await,
        Commands::Logout => auth::logout(&client).await,
        Commands::Whoami => auth::whoami(&client).await,
        Commands::Verify { code } => auth::verify(&client, &code).await,
        Commands::Catalog { command } => catalog::execute(command, &client, cli.output).await,
        Commands::Enroll(args) => enroll::execute(args, &client).await,
        Commands::Dossier { command } => dossier::execute(command, &client, cli.output).await,
        Commands::Admin { command } => admin::execute(command, &client, cli.output).await,
    }
}
