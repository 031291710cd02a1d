//! Login, logout, profile and eligibility commands

use crate::error::CliResult;
use crate::output::{print_info, print_success, print_warning};
use portal_client::PortalClient;
use portal_types::{EligibilityCode, EligibilityDecision};

pub async fn login(client: &PortalClient, email: &str, password: Option<String>) -> CliResult<()> {
    let password = match password {
        Some(p) => p,
        None => dialoguer::Password::new()
            .with_prompt("Mot de passe")
            .interact()?,
    };

    let route = client.login(email, &password).await?;
    let name = client
        .session()
        .principal()
        .map(|p| p.display_name())
        .unwrap_or_default();
    print_success(&format!("Connecté en tant que {name}"));
    print_info(&format!("Espace: {route}"));
    Ok(())
}

pub async fn logout(client: &PortalClient) -> CliResult<()> {
    client.logout().await?;
    print_success("Session terminée");
    Ok(())
}

pub async fn whoami(client: &PortalClient) -> CliResult<()> {
    match client.session().principal() {
        Some(principal) => {
            println!("{} <{}>", principal.display_name(), principal.email);
            println!("Rôle: {}", principal.role.label());
            if let Some(program) = &principal.program {
                println!("Filière: {program}");
            }
        }
        None => print_warning("Aucune session active"),
    }
    Ok(())
}

pub async fn verify(client: &PortalClient, raw_code: &str) -> CliResult<()> {
    let code = EligibilityCode::parse(raw_code)?;
    match client.verify_code(&code).await? {
        EligibilityDecision::StartRegistration { prefill, .. } => {
            print_success("Code disponible: l'inscription peut commencer");
            if let Some(name) = prefill.last_name {
                print_info(&format!("Candidat: {name}"));
            }
        }
        EligibilityDecision::ResumeEnrollment { .. } => {
            print_success("Code reconnu: l'enrôlement peut reprendre");
        }
        EligibilityDecision::Blocked { message } => print_warning(&message),
        EligibilityDecision::Failed { message } => print_warning(&message),
    }
    Ok(())
}
