//! Authentication, account and eligibility endpoints

use crate::client::{MessageResponse, PortalClient};
use crate::error::{ClientError, ClientResult};
use portal_types::{
    CredentialPair, EligibilityCode, EligibilityDecision, EligibilityPrefill, EligibilityStatus,
    Principal,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(rename = "code_quitus", skip_serializing_if = "Option::is_none")]
    code: Option<&'a EligibilityCode>,
}

#[derive(Debug, Deserialize)]
struct TokenGrant {
    access: String,
    refresh: String,
    user: Principal,
}

/// New candidate account, created against a verified quitus code.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nom")]
    pub last_name: String,
    #[serde(rename = "prenom")]
    pub first_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "code_quitus")]
    pub code: EligibilityCode,
}

#[derive(Debug, Serialize)]
struct VerifyCodeRequest<'a> {
    code_quitus: &'a EligibilityCode,
}

#[derive(Debug, Deserialize)]
struct VerifyCodeResponse {
    status: EligibilityStatus,
    #[serde(default)]
    candidat: Option<EligibilityPrefill>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct LogoutRequest<'a> {
    refresh: &'a str,
}

impl PortalClient {
    /// Authenticate and commit the session. Returns the landing route for
    /// the authenticated role.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<&'static str> {
        self.login_with_code(email, password, None).await
    }

    /// Authenticate while binding a quitus code to the account in the same
    /// round-trip.
    pub async fn login_with_code(
        &self,
        email: &str,
        password: &str,
        code: Option<&EligibilityCode>,
    ) -> ClientResult<&'static str> {
        let grant: TokenGrant = self
            .post_public("/auth/login/", &LoginRequest { email, password, code })
            .await?;
        let route = self.session.commit_login(
            CredentialPair::new(grant.access, grant.refresh),
            grant.user,
        )?;
        info!(%route, "login committed");
        Ok(route)
    }

    /// Create a candidate account and log it in immediately.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<&'static str> {
        let grant: TokenGrant = self.post_public("/auth/register/", request).await?;
        let route = self.session.commit_login(
            CredentialPair::new(grant.access, grant.refresh),
            grant.user,
        )?;
        Ok(route)
    }

    /// End the session. The server-side revocation is best effort; the
    /// local session is cleared no matter what.
    pub async fn logout(&self) -> ClientResult<()> {
        if let Some(refresh) = self.session.refresh_token() {
            let result: ClientResult<MessageResponse> = self
                .post("/auth/logout/", &LogoutRequest { refresh: &refresh })
                .await;
            if let Err(err) = result {
                warn!(%err, "server-side logout failed, clearing local session anyway");
            }
        }
        self.session.clear();
        Ok(())
    }

    /// Fetch the authenticated profile and sync it into the session.
    pub async fn refresh_profile(&self) -> ClientResult<Principal> {
        let principal: Principal = self.get("/auth/profile/").await?;
        self.session.commit_profile(principal.clone())?;
        Ok(principal)
    }

    /// Verify a quitus code and decide which flow it opens.
    ///
    /// Expected rejections (invalid or unknown code) come back as
    /// [`EligibilityDecision::Failed`], not as an `Err`.
    pub async fn verify_code(&self, code: &EligibilityCode) -> ClientResult<EligibilityDecision> {
        let url = self.url("/auth/verify-quitus/");
        let request = VerifyCodeRequest { code_quitus: code };
        let response = self
            .send_authorized(|c| c.post(&url).json(&request))
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("detail")
                        .or_else(|| v.get("message"))
                        .and_then(|d| d.as_str())
                        .map(String::from)
                })
                .unwrap_or_else(|| "Impossible de vérifier le code.".to_string());
            return Ok(EligibilityDecision::Failed { message });
        }

        let verdict: VerifyCodeResponse = response.json().await.map_err(ClientError::from)?;
        Ok(EligibilityDecision::from_status(
            verdict.status,
            code.clone(),
            verdict.candidat.unwrap_or_default(),
            verdict.message,
        ))
    }
}
