//! HTTP client for the SGEE portal backend
//!
//! All authorized traffic funnels through [`PortalClient::send_authorized`],
//! which owns the expired-token protocol: on a 401 the client performs one
//! refresh round-trip, retries the original request once with the new access
//! token, and on any refresh failure clears the session so the caller can
//! send the user back to the login screen.

use crate::error::{ClientError, ClientResult};
use portal_session::SessionStore;
use portal_types::ValidationReport;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for communicating with the portal backend.
pub struct PortalClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) session: Arc<SessionStore>,
    /// Serializes refresh attempts: concurrent 401s must produce a single
    /// refresh round-trip, not one per request.
    refresh_gate: tokio::sync::Mutex<()>,
}

/// Generic `{"message": ...}` acknowledgement body.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// List endpoints answer either a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Paged { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Paged { results } => results,
            ListEnvelope::Bare(items) => items,
        }
    }
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

impl PortalClient {
    /// Create a new portal client sharing the given session store.
    pub fn new(endpoint: &str, session: Arc<SessionStore>) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: endpoint.trim_end_matches('/').to_string(),
            session,
            refresh_gate: tokio::sync::Mutex::new(()),
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ========== Authorized transport ==========

    /// Send a request with the current access token, replaying it once after
    /// a refresh if the server answers 401.
    ///
    /// The request is described by a builder closure rather than a finished
    /// request so the retry can rebuild non-cloneable bodies (multipart).
    pub(crate) async fn send_authorized<F>(&self, build: F) -> ClientResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let stale = self.session.access_token();
        let mut request = build(&self.http);
        if let Some(token) = &stale {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let fresh = self.refresh_access(stale).await?;
        debug!("retrying request with refreshed access token");
        let retry = build(&self.http).bearer_auth(fresh).send().await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!("request still unauthorized after refresh, clearing session");
            self.session.clear();
            return Err(ClientError::SessionExpired);
        }
        Ok(retry)
    }

    /// Exchange the refresh token for a new access token. Exactly one
    /// refresh round-trip runs at a time; a waiter whose token was already
    /// rotated by the winner reuses the rotated token.
    async fn refresh_access(&self, stale: Option<String>) -> ClientResult<String> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.session.access_token();
        if current != stale {
            if let Some(token) = current {
                return Ok(token);
            }
        }

        let Some(refresh) = self.session.refresh_token() else {
            self.session.clear();
            return Err(ClientError::SessionExpired);
        };

        let response = self
            .http
            .post(self.url("/auth/refresh/"))
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "token refresh rejected, clearing session");
            self.session.clear();
            return Err(ClientError::SessionExpired);
        }

        let body: RefreshResponse = response.json().await?;
        self.session.rotate_access(&body.access)?;
        Ok(body.access)
    }

    // ========== Internal HTTP helpers ==========

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        let response = self.send_authorized(|c| c.get(&url)).await?;
        self.handle_response(response).await
    }

    pub(crate) async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Vec<T>> {
        let envelope: ListEnvelope<T> = self.get(path).await?;
        Ok(envelope.into_vec())
    }

    /// GET a list with query parameters. Encoding is left to reqwest, so
    /// values may contain `&`, `=` or spaces without corrupting the URL.
    pub(crate) async fn get_list_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<Vec<T>> {
        let url = self.url(path);
        let response = self.send_authorized(|c| c.get(&url).query(query)).await?;
        let envelope: ListEnvelope<T> = self.handle_response(response).await?;
        Ok(envelope.into_vec())
    }

    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        let response = self.send_authorized(|c| c.post(&url).json(body)).await?;
        self.handle_response(response).await
    }

    pub(crate) async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        let response = self.send_authorized(|c| c.put(&url).json(body)).await?;
        self.handle_response(response).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path);
        let response = self.send_authorized(|c| c.delete(&url)).await?;
        self.handle_response(response).await
    }

    pub(crate) async fn delete_with_body<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path);
        let response = self.send_authorized(|c| c.delete(&url).json(body)).await?;
        self.handle_response(response).await
    }

    /// Post without attaching credentials. Login, registration and token
    /// refresh use this path.
    pub(crate) async fn post_public<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        self.handle_response(response).await
    }

    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else if status == StatusCode::NOT_FOUND {
            Err(ClientError::NotFound("resource not found".into()))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(error_from_body(status, body))
        }
    }
}

/// A 400 whose body is a plain JSON object of field messages is a serializer
/// rejection; anything else is an opaque API error, with DRF's `detail`
/// field unwrapped when present.
fn error_from_body(status: StatusCode, body: String) -> ClientError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(&body).ok();

    if status == StatusCode::BAD_REQUEST {
        if let Some(value) = &parsed {
            if value.as_object().is_some_and(|map| !map.contains_key("detail")) {
                return ClientError::Validation(ValidationReport::from_server_payload(value));
            }
        }
    }

    let message = parsed
        .as_ref()
        .and_then(|v| v.get("detail"))
        .and_then(|d| d.as_str())
        .map(String::from)
        .unwrap_or(body);
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
