//! End-to-end client flows against a mock backend

use portal_client::{CandidateFilter, ClientError, PortalClient, UserFilter};
use portal_session::{InMemoryCredentialStore, SessionStore};
use portal_types::{
    CredentialPair, DossierId, DossierStatus, EligibilityCode, EligibilityDecision, Principal,
    Role, UserId,
};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn principal(role: Role) -> Principal {
    Principal {
        id: UserId::new(7),
        email: "user@example.cm".into(),
        role,
        last_name: "Nana".into(),
        first_name: "Brice".into(),
        program: None,
    }
}

fn session() -> Arc<SessionStore> {
    Arc::new(SessionStore::new(Box::new(InMemoryCredentialStore::new())))
}

fn logged_in_session(role: Role) -> Arc<SessionStore> {
    let session = session();
    session
        .commit_login(CredentialPair::new("stale-access", "refresh-1"), principal(role))
        .unwrap();
    session
}

fn user_json(role_wire: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 7,
        "email": "user@example.cm",
        "role": role_wire,
        "nom": "Nana",
        "prenom": "Brice"
    })
}

#[tokio::test]
async fn login_commits_session_and_returns_landing_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .and(body_json(serde_json::json!({
            "email": "user@example.cm",
            "password": "s3cret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access": "a-1",
            "refresh": "r-1",
            "user": user_json("responsable_filiere")
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = session();
    let client = PortalClient::new(&server.uri(), session.clone()).unwrap();
    let route = client.login("user@example.cm", "s3cret").await.unwrap();

    assert_eq!(route, "/respfiliere/dashboard");
    assert!(session.is_authenticated());
    assert_eq!(session.access_token().as_deref(), Some("a-1"));
    assert_eq!(session.role(), Some(Role::ProgramManager));
}

#[tokio::test]
async fn expired_access_token_is_refreshed_once_and_request_replayed() {
    let server = MockServer::start().await;

    // First attempt with the stale token is rejected.
    Mock::given(method("GET"))
        .and(path("/candidats/respfiliere/dashboard_stats/"))
        .and(header("authorization", "Bearer stale-access"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .and(body_json(serde_json::json!({ "refresh": "refresh-1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "access": "fresh-access" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/candidats/respfiliere/dashboard_stats/"))
        .and(header("authorization", "Bearer fresh-access"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total": 4, "en_attente": 1, "complet": 1, "valide": 1, "rejete": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = logged_in_session(Role::ProgramManager);
    let client = PortalClient::new(&server.uri(), session.clone()).unwrap();
    let stats = client.dashboard_stats().await.unwrap();

    assert_eq!(stats.total, 4);
    // The rotated access token is now the session's token; refresh unchanged.
    assert_eq!(session.access_token().as_deref(), Some("fresh-access"));
    assert_eq!(session.refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn failed_refresh_clears_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/candidats/respfiliere/dashboard_stats/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let session = logged_in_session(Role::ProgramManager);
    let client = PortalClient::new(&server.uri(), session.clone()).unwrap();
    let err = client.dashboard_stats().await.unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired));
    assert!(!session.is_authenticated());
    assert_eq!(session.access_token(), None);
}

#[tokio::test]
async fn missing_refresh_token_fails_without_a_refresh_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), session()).unwrap();
    let err = client.refresh_profile().await.unwrap_err();
    assert!(matches!(err, ClientError::SessionExpired));
}

#[tokio::test]
async fn verify_code_available_opens_registration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-quitus/"))
        .and(body_json(serde_json::json!({ "code_quitus": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "available",
            "candidat": { "nom": "Fomba", "prenom": "Alice" }
        })))
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), session()).unwrap();
    let code = EligibilityCode::parse("123456").unwrap();
    let decision = client.verify_code(&code).await.unwrap();

    assert_eq!(decision.navigation_target(), Some("/register"));
    match decision {
        EligibilityDecision::StartRegistration { prefill, .. } => {
            assert_eq!(prefill.last_name.as_deref(), Some("Fomba"));
        }
        other => panic!("expected registration, got {other:?}"),
    }
}

#[tokio::test]
async fn verify_code_owned_resumes_enrollment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-quitus/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "owned", "candidat": {} })),
        )
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), logged_in_session(Role::Candidate)).unwrap();
    let code = EligibilityCode::parse("123456").unwrap();
    let decision = client.verify_code(&code).await.unwrap();
    assert_eq!(decision.navigation_target(), Some("/enrollement"));
}

#[tokio::test]
async fn verify_code_used_by_other_never_navigates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-quitus/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "used_by_other",
            "message": "Ce code appartient à un autre compte."
        })))
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), session()).unwrap();
    let code = EligibilityCode::parse("000000").unwrap();
    let decision = client.verify_code(&code).await.unwrap();

    assert_eq!(decision.navigation_target(), None);
    assert!(matches!(decision, EligibilityDecision::Blocked { .. }));
}

#[tokio::test]
async fn verify_code_server_rejection_is_a_failed_decision_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/verify-quitus/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "detail": "Code quitus inconnu" })),
        )
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), session()).unwrap();
    let code = EligibilityCode::parse("999999").unwrap();
    let decision = client.verify_code(&code).await.unwrap();
    match decision {
        EligibilityDecision::Failed { message } => assert_eq!(message, "Code quitus inconnu"),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn candidate_list_accepts_bare_and_paginated_shapes() {
    let row = serde_json::json!({
        "id": 1, "matricule": null, "nom": "Fomba", "prenom": "Alice",
        "email": null, "telephone": null, "statut_dossier": "en_attente"
    });

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/candidats/respfiliere/mes_candidats/"))
        .and(query_param("statut", "en_attente"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([row.clone()])))
        .expect(1)
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), logged_in_session(Role::ProgramManager)).unwrap();
    let filter = CandidateFilter {
        status: Some(DossierStatus::Pending),
        search: None,
    };
    let candidates = client.my_candidates(&filter).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].last_name, "Fomba");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/candidats/respfiliere/mes_candidats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "count": 1, "results": [row]
        })))
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), logged_in_session(Role::ProgramManager)).unwrap();
    let candidates = client.my_candidates(&CandidateFilter::default()).await.unwrap();
    assert_eq!(candidates.len(), 1);
}

#[tokio::test]
async fn search_filter_with_reserved_characters_stays_one_parameter() {
    let server = MockServer::start().await;
    // The decoded parameter must carry the raw search text; were the value
    // spliced into the URL unencoded, the `&is_active=false` tail would
    // arrive as a separate, forged parameter and this matcher would miss.
    Mock::given(method("GET"))
        .and(path("/auth/users/"))
        .and(query_param("search", "a&is_active=false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), logged_in_session(Role::SuperAdmin)).unwrap();
    let filter = UserFilter {
        role: None,
        active: None,
        search: Some("a&is_active=false".into()),
    };
    let users = client.list_users(&filter).await.unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn rejecting_without_a_reason_never_reaches_the_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/candidats/respfiliere/5/rejeter_dossier/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), logged_in_session(Role::ProgramManager)).unwrap();
    let err = client
        .reject_dossier(DossierId::new(5), "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}

#[tokio::test]
async fn rejecting_sends_the_reason() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/candidats/respfiliere/5/rejeter_dossier/"))
        .and(body_json(serde_json::json!({ "motif": "Diplôme illisible" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "Dossier rejeté" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), logged_in_session(Role::ProgramManager)).unwrap();
    let message = client
        .reject_dossier(DossierId::new(5), "Diplôme illisible")
        .await
        .unwrap();
    assert_eq!(message, "Dossier rejeté");
}

#[tokio::test]
async fn catalog_chain_hits_parent_scoped_paths() {
    use portal_types::OptionId;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/bacs/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([{ "id": 1, "code": "BAC_GEN", "libelle": "Bac général" }]),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/bacs/1/series/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "id": 10, "code": "C", "libelle": "Série C" }])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/series/10/filieres/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!([{ "id": 20, "code": "GI", "libelle": "Génie Informatique" }]),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/config/series/10/filieres/20/niveaux/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "id": 30, "code": "L1", "libelle": "Niveau 1" }])),
        )
        .mount(&server)
        .await;

    let client = PortalClient::new(&server.uri(), logged_in_session(Role::Candidate)).unwrap();
    assert_eq!(client.exam_types().await.unwrap().len(), 1);
    assert_eq!(client.tracks_of(OptionId::new(1)).await.unwrap().len(), 1);
    assert_eq!(client.programs_of(OptionId::new(10)).await.unwrap().len(), 1);
    assert_eq!(
        client
            .levels_of(OptionId::new(10), OptionId::new(20))
            .await
            .unwrap()
            .len(),
        1
    );
}
