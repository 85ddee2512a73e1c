//! Router-level tests against the real API wired to in-memory adapters

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::UserId;
use domain_loan::{IntakeService, LoanType, ReviewService, Role};
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::{create_router, AppState};
use test_utils::{
    InMemoryApplicationStore, InMemoryDocumentStore, InMemoryUserDirectory, RecordingNotifier,
};

struct TestContext {
    server: TestServer,
    store: Arc<InMemoryApplicationStore>,
    users: Arc<InMemoryUserDirectory>,
    notifier: Arc<RecordingNotifier>,
    config: ApiConfig,
}

impl TestContext {
    fn new() -> Self {
        let store = Arc::new(InMemoryApplicationStore::new());
        let users = Arc::new(InMemoryUserDirectory::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let documents = Arc::new(InMemoryDocumentStore::new());
        let config = ApiConfig::default();

        let state = AppState {
            intake: Arc::new(IntakeService::new(
                store.clone(),
                users.clone(),
                notifier.clone(),
            )),
            review: Arc::new(ReviewService::new(
                store.clone(),
                users.clone(),
                notifier.clone(),
            )),
            users: users.clone(),
            documents,
            pool: None,
            config: config.clone(),
        };

        Self {
            server: TestServer::new(create_router(state)).unwrap(),
            store,
            users,
            notifier,
            config,
        }
    }

    fn token_for(&self, user_id: UserId, role: Role) -> String {
        create_token(
            user_id,
            role,
            &self.config.jwt_secret,
            self.config.jwt_expiration_secs,
        )
        .unwrap()
    }

    fn user_token(&self, name: &str, email: &str) -> (UserId, String) {
        let id = self.users.add_user(name, email, Role::User);
        (id, self.token_for(id, Role::User))
    }

    fn admin_token(&self) -> (UserId, String) {
        let id = self
            .users
            .add_user("Reviewer", "reviewer@example.test", Role::Admin);
        (id, self.token_for(id, Role::Admin))
    }
}

fn complete_application_form(loan_type: LoanType) -> MultipartForm {
    let mut form = MultipartForm::new()
        .add_text("loan_type", loan_type.as_str())
        .add_text("full_name", "Asha Verma")
        .add_text("phone", "+91-9876543210")
        .add_text("address", "12 MG Road, Pune 411001")
        .add_text("requested_amount", "250000");

    for key in loan_type.required_documents() {
        form = form.add_part(
            key.to_string(),
            Part::bytes(b"fake pdf bytes".to_vec())
                .file_name(format!("{key}.pdf"))
                .mime_type("application/pdf"),
        );
    }

    form
}

// ============================================================================
// Health & Auth
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = ctx.server.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_then_login() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Asha Verma",
            "email": "asha.verma@example.test",
            "password": "s3cret-pass",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["role"], "user");

    // Duplicate email is a conflict
    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Asha Again",
            "email": "asha.verma@example.test",
            "password": "another-pass",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // Login round trip
    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "asha.verma@example.test",
            "password": "s3cret-pass",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();
    let response = ctx
        .server
        .get("/api/loans")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!([]));

    // Wrong password is unauthorized
    let response = ctx
        .server
        .post("/api/auth/login")
        .json(&json!({
            "email": "asha.verma@example.test",
            "password": "wrong",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_malformed_fields() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/auth/register")
        .json(&json!({
            "name": "",
            "email": "not-an-email",
            "password": "short",
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/loans").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let response = ctx
        .server
        .get("/api/loans")
        .authorization_bearer("not-a-real-token")
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Intake
// ============================================================================

#[tokio::test]
async fn test_apply_personal_loan_with_all_documents() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user_token("Asha Verma", "asha.verma@example.test");

    let response = ctx
        .server
        .post("/api/loans/apply")
        .authorization_bearer(&token)
        .multipart(complete_application_form(LoanType::Personal))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "under_review");
    assert_eq!(body["loan_type"], "personal");

    let documents = body["documents"].as_object().unwrap();
    assert_eq!(documents.len(), 4);
    for key in LoanType::Personal.required_documents() {
        let url = documents[*key].as_str().unwrap();
        assert!(url.starts_with("https://cdn.example.test/"));
    }

    assert_eq!(ctx.store.len(), 1);
}

#[tokio::test]
async fn test_apply_vehicle_loan_missing_rc() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user_token("Asha Verma", "asha.verma@example.test");

    let mut form = MultipartForm::new()
        .add_text("loan_type", "vehicle")
        .add_text("full_name", "Asha Verma")
        .add_text("phone", "+91-9876543210")
        .add_text("address", "12 MG Road, Pune 411001")
        .add_text("requested_amount", "800000");
    for key in ["aadhaar", "pan", "salarySlip", "bankStatement"] {
        form = form.add_part(
            key.to_string(),
            Part::bytes(b"fake pdf bytes".to_vec())
                .file_name(format!("{key}.pdf"))
                .mime_type("application/pdf"),
        );
    }

    let response = ctx
        .server
        .post("/api/loans/apply")
        .authorization_bearer(&token)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "missing_documents");
    assert_eq!(body["details"], json!(["rc"]));

    // Nothing was persisted
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_apply_with_unknown_loan_type() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user_token("Asha Verma", "asha.verma@example.test");

    let form = MultipartForm::new()
        .add_text("loan_type", "crypto")
        .add_text("full_name", "Asha Verma")
        .add_text("phone", "+91-9876543210")
        .add_text("address", "12 MG Road, Pune 411001")
        .add_text("requested_amount", "800000");

    let response = ctx
        .server
        .post("/api/loans/apply")
        .authorization_bearer(&token)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "bad_request");
}

#[tokio::test]
async fn test_apply_with_bad_amount() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user_token("Asha Verma", "asha.verma@example.test");

    let form = complete_application_form(LoanType::Personal);
    // Re-add requested_amount with garbage; last value wins in the handler
    let form = form.add_text("requested_amount", "a-lot-of-money");

    let response = ctx
        .server
        .post("/api/loans/apply")
        .authorization_bearer(&token)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_owner_isolation_on_get() {
    let ctx = TestContext::new();
    let (_, owner_token) = ctx.user_token("Asha Verma", "asha.verma@example.test");
    let (_, stranger_token) = ctx.user_token("Rahul Nair", "rahul.nair@example.test");
    let (_, admin_token) = ctx.admin_token();

    let response = ctx
        .server
        .post("/api/loans/apply")
        .authorization_bearer(&owner_token)
        .multipart(complete_application_form(LoanType::House))
        .await;
    let id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let response = ctx
        .server
        .get(&format!("/api/loans/{id}"))
        .authorization_bearer(&owner_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = ctx
        .server
        .get(&format!("/api/loans/{id}"))
        .authorization_bearer(&stranger_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = ctx
        .server
        .get(&format!("/api/loans/{id}"))
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

// ============================================================================
// Review
// ============================================================================

async fn submit_application(ctx: &TestContext, token: &str) -> String {
    let response = ctx
        .server
        .post("/api/loans/apply")
        .authorization_bearer(token)
        .multipart(complete_application_form(LoanType::Personal))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_admin_routes_reject_plain_users() {
    let ctx = TestContext::new();
    let (_, token) = ctx.user_token("Asha Verma", "asha.verma@example.test");

    let response = ctx
        .server
        .get("/api/admin/loans")
        .authorization_bearer(&token)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = ctx
        .server
        .put("/api/admin/loans/00000000-0000-0000-0000-000000000000/status")
        .authorization_bearer(&token)
        .json(&json!({ "status": "approved" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_approves_and_repeat_conflicts() {
    let ctx = TestContext::new();
    let (_, user_token) = ctx.user_token("Asha Verma", "asha.verma@example.test");
    let (_, admin_token) = ctx.admin_token();

    let id = submit_application(&ctx, &user_token).await;

    let response = ctx
        .server
        .put(&format!("/api/admin/loans/{id}/status"))
        .authorization_bearer(&admin_token)
        .json(&json!({ "status": "approved" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "approved");

    // The decision email carries the verdict and the application id
    let sent = ctx.notifier.sent();
    let decision = sent.last().unwrap();
    assert_eq!(decision.to, "asha.verma@example.test");
    assert!(decision.subject.to_lowercase().contains("approved"));
    assert!(decision.subject.contains(&id));

    // A repeat decision conflicts and leaves the status unchanged
    let response = ctx
        .server
        .put(&format!("/api/admin/loans/{id}/status"))
        .authorization_bearer(&admin_token)
        .json(&json!({ "status": "rejected" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = ctx
        .server
        .get(&format!("/api/loans/{id}"))
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.json::<Value>()["status"], "approved");
}

#[tokio::test]
async fn test_admin_rejects_invalid_decision_strings() {
    let ctx = TestContext::new();
    let (_, user_token) = ctx.user_token("Asha Verma", "asha.verma@example.test");
    let (_, admin_token) = ctx.admin_token();

    let id = submit_application(&ctx, &user_token).await;

    for status in ["pending", "under_review", "APPROVED!"] {
        let response = ctx
            .server
            .put(&format!("/api/admin/loans/{id}/status"))
            .authorization_bearer(&admin_token)
            .json(&json!({ "status": status }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{status}");
    }
}

#[tokio::test]
async fn test_admin_listing_includes_applicant_identity() {
    let ctx = TestContext::new();
    let (owner, user_token) = ctx.user_token("Asha Verma", "asha.verma@example.test");
    ctx.store
        .register_owner(owner, "Asha Verma", "asha.verma@example.test");
    let (_, admin_token) = ctx.admin_token();

    submit_application(&ctx, &user_token).await;

    let response = ctx
        .server
        .get("/api/admin/loans")
        .authorization_bearer(&admin_token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    let listing = body.as_array().unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0]["applicant_name"], "Asha Verma");
    assert_eq!(listing[0]["applicant_email"], "asha.verma@example.test");
    assert_eq!(listing[0]["status"], "under_review");
}

#[tokio::test]
async fn test_decision_on_unknown_application_is_404() {
    let ctx = TestContext::new();
    let (_, admin_token) = ctx.admin_token();

    let response = ctx
        .server
        .put("/api/admin/loans/00000000-0000-0000-0000-000000000000/status")
        .authorization_bearer(&admin_token)
        .json(&json!({ "status": "approved" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
