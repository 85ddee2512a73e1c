//! HTTP API Layer
//!
//! This crate provides the REST API for the loan origination system using
//! Axum.
//!
//! # Architecture
//!
//! - **Handlers**: auth, applicant loans, administrator review, health
//! - **Middleware**: bearer-token authentication, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent structured error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_loan::{DocumentStore, IntakeService, ReviewService, UserDirectory};

use crate::config::ApiConfig;
use crate::handlers::{admin, auth as auth_handlers, health, loans};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<IntakeService>,
    pub review: Arc<ReviewService>,
    pub users: Arc<dyn UserDirectory>,
    pub documents: Arc<dyn DocumentStore>,
    /// Present in production; `None` when the state is wired to mocks
    pub pool: Option<PgPool>,
    pub config: ApiConfig,
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Auth routes
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login));

    // Applicant loan routes
    let loan_routes = Router::new()
        .route("/", get(loans::list_my_applications))
        .route("/apply", post(loans::apply))
        .route("/:id", get(loans::get_application));

    // Administrator routes; the services enforce the admin role
    let admin_routes = Router::new()
        .route("/loans", get(admin::list_applications))
        .route("/loans/:id/status", put(admin::update_status));

    // Protected API routes
    let protected_routes = Router::new()
        .nest("/loans", loan_routes)
        .nest("/admin", admin_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
