//! Administrator review handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use core_kernel::ApplicationId;
use domain_loan::{Actor, ApplicationStatus};

use crate::dto::loans::{AdminApplicationResponse, ApplicationResponse, UpdateStatusRequest};
use crate::error::ApiError;
use crate::AppState;

/// Lists every application with applicant identity, newest first
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<AdminApplicationResponse>>, ApiError> {
    let summaries = state.review.all_applications(&actor).await?;
    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// Applies a review decision to an application
pub async fn update_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    // Unknown decision strings fail here the same way a known-but-illegal
    // target (e.g. "under_review") fails inside the service.
    let decision: ApplicationStatus = request.status.parse().map_err(|_| {
        ApiError::BadRequest(format!(
            "Invalid status '{}': expected 'approved' or 'rejected'",
            request.status
        ))
    })?;

    let application = state
        .review
        .decide(&actor, ApplicationId::from_uuid(id), decision)
        .await?;

    Ok(Json(application.into()))
}
