//! Applicant-facing loan handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use core_kernel::ApplicationId;
use domain_loan::{Actor, ApplicantDetails, Submission, UploadFile};

use crate::dto::loans::ApplicationResponse;
use crate::error::ApiError;
use crate::AppState;

/// Folder uploaded documents are stored under
const DOCUMENT_FOLDER: &str = "loan-documents";

/// Submits a new loan application
///
/// Multipart form: text fields `loan_type`, `full_name`, `phone`, `address`,
/// `requested_amount`; every file field is treated as a document slot named
/// by its document key. Files are stored before validation so the submission
/// carries resolved references.
pub async fn apply(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    mut multipart: Multipart,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let mut loan_type = None;
    let mut full_name = None;
    let mut phone = None;
    let mut address = None;
    let mut requested_amount = None;
    let mut uploads: BTreeMap<String, Option<String>> = BTreeMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if field.file_name().is_some() {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| name.clone());
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Unreadable upload '{name}': {e}")))?;

            if bytes.is_empty() {
                // An empty file part declares the slot without providing it
                uploads.insert(name, None);
                continue;
            }

            let stored = state
                .documents
                .store(
                    UploadFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                    DOCUMENT_FOLDER,
                )
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, key = %name, "Document upload failed");
                    ApiError::Internal("Document upload failed, please try again".to_string())
                })?;

            uploads.insert(name, Some(stored.url));
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Unreadable field '{name}': {e}")))?;

            match name.as_str() {
                "loan_type" => loan_type = Some(value),
                "full_name" => full_name = Some(value),
                "phone" => phone = Some(value),
                "address" => address = Some(value),
                "requested_amount" => requested_amount = Some(value),
                _ => {}
            }
        }
    }

    let mut errors = Vec::new();
    let loan_type = loan_type.unwrap_or_else(|| {
        errors.push("loan_type is required".to_string());
        String::new()
    });
    let full_name = full_name.unwrap_or_else(|| {
        errors.push("full_name is required".to_string());
        String::new()
    });
    let phone = phone.unwrap_or_else(|| {
        errors.push("phone is required".to_string());
        String::new()
    });
    let address = address.unwrap_or_else(|| {
        errors.push("address is required".to_string());
        String::new()
    });
    let requested_amount: Decimal = match requested_amount {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            errors.push(format!("requested_amount '{raw}' is not a number"));
            Decimal::ZERO
        }),
        None => {
            errors.push("requested_amount is required".to_string());
            Decimal::ZERO
        }
    };

    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let submission = Submission {
        loan_type,
        applicant: ApplicantDetails::new(full_name, phone, address, requested_amount),
        uploads,
    };

    let application = state.intake.submit(&actor, submission).await?;
    Ok(Json(application.into()))
}

/// Lists the caller's applications, newest first
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<Vec<ApplicationResponse>>, ApiError> {
    let applications = state.intake.my_applications(&actor).await?;
    Ok(Json(applications.into_iter().map(Into::into).collect()))
}

/// Retrieves one application; owner or administrator only
pub async fn get_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationResponse>, ApiError> {
    let application = state
        .intake
        .application(&actor, ApplicationId::from_uuid(id))
        .await?;
    Ok(Json(application.into()))
}
