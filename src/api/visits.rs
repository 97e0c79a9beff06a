//! Visit submission endpoint

use axum::{
    extract::{ConnectInfo, FromRequest, Request, State},
    http::{header::CONTENT_LENGTH, HeaderMap, Method},
    Json,
};
use axum_extra::extract::{multipart::MultipartError, Multipart};
use bytes::BytesMut;
use std::net::SocketAddr;

use crate::{
    error::{AppError, AppResult},
    models::{DocType, SubmissionForm, UploadedFile, VisitSubmitted},
    AppState,
};

pub const USE_POST: &str = "Use POST with multipart/form-data";

/// Register a visit
///
/// Validates the form, creates the student, visitor and visit records, and
/// stores both uploads under `visits/{visit_id}/`.
#[utoipa::path(
    post,
    path = "/visits/submit",
    tag = "visits",
    request_body(
        content = crate::models::submission::SubmitVisitForm,
        content_type = "multipart/form-data"
    ),
    responses(
        (status = 200, description = "Visit registered", body = VisitSubmitted),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 405, description = "Method other than POST", body = crate::error::ErrorResponse),
        (status = 500, description = "Configuration or storage failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_visit(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
) -> AppResult<Json<VisitSubmitted>> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed(USE_POST.to_string()));
    }

    let visits = &state.services.visits;
    visits.ensure_configured()?;

    let multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?;
    let form = read_submission(multipart, visits.config().max_file_size_mb).await?;

    let ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let submitted = visits.submit(form, ip).await?;

    Ok(Json(submitted))
}

/// Collect text fields and the two file parts, enforcing the per-file size limit
pub async fn read_submission(
    mut multipart: Multipart,
    max_file_size_mb: usize,
) -> AppResult<SubmissionForm> {
    let limit = max_file_size_mb * 1024 * 1024;
    let mut form = SubmissionForm::default();

    while let Some(mut field) = multipart.next_field().await.map_err(invalid_body)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        let Some(doc_type) = DocType::from_field(&name) else {
            // Unknown file parts are drained without decoding
            if field.file_name().is_some() {
                while field.chunk().await.map_err(invalid_body)?.is_some() {}
                continue;
            }
            let value = field.text().await.map_err(invalid_body)?;
            form.push_field(name, value);
            continue;
        };

        let file_name = field.file_name().map(str::to_string).filter(|n| !n.is_empty());
        let content_type = field.content_type().map(str::to_string);
        let declared_size = field
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let mut bytes = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(invalid_body)? {
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::Validation(format!(
                    "{} exceeds the {} MB upload limit",
                    doc_type, max_file_size_mb
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        // An unselected file input arrives as an empty, unnamed part
        if bytes.is_empty() && file_name.is_none() {
            continue;
        }

        form.insert_file(
            doc_type,
            UploadedFile {
                file_name,
                content_type,
                declared_size,
                bytes: bytes.freeze(),
            },
        );
    }

    Ok(form)
}

fn invalid_body(e: MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", e))
}

/// First `X-Forwarded-For` entry, else the peer address
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
}
