use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::TryStreamExt;
use std::sync::Arc;

use importers::{parse_connections, validate_upload, MAX_UPLOAD_BYTES};
use shared_types::OnboardingError;

use crate::error::{validation, ApiError};
use crate::integrations::linkedin_import::LinkedInImporter;

/// Accept a LinkedIn connections export and forward it to the
/// relationship-import endpoint. The upload is validated (CSV-typed, under
/// the size ceiling, parseable) before any outbound call.
pub async fn upload_connections(
    path: web::Path<String>,
    mut payload: Multipart,
    importer: web::Data<Arc<LinkedInImporter>>,
) -> Result<HttpResponse, ApiError> {
    let contact_id = path.into_inner();
    if contact_id.trim().is_empty() {
        return Err(validation("Contact ID is required"));
    }

    let mut upload: Option<(Option<String>, Option<String>, Vec<u8>)> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError(OnboardingError::Parse(e.to_string())))?
    {
        if field.name() != "file" {
            continue;
        }

        let filename = field
            .content_disposition()
            .get_filename()
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| ApiError(OnboardingError::Parse(e.to_string())))?
        {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(validation(format!(
                    "File is too large (limit {MAX_UPLOAD_BYTES} bytes)"
                )));
            }
            data.extend_from_slice(&chunk);
        }

        upload = Some((filename, content_type, data));
        break;
    }

    let Some((filename, content_type, data)) = upload else {
        return Err(validation("A file field named 'file' is required"));
    };

    validate_upload(
        filename.as_deref().unwrap_or(""),
        content_type.as_deref(),
        data.len(),
    )?;

    let connections = parse_connections(&data)?;
    tracing::info!(
        "Validated {} connections for contact {contact_id} (original file {:?})",
        connections.len(),
        filename
    );

    let upstream = importer
        .forward(&contact_id, data, filename.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "imported": true,
        "connections": connections.len(),
        "upstream": upstream,
    })))
}
