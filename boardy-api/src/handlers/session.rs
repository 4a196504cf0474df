use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::helpers::session::{team_slug_from_path, IdentityParams, SessionPropagator};

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "contactId")]
    pub contact_id: Option<String>,
    #[serde(rename = "teamSlug")]
    pub team_slug: Option<String>,
    #[serde(rename = "entryPath")]
    pub entry_path: Option<String>,
    /// Set on return from the external calendar-auth redirect.
    #[serde(rename = "fromCronofy")]
    pub from_cronofy: Option<bool>,
}

/// Resolve the session identity for the current navigation. URL values win
/// and are persisted; the store fills the gaps. A team slug can also ride
/// in as the first segment of the entry path.
pub async fn resolve_session(
    query: web::Query<SessionQuery>,
    session: web::Data<Arc<SessionPropagator>>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let from_cronofy = query.from_cronofy.unwrap_or(false);

    if from_cronofy {
        tracing::info!("Returned from calendar-auth redirect");
    }

    let team_slug = query
        .team_slug
        .or_else(|| query.entry_path.as_deref().and_then(team_slug_from_path));

    let identity = session.resolve(&IdentityParams {
        contact_id: query.contact_id,
        team_slug,
        entry_path: query.entry_path,
    });

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "identity": identity,
        "fromCronofy": from_cronofy,
    })))
}
