use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use shared_types::TEAM_SLUG_KEY;

use crate::config::ApiConfig;
use crate::error::{validation, ApiError};
use crate::helpers::cronofy::{calendar_auth_url, is_url_reachable};
use crate::helpers::session::SessionPropagator;

#[derive(Debug, Deserialize)]
pub struct CalendarLinkQuery {
    #[serde(rename = "teamSlug")]
    pub team_slug: Option<String>,
    /// When true, also probe the built URL before handing it back.
    #[serde(default)]
    pub probe: bool,
}

/// Build the calendar-auth handoff URL for a contact. The team slug comes
/// from the query or, failing that, the session.
pub async fn calendar_link(
    path: web::Path<String>,
    query: web::Query<CalendarLinkQuery>,
    config: web::Data<Arc<ApiConfig>>,
    session: web::Data<Arc<SessionPropagator>>,
    probe_client: web::Data<reqwest::Client>,
) -> Result<HttpResponse, ApiError> {
    let contact_id = path.into_inner();
    if contact_id.trim().is_empty() {
        return Err(validation("Contact ID is required for calendar connection"));
    }

    let query = query.into_inner();
    let team_slug = query
        .team_slug
        .filter(|s| !s.trim().is_empty())
        .or_else(|| session.get(TEAM_SLUG_KEY));

    let railway = config.railway.clone().unwrap_or_default();
    let app = config.app.clone().unwrap_or_default();
    let url = calendar_auth_url(
        &railway.cronofy_auth_base,
        &app.base_url,
        &contact_id,
        team_slug.as_deref(),
    );

    let reachable = if query.probe {
        Some(is_url_reachable(probe_client.get_ref(), &url).await)
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "url": url,
        "reachable": reachable,
    })))
}
