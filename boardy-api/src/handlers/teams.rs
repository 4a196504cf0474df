use actix_web::{web, HttpResponse};
use std::sync::Arc;

use shared_types::{JoinTeamRequest, JoinTeamResponse, ResolveTeamRequest, TEAM_SLUG_KEY};
use shared_types::SESSION_CONTACT_ID_KEY;

use crate::error::{validation, ApiError};
use crate::helpers::session::SessionPropagator;
use crate::integrations::make_webhooks::MakeWebhooks;

/// Resolve a team slug to team details via the lookup webhook. The slug is
/// remembered in the session so later steps can build team-scoped links.
pub async fn resolve_team(
    webhooks: web::Data<Arc<MakeWebhooks>>,
    session: web::Data<Arc<SessionPropagator>>,
    request: web::Json<ResolveTeamRequest>,
) -> Result<HttpResponse, ApiError> {
    let slug = request.slug.trim().to_string();
    if slug.is_empty() {
        return Err(validation("Team slug is required"));
    }

    if let Err(e) = session.update(TEAM_SLUG_KEY, &slug) {
        tracing::warn!("Failed to persist team slug to session: {e}");
    }

    let resolution = webhooks.resolve_team(&slug).await;
    tracing::info!(
        "Resolved team {} ({:?}) for slug {slug}",
        resolution.team.id,
        resolution.source
    );

    Ok(HttpResponse::Ok().json(resolution))
}

/// Join a team: update the contact record with the team id. Requires an
/// established identity; a missing contact id is a visible error, not an
/// empty string embedded in a webhook call.
pub async fn join_team(
    webhooks: web::Data<Arc<MakeWebhooks>>,
    session: web::Data<Arc<SessionPropagator>>,
    request: web::Json<JoinTeamRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();

    let contact_id = request
        .contact_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .or_else(|| session.get(SESSION_CONTACT_ID_KEY))
        .ok_or_else(|| validation("Contact information is missing"))?;

    let team_id = request.team_id.trim().to_string();
    if team_id.is_empty() {
        return Err(validation("Team ID is required"));
    }

    webhooks.join_team(&contact_id, &team_id).await?;
    tracing::info!("Contact {contact_id} joined team {team_id}");

    Ok(HttpResponse::Ok().json(JoinTeamResponse {
        joined: true,
        team_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::session::InMemorySessionStore;
    use shared_types::OnboardingError;

    fn webhooks() -> web::Data<Arc<MakeWebhooks>> {
        // Unroutable endpoints: tests that reach the network would fail
        // with a transport error, not validation.
        web::Data::new(Arc::new(MakeWebhooks::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1/team-lookup",
            "http://127.0.0.1:1/team-join",
            "http://127.0.0.1:1/pro-status",
        )))
    }

    fn empty_session() -> web::Data<Arc<SessionPropagator>> {
        web::Data::new(Arc::new(SessionPropagator::new(Arc::new(
            InMemorySessionStore::new(),
        ))))
    }

    #[tokio::test]
    async fn test_join_without_identity_fails_before_any_network_call() {
        let err = join_team(
            webhooks(),
            empty_session(),
            web::Json(JoinTeamRequest {
                contact_id: None,
                team_id: "t_9".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err.0, OnboardingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_join_with_blank_contact_id_is_rejected() {
        let err = join_team(
            webhooks(),
            empty_session(),
            web::Json(JoinTeamRequest {
                contact_id: Some("   ".to_string()),
                team_id: "t_9".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err.0, OnboardingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_resolve_with_empty_slug_is_rejected() {
        let err = resolve_team(
            webhooks(),
            empty_session(),
            web::Json(ResolveTeamRequest {
                slug: "".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err.0, OnboardingError::Validation(_)));
    }
}
