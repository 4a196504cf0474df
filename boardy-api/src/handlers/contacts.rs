use actix_web::{web, HttpResponse};
use std::sync::Arc;

use shared_types::{
    LookupContactRequest, LookupContactResponse, OnboardingError, SESSION_CONTACT_ID_KEY,
    TEAM_SLUG_KEY,
};

use crate::config::ApiConfig;
use crate::error::{validation, ApiError};
use crate::helpers::attempts::AttemptCounter;
use crate::helpers::cronofy::calendar_auth_url;
use crate::helpers::phone::{is_submittable, normalize_phone};
use crate::helpers::session::SessionPropagator;
use crate::integrations::contact_store::{resolve_contact, ContactStore, LookupOutcome};

/// First wizard step: normalize the submitted phone number, resolve it to
/// a contact, persist the id for later steps, and hand back the
/// calendar-auth URL to redirect to.
pub async fn lookup_contact(
    store: web::Data<Arc<dyn ContactStore>>,
    session: web::Data<Arc<SessionPropagator>>,
    attempts: web::Data<Arc<AttemptCounter>>,
    config: web::Data<Arc<ApiConfig>>,
    request: web::Json<LookupContactRequest>,
) -> Result<HttpResponse, ApiError> {
    let raw = request.phone.trim().to_string();
    if raw.is_empty() {
        return Err(validation("Phone number is required"));
    }

    let canonical = normalize_phone(&raw);
    if !is_submittable(&canonical) {
        return Err(validation("Phone number must contain digits"));
    }

    let attempt = attempts.begin();

    match resolve_contact(store.get_ref().as_ref(), &raw).await {
        LookupOutcome::Found { contact, tier } => {
            tracing::info!("Found contact {} via {:?} lookup", contact.id, tier);

            if attempts.is_current(attempt) {
                if let Err(e) = session.update(SESSION_CONTACT_ID_KEY, &contact.id) {
                    tracing::warn!("Failed to persist contact id to session: {e}");
                }
            } else {
                tracing::info!("Lookup attempt {attempt} superseded, skipping session write");
            }

            let railway = config.railway.clone().unwrap_or_default();
            let app = config.app.clone().unwrap_or_default();
            let team_slug = session.get(TEAM_SLUG_KEY);
            let calendar_url = calendar_auth_url(
                &railway.cronofy_auth_base,
                &app.base_url,
                &contact.id,
                team_slug.as_deref(),
            );

            Ok(HttpResponse::Ok().json(LookupContactResponse {
                contact,
                matched_via: tier,
                calendar_auth_url: calendar_url,
            }))
        }
        LookupOutcome::NotFound => {
            tracing::info!("No contact found for submitted phone number");
            Err(ApiError(OnboardingError::LookupMiss))
        }
        LookupOutcome::Unavailable(e) => {
            // Not a miss: the user may well have an account.
            Err(ApiError(OnboardingError::Transport(e.to_string())))
        }
    }
}
