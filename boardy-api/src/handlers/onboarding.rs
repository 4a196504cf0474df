use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use shared_types::SESSION_CONTACT_ID_KEY;

use crate::error::{validation, ApiError};
use crate::helpers::session::SessionPropagator;
use crate::integrations::make_webhooks::MakeWebhooks;

/// Final wizard step: flip the contact's pro flag.
pub async fn activate_pro(
    path: web::Path<String>,
    webhooks: web::Data<Arc<MakeWebhooks>>,
) -> Result<HttpResponse, ApiError> {
    let contact_id = path.into_inner();
    if contact_id.trim().is_empty() {
        return Err(validation("Contact ID is required"));
    }

    webhooks.activate_pro(&contact_id).await?;
    tracing::info!("Pro status activated for contact {contact_id}");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "proActivated": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingLinkRequest {
    #[serde(default)]
    pub contact_id: Option<String>,
    pub booking_link: String,
}

/// Validate a user-supplied booking link. Requires an established
/// identity; the link itself must be a well-formed http(s) URL.
// TODO: forward the link to the contact-update webhook once it accepts a
// bookingLink field.
pub async fn save_booking_link(
    session: web::Data<Arc<SessionPropagator>>,
    request: web::Json<BookingLinkRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();

    let contact_id = request
        .contact_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .or_else(|| session.get(SESSION_CONTACT_ID_KEY))
        .ok_or_else(|| validation("Contact information is missing"))?;

    let link = request.booking_link.trim();
    if link.is_empty() {
        return Err(validation("Please enter a booking link"));
    }

    let parsed = url::Url::parse(link).map_err(|_| validation("Please enter a valid URL"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(validation("Booking link must be an http(s) URL"));
    }

    tracing::info!("Accepted booking link for contact {contact_id}");

    Ok(HttpResponse::Ok().json(serde_json::json!({ "saved": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::session::{InMemorySessionStore, SessionStore};
    use shared_types::OnboardingError;

    fn session_with(contact_id: Option<&str>) -> web::Data<Arc<SessionPropagator>> {
        let store = Arc::new(InMemorySessionStore::new());
        if let Some(id) = contact_id {
            store.set(SESSION_CONTACT_ID_KEY, id).unwrap();
        }
        web::Data::new(Arc::new(SessionPropagator::new(store)))
    }

    #[tokio::test]
    async fn test_booking_link_requires_identity() {
        let err = save_booking_link(
            session_with(None),
            web::Json(BookingLinkRequest {
                contact_id: None,
                booking_link: "https://cal.example.com/jane".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err.0, OnboardingError::Validation(_)));
    }

    #[tokio::test]
    async fn test_booking_link_accepts_valid_url_with_session_identity() {
        let response = save_booking_link(
            session_with(Some("c_1")),
            web::Json(BookingLinkRequest {
                contact_id: None,
                booking_link: "https://cal.example.com/jane".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), actix_web::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_booking_link_rejects_malformed_and_non_http_urls() {
        for link in ["not a url", "ftp://cal.example.com/jane", ""] {
            let err = save_booking_link(
                session_with(Some("c_1")),
                web::Json(BookingLinkRequest {
                    contact_id: None,
                    booking_link: link.to_string(),
                }),
            )
            .await
            .unwrap_err();

            assert!(
                matches!(err.0, OnboardingError::Validation(_)),
                "link: {link:?}"
            );
        }
    }
}
