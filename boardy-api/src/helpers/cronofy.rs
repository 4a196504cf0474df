use std::time::Duration;

use url::form_urlencoded;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the calendar-auth handoff URL: `<base>/<contact_id>?redirect=...`
/// where the redirect returns to the app's success step carrying
/// `fromCronofy=true` and the contact id.
///
/// A blank contact id yields the bare success path instead of an error so
/// the caller always has somewhere to send the user.
pub fn calendar_auth_url(
    cronofy_base: &str,
    app_base: &str,
    contact_id: &str,
    team_slug: Option<&str>,
) -> String {
    let contact_id = contact_id.trim();
    let success_path = match team_slug.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => format!("/{slug}/success"),
        None => "/success".to_string(),
    };

    if contact_id.is_empty() {
        tracing::warn!("calendar_auth_url called without a contact id, using fallback path");
        return success_path;
    }

    let return_to = format!(
        "{}{}?fromCronofy=true&contactId={}",
        app_base.trim_end_matches('/'),
        success_path,
        contact_id
    );
    let redirect: String = form_urlencoded::byte_serialize(return_to.as_bytes()).collect();

    format!(
        "{}/{}?redirect={}",
        cronofy_base.trim_end_matches('/'),
        contact_id,
        redirect
    )
}

/// Bounded reachability probe for the handoff URL. Any response counts as
/// reachable; only a transport failure or timeout does not.
pub async fn is_url_reachable(client: &reqwest::Client, url: &str) -> bool {
    match client.head(url).timeout(PROBE_TIMEOUT).send().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("URL {url} is not reachable: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CRONOFY_BASE: &str = "https://calendar.example.com/api/cronofy/auth";
    const APP_BASE: &str = "https://pro.example.com";

    #[test]
    fn test_link_contains_contact_id_and_encoded_redirect() {
        let url = calendar_auth_url(CRONOFY_BASE, APP_BASE, "c_1", None);

        assert!(url.starts_with("https://calendar.example.com/api/cronofy/auth/c_1?redirect="));
        assert!(url.contains("%2Fsuccess"));
        assert!(url.contains("fromCronofy%3Dtrue"));
        assert!(url.contains("contactId%3Dc_1"));
    }

    #[test]
    fn test_team_slug_is_part_of_the_return_path() {
        let url = calendar_auth_url(CRONOFY_BASE, APP_BASE, "c_1", Some("creandum"));
        assert!(url.contains("%2Fcreandum%2Fsuccess"));
    }

    #[test]
    fn test_blank_contact_id_yields_fallback_path() {
        assert_eq!(calendar_auth_url(CRONOFY_BASE, APP_BASE, "  ", None), "/success");
        assert_eq!(
            calendar_auth_url(CRONOFY_BASE, APP_BASE, "", Some("creandum")),
            "/creandum/success"
        );
    }

    #[test]
    fn test_trailing_slashes_do_not_double_up() {
        let url = calendar_auth_url(
            "https://calendar.example.com/api/cronofy/auth/",
            "https://pro.example.com/",
            "c_1",
            None,
        );
        assert!(url.starts_with("https://calendar.example.com/api/cronofy/auth/c_1?"));
        assert!(!url.contains("com//"));
    }
}
