use std::time::Duration;

use importers::FORWARD_FILENAME;
use shared_types::OnboardingError;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Forwards a validated connections export to the relationship-import
/// endpoint.
pub struct LinkedInImporter {
    client: reqwest::Client,
    base_url: String,
}

impl LinkedInImporter {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST the file as a multipart part named `file`. The part is always
    /// named `Connections.csv` on the wire; the endpoint rejects anything
    /// else.
    pub async fn forward(
        &self,
        contact_id: &str,
        content: Vec<u8>,
        original_filename: Option<&str>,
    ) -> Result<serde_json::Value, OnboardingError> {
        let url = format!("{}/{}", self.base_url, contact_id);
        tracing::info!(
            "Forwarding connections upload for contact {contact_id} to {url} as {}",
            forward_filename(original_filename)
        );

        let part = reqwest::multipart::Part::bytes(content)
            .file_name(forward_filename(original_filename))
            .mime_str("text/csv")
            .map_err(|e| OnboardingError::Validation(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await
            .map_err(|e| OnboardingError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            // Retrying without re-authenticating will fail the same way.
            return Err(OnboardingError::AuthRequired(body));
        }
        if !status.is_success() {
            return Err(OnboardingError::Upstream {
                status: status.as_u16(),
                message: body,
            });
        }

        // The endpoint does not always answer with JSON.
        Ok(serde_json::from_str(&body)
            .unwrap_or_else(|_| serde_json::json!({ "message": body })))
    }
}

/// The original filename is deliberately discarded; whatever the user's
/// export was called, the forwarded part is `Connections.csv`.
pub(crate) fn forward_filename(_original: Option<&str>) -> &'static str {
    FORWARD_FILENAME
}
