use std::time::Duration;

use async_trait::async_trait;
use shared_types::{Contact, LookupTier};

use crate::helpers::phone::{last_ten_digits, normalize_phone};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected payload: {0}")]
    Decode(String),
}

/// Queryable external contact store. Injectable so the resolver can be
/// exercised against a test double.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Exact match on the canonical phone form.
    async fn find_by_phone_exact(&self, canonical: &str) -> Result<Vec<Contact>, StoreError>;

    /// Loosened match: records whose phone field contains the given digit
    /// suffix anywhere.
    async fn find_by_phone_suffix(&self, suffix: &str) -> Result<Vec<Contact>, StoreError>;
}

/// Outcome of a two-tier lookup. `Unavailable` degrades to the same user
/// flow as `NotFound` but stays distinguishable for logging; "service
/// unreachable" must never be reported as "user has no account".
#[derive(Debug)]
pub enum LookupOutcome {
    Found { contact: Contact, tier: LookupTier },
    NotFound,
    Unavailable(StoreError),
}

/// Resolve a raw phone string to a contact. Primary tier is an exact match
/// on the normalized form; the fallback suffix tier fires only when the
/// primary returns empty and the input has at least 10 digits.
pub async fn resolve_contact(store: &dyn ContactStore, raw_phone: &str) -> LookupOutcome {
    let canonical = normalize_phone(raw_phone);
    tracing::debug!("Looking up contact, canonical form {canonical}");

    match store.find_by_phone_exact(&canonical).await {
        Ok(contacts) => {
            if let Some(contact) = contacts.into_iter().next() {
                return LookupOutcome::Found {
                    contact,
                    tier: LookupTier::Exact,
                };
            }
        }
        Err(e) => {
            tracing::warn!("Primary contact lookup failed: {e}");
            return LookupOutcome::Unavailable(e);
        }
    }

    let Some(suffix) = last_ten_digits(raw_phone) else {
        return LookupOutcome::NotFound;
    };

    match store.find_by_phone_suffix(&suffix).await {
        Ok(contacts) => match contacts.into_iter().next() {
            Some(contact) => {
                // Unanchored suffix matches can hit unrelated numbers that
                // share a tail; keep them visible in the logs.
                tracing::warn!(
                    "Contact {} matched via suffix fallback on {suffix}",
                    contact.id
                );
                LookupOutcome::Found {
                    contact,
                    tier: LookupTier::Suffix,
                }
            }
            None => LookupOutcome::NotFound,
        },
        Err(e) => {
            tracing::warn!("Fallback contact lookup failed: {e}");
            LookupOutcome::Unavailable(e)
        }
    }
}

/// Contact store backed by the Supabase REST endpoint. Reads use the
/// public anon key, which row-level security restricts to lookups.
pub struct SupabaseContactStore {
    client: reqwest::Client,
    base_url: String,
    anon_key: Option<String>,
}

impl SupabaseContactStore {
    pub fn new(client: reqwest::Client, base_url: &str, anon_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        }
    }

    async fn query(&self, phone_filter: String) -> Result<Vec<Contact>, StoreError> {
        let url = format!("{}/rest/v1/Contact", self.base_url);

        let mut request = self
            .client
            .get(&url)
            .query(&[
                ("select", "id,phone,fullName,email,teamId"),
                ("phone", phone_filter.as_str()),
                ("limit", "1"),
            ])
            .timeout(LOOKUP_TIMEOUT);

        if let Some(key) = &self.anon_key {
            request = request
                .header("apikey", key)
                .bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<Contact>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ContactStore for SupabaseContactStore {
    async fn find_by_phone_exact(&self, canonical: &str) -> Result<Vec<Contact>, StoreError> {
        self.query(format!("eq.{canonical}")).await
    }

    async fn find_by_phone_suffix(&self, suffix: &str) -> Result<Vec<Contact>, StoreError> {
        self.query(format!("ilike.*{suffix}*")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn contact(id: &str, phone: &str) -> Contact {
        Contact {
            id: id.to_string(),
            phone: phone.to_string(),
            full_name: None,
            email: None,
            team_id: None,
        }
    }

    /// Test double recording every query it receives.
    #[derive(Default)]
    struct RecordingStore {
        exact_result: Option<Contact>,
        suffix_result: Option<Contact>,
        fail_exact: bool,
        fail_suffix: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContactStore for RecordingStore {
        async fn find_by_phone_exact(&self, canonical: &str) -> Result<Vec<Contact>, StoreError> {
            self.calls.lock().unwrap().push(format!("exact:{canonical}"));
            if self.fail_exact {
                return Err(StoreError::Transport("connection refused".to_string()));
            }
            Ok(self.exact_result.clone().into_iter().collect())
        }

        async fn find_by_phone_suffix(&self, suffix: &str) -> Result<Vec<Contact>, StoreError> {
            self.calls.lock().unwrap().push(format!("suffix:{suffix}"));
            if self.fail_suffix {
                return Err(StoreError::Transport("connection refused".to_string()));
            }
            Ok(self.suffix_result.clone().into_iter().collect())
        }
    }

    #[tokio::test]
    async fn test_exact_match_short_circuits_fallback() {
        let store = RecordingStore {
            exact_result: Some(contact("c_1", "+15551234567")),
            ..Default::default()
        };

        let outcome = resolve_contact(&store, "(555) 123-4567").await;

        match outcome {
            LookupOutcome::Found { contact, tier } => {
                assert_eq!(contact.id, "c_1");
                assert_eq!(tier, LookupTier::Exact);
            }
            other => panic!("expected exact match, got {other:?}"),
        }
        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["exact:+15551234567"]);
    }

    #[tokio::test]
    async fn test_fallback_fires_once_and_only_after_empty_primary() {
        let store = RecordingStore {
            suffix_result: Some(contact("c_2", "15551234567")),
            ..Default::default()
        };

        let outcome = resolve_contact(&store, "5551234567").await;

        match outcome {
            LookupOutcome::Found { contact, tier } => {
                assert_eq!(contact.id, "c_2");
                assert_eq!(tier, LookupTier::Suffix);
            }
            other => panic!("expected fallback match, got {other:?}"),
        }
        let calls = store.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            ["exact:+15551234567", "suffix:5551234567"]
        );
    }

    #[tokio::test]
    async fn test_fallback_skipped_for_short_inputs() {
        let store = RecordingStore::default();

        let outcome = resolve_contact(&store, "12345678").await;

        assert!(matches!(outcome, LookupOutcome::NotFound));
        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].starts_with("exact:"));
    }

    #[tokio::test]
    async fn test_both_tiers_empty_is_a_definitive_miss() {
        let store = RecordingStore::default();
        let outcome = resolve_contact(&store, "5551234567").await;
        assert!(matches!(outcome, LookupOutcome::NotFound));
    }

    #[tokio::test]
    async fn test_primary_transport_failure_is_unavailable_not_miss() {
        let store = RecordingStore {
            fail_exact: true,
            ..Default::default()
        };

        let outcome = resolve_contact(&store, "5551234567").await;

        assert!(matches!(outcome, LookupOutcome::Unavailable(_)));
        // No fallback attempt after a failed primary.
        assert_eq!(store.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_transport_failure_is_unavailable() {
        let store = RecordingStore {
            fail_suffix: true,
            ..Default::default()
        };

        let outcome = resolve_contact(&store, "5551234567").await;
        assert!(matches!(outcome, LookupOutcome::Unavailable(_)));
    }
}
