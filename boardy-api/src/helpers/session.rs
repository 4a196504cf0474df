use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shared_types::{
    SessionIdentity, ENTRY_PATH_KEY, SESSION_CONTACT_ID_KEY, TEAM_SLUG_KEY,
};

#[derive(Debug, thiserror::Error)]
#[error("Session store unavailable: {0}")]
pub struct SessionStoreUnavailable(pub String);

/// Small injectable key-value store standing in for browser session
/// storage. Synchronous by contract; last write wins.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreUnavailable>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreUnavailable>;
}

#[derive(Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreUnavailable> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreUnavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreUnavailable> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SessionStoreUnavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Identity values carried by the URL on the current navigation.
#[derive(Debug, Clone, Default)]
pub struct IdentityParams {
    pub contact_id: Option<String>,
    pub team_slug: Option<String>,
    pub entry_path: Option<String>,
}

/// Carries the resolved contact id (and optional team slug) across wizard
/// steps. The URL is authoritative on each navigation; the store is the
/// backup that survives external redirect round trips.
pub struct SessionPropagator {
    store: Arc<dyn SessionStore>,
    cached: Mutex<SessionIdentity>,
}

impl SessionPropagator {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            cached: Mutex::new(SessionIdentity::default()),
        }
    }

    /// Resolve the identity for the current navigation. Per field: a URL
    /// value wins and is written back to the store; otherwise the store
    /// value is adopted; otherwise the field stays empty.
    pub fn resolve(&self, params: &IdentityParams) -> SessionIdentity {
        let identity = SessionIdentity {
            contact_id: self.resolve_field(SESSION_CONTACT_ID_KEY, params.contact_id.as_deref()),
            team_slug: self.resolve_field(TEAM_SLUG_KEY, params.team_slug.as_deref()),
            entry_path: self.resolve_field(ENTRY_PATH_KEY, params.entry_path.as_deref()),
        };

        if let Ok(mut cached) = self.cached.lock() {
            *cached = identity.clone();
        }

        identity
    }

    fn resolve_field(&self, key: &str, url_value: Option<&str>) -> Option<String> {
        if let Some(value) = url_value.map(str::trim).filter(|v| !v.is_empty()) {
            if let Err(e) = self.store.set(key, value) {
                tracing::warn!("Failed to persist {key} to session store: {e}");
            }
            return Some(value.to_string());
        }

        match self.store.get(key) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Session store read failed for {key}: {e}");
                None
            }
        }
    }

    /// Read one field. The store is consulted first so a value written just
    /// before an external redirect is never shadowed by a stale in-memory
    /// copy; the cache is only a fallback when the store read fails.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Session store read failed for {key}, using cached value: {e}");
                let cached = self.cached.lock().ok()?;
                match key {
                    SESSION_CONTACT_ID_KEY => cached.contact_id.clone(),
                    TEAM_SLUG_KEY => cached.team_slug.clone(),
                    ENTRY_PATH_KEY => cached.entry_path.clone(),
                    _ => None,
                }
            }
        }
    }

    /// Write one field to both carriers. Idempotent; after a successful
    /// return the store and the cache agree.
    pub fn update(&self, key: &str, value: &str) -> Result<(), SessionStoreUnavailable> {
        self.store.set(key, value)?;

        if let Ok(mut cached) = self.cached.lock() {
            match key {
                SESSION_CONTACT_ID_KEY => cached.contact_id = Some(value.to_string()),
                TEAM_SLUG_KEY => cached.team_slug = Some(value.to_string()),
                ENTRY_PATH_KEY => cached.entry_path = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(())
    }
}

/// Path segments that name wizard steps rather than teams.
const RESERVED_SEGMENTS: &[&str] = &[
    "join-team",
    "booking-link",
    "onboarding-complete",
    "success",
    "dashboard",
    "api",
    "health",
];

/// Extract a team slug from an entry path. The first segment is a team
/// slug when it is not a reserved step name ("/creandum/join-team").
pub fn team_slug_from_path(path: &str) -> Option<String> {
    let first = path.split('/').find(|s| !s.is_empty())?;
    if RESERVED_SEGMENTS.contains(&first) {
        return None;
    }
    Some(first.to_string())
}
