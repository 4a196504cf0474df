use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Persistent store keys for the session identity. External redirects
/// re-enter the app with only the URL as a carrier, so these must stay
/// stable across releases.
pub const SESSION_CONTACT_ID_KEY: &str = "contactId";
pub const TEAM_SLUG_KEY: &str = "teamSlug";
pub const ENTRY_PATH_KEY: &str = "entryPath";

/// Identity carried across wizard steps. URL query parameters are the
/// primary channel, the session store the backup; a URL-provided value
/// always wins and overwrites the persisted one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionIdentity {
    pub contact_id: Option<String>,
    pub team_slug: Option<String>,
    pub entry_path: Option<String>,
}

impl SessionIdentity {
    pub fn is_established(&self) -> bool {
        self.contact_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identity_is_not_established() {
        assert!(!SessionIdentity::default().is_established());
    }

    #[test]
    fn test_identity_with_contact_is_established() {
        let identity = SessionIdentity {
            contact_id: Some("c_1".to_string()),
            ..Default::default()
        };
        assert!(identity.is_established());
    }
}
