use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Contact record as stored in the external backend. Field names mirror the
/// remote columns, which are camelCase.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
}

/// Which lookup tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum LookupTier {
    Exact,
    Suffix,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct LookupContactRequest {
    pub phone: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct LookupContactResponse {
    pub contact: Contact,
    pub matched_via: LookupTier,
    pub calendar_auth_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_uses_remote_field_names() {
        let contact = Contact {
            id: "c_1".to_string(),
            phone: "+15551234567".to_string(),
            full_name: Some("Jane Doe".to_string()),
            email: None,
            team_id: None,
        };

        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["fullName"], "Jane Doe");
        assert!(json.get("full_name").is_none());
        assert!(json.get("email").is_none());
    }

    #[test]
    fn test_contact_tolerates_missing_optional_fields() {
        let contact: Contact =
            serde_json::from_str(r#"{"id": "c_2", "phone": "15551234567"}"#).unwrap();
        assert_eq!(contact.id, "c_2");
        assert!(contact.full_name.is_none());
    }

    #[test]
    fn test_lookup_tier_serialization() {
        let json = serde_json::to_string(&LookupTier::Suffix).unwrap();
        assert_eq!(json, "\"suffix\"");
    }
}
