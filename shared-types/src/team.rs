use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_TEAM_DESCRIPTION: &str =
    "Join your team to collaborate and share your network.";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Team {
    /// Deterministic team used when the resolution webhook returns nothing
    /// usable: the slug doubles as id and display name.
    pub fn fallback_for_slug(slug: &str) -> Self {
        Team {
            id: slug.to_string(),
            name: capitalize(slug),
            description: Some(DEFAULT_TEAM_DESCRIPTION.to_string()),
        }
    }
}

/// How the team data was obtained from the resolution webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum TeamSource {
    /// Webhook returned well-formed JSON.
    Structured,
    /// Webhook returned the legacy "teamId: ...\nname: ..." plain text.
    LegacyText,
    /// Response was unparseable or empty; slug used as id and name.
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TeamResolution {
    pub team: Team,
    pub source: TeamSource,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct ResolveTeamRequest {
    pub slug: String,
}

#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JoinTeamRequest {
    #[serde(default)]
    pub contact_id: Option<String>,
    pub team_id: String,
}

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct JoinTeamResponse {
    pub joined: bool,
    pub team_id: String,
}

/// Capitalize a slug for display ("creandum" -> "Creandum").
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("creandum"), "Creandum");
        assert_eq!(capitalize("Creandum"), "Creandum");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_fallback_team_uses_slug_as_id_and_name() {
        let team = Team::fallback_for_slug("creandum");
        assert_eq!(team.id, "creandum");
        assert_eq!(team.name, "Creandum");
        assert!(team.description.is_some());
    }
}
