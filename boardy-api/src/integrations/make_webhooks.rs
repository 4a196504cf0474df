use std::time::Duration;

use serde::Deserialize;
use shared_types::{capitalize, OnboardingError, Team, TeamResolution, TeamSource};

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Make.com automation webhooks: team resolution, team
/// join, and the pro-status flip.
pub struct MakeWebhooks {
    client: reqwest::Client,
    team_lookup_url: String,
    team_join_url: String,
    pro_status_url: String,
}

impl MakeWebhooks {
    pub fn new(
        client: reqwest::Client,
        team_lookup_url: &str,
        team_join_url: &str,
        pro_status_url: &str,
    ) -> Self {
        Self {
            client,
            team_lookup_url: team_lookup_url.to_string(),
            team_join_url: team_join_url.to_string(),
            pro_status_url: pro_status_url.to_string(),
        }
    }

    /// Resolve a team slug. The webhook sometimes answers with JSON,
    /// sometimes with a legacy "teamId: ...\nname: ..." text blob, and
    /// sometimes with nothing usable; all three shapes are tolerated and
    /// the worst case falls back to the slug itself.
    pub async fn resolve_team(&self, slug: &str) -> TeamResolution {
        let response = self
            .client
            .post(&self.team_lookup_url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&serde_json::json!({ "slug": slug }))
            .send()
            .await;

        let body = match response {
            Ok(response) if response.status().is_success() => {
                response.text().await.unwrap_or_default()
            }
            Ok(response) => {
                tracing::warn!(
                    "Team lookup webhook returned {}, falling back to slug",
                    response.status()
                );
                return TeamResolution {
                    team: Team::fallback_for_slug(slug),
                    source: TeamSource::Fallback,
                };
            }
            Err(e) => {
                tracing::warn!("Team lookup webhook unreachable: {e}, falling back to slug");
                return TeamResolution {
                    team: Team::fallback_for_slug(slug),
                    source: TeamSource::Fallback,
                };
            }
        };

        parse_team_response(slug, &body)
    }

    /// Update the contact record with the team id. Success is all this
    /// caller needs to know; failures surface as retryable errors.
    pub async fn join_team(&self, contact_id: &str, team_id: &str) -> Result<(), OnboardingError> {
        self.post_expecting_success(
            &self.team_join_url,
            serde_json::json!({ "contactId": contact_id, "teamId": team_id }),
        )
        .await
    }

    /// Flip the contact's pro flag from FALSE to TRUE.
    pub async fn activate_pro(&self, contact_id: &str) -> Result<(), OnboardingError> {
        self.post_expecting_success(
            &self.pro_status_url,
            serde_json::json!({ "contactId": contact_id }),
        )
        .await
    }

    async fn post_expecting_success(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<(), OnboardingError> {
        let response = self
            .client
            .post(url)
            .timeout(WEBHOOK_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| OnboardingError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OnboardingError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct TeamPayload {
    id: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

/// One explicit parser per response shape, tried in order: structured
/// JSON, the legacy plain-text format, then the deterministic fallback.
pub(crate) fn parse_team_response(slug: &str, body: &str) -> TeamResolution {
    if let Ok(payload) = serde_json::from_str::<TeamPayload>(body) {
        if payload.id.is_some() || payload.name.is_some() {
            let fallback = Team::fallback_for_slug(slug);
            return TeamResolution {
                team: Team {
                    id: non_blank(payload.id).unwrap_or(fallback.id),
                    name: non_blank(payload.name)
                        .map(|n| capitalize(&n))
                        .unwrap_or(fallback.name),
                    description: non_blank(payload.description).or(fallback.description),
                },
                source: TeamSource::Structured,
            };
        }
    }

    if let Some(team) = parse_legacy_text(slug, body) {
        return TeamResolution {
            team,
            source: TeamSource::LegacyText,
        };
    }

    TeamResolution {
        team: Team::fallback_for_slug(slug),
        source: TeamSource::Fallback,
    }
}

/// Legacy shape: "teamId: <id>\nname: <name>", either value possibly blank.
fn parse_legacy_text(slug: &str, body: &str) -> Option<Team> {
    if !body.contains("teamId:") || !body.contains("name:") {
        return None;
    }

    let mut team_id = None;
    let mut name = None;
    for line in body.lines() {
        if let Some(rest) = line.strip_prefix("teamId:") {
            team_id = non_blank(Some(rest.trim().to_string()));
        } else if let Some(rest) = line.strip_prefix("name:") {
            name = non_blank(Some(rest.trim().to_string()));
        }
    }

    let fallback = Team::fallback_for_slug(slug);
    Some(Team {
        id: team_id.unwrap_or(fallback.id),
        name: name.map(|n| capitalize(&n)).unwrap_or(fallback.name),
        description: fallback.description,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
