use serde::{Deserialize, Serialize};

pub mod contact;
pub mod error;
pub mod session;
pub mod team;

pub use contact::{Contact, LookupContactRequest, LookupContactResponse, LookupTier};
pub use error::OnboardingError;
pub use session::{
    SessionIdentity, ENTRY_PATH_KEY, SESSION_CONTACT_ID_KEY, TEAM_SLUG_KEY,
};
pub use team::{
    capitalize, JoinTeamRequest, JoinTeamResponse, ResolveTeamRequest, Team, TeamResolution,
    TeamSource,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub retryable: bool,
}
