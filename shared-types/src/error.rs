/// Error taxonomy for the onboarding flow. Every asynchronous failure is
/// converted into one of these at the boundary of the component that issued
/// the call before it reaches the user.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    /// Malformed or incomplete input, or a missing required id before a
    /// step that needs it. Recovered locally, never retried as-is.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Well-formed input with no matching contact. A normal negative
    /// result, not a failure.
    #[error("No account found for this phone number")]
    LookupMiss,

    /// External service unreachable or timed out. Retryable.
    #[error("Service unreachable: {0}")]
    Transport(String),

    /// Collaborator returned a 4xx/5xx. Retryable with the same request.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The collaborator rejected our credentials; retrying without
    /// re-authenticating will deterministically fail again.
    #[error("Re-authentication required: {0}")]
    AuthRequired(String),

    /// Malformed data from a collaborator or an uploaded file.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OnboardingError {
    /// Stable machine-readable code for telemetry and clients.
    pub fn code(&self) -> &'static str {
        match self {
            OnboardingError::Validation(_) => "validation",
            OnboardingError::LookupMiss => "lookup-miss",
            OnboardingError::Transport(_) => "transport",
            OnboardingError::Upstream { .. } => "upstream",
            OnboardingError::AuthRequired(_) => "auth-required",
            OnboardingError::Parse(_) => "parse",
        }
    }

    /// Whether re-invoking the same request is a sensible recovery action.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            OnboardingError::Transport(_) | OnboardingError::Upstream { .. }
        )
    }
}
