use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use shared_types::{ErrorResponse, OnboardingError};

/// Actix boundary for the onboarding error taxonomy. Every handler failure
/// passes through here so no rejection escapes unhandled.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub OnboardingError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            OnboardingError::Validation(_) => StatusCode::BAD_REQUEST,
            OnboardingError::LookupMiss => StatusCode::NOT_FOUND,
            OnboardingError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
            OnboardingError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            OnboardingError::AuthRequired(_) => StatusCode::UNAUTHORIZED,
            OnboardingError::Parse(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.0.to_string(),
            code: self.0.code().to_string(),
            retryable: self.0.retryable(),
        })
    }
}

pub fn validation(message: impl Into<String>) -> ApiError {
    ApiError(OnboardingError::Validation(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError(OnboardingError::LookupMiss).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(OnboardingError::Transport("down".to_string())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(OnboardingError::AuthRequired("expired".to_string())).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_error_body_carries_code_and_retryable_flag() {
        let response = ApiError(OnboardingError::Upstream {
            status: 502,
            message: "bad gateway".to_string(),
        })
        .error_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
