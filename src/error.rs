use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("API key is required.")]
    MissingCredential,
    #[error("Prompt is required.")]
    MissingPrompt,
    #[error("Invalid form submission: {0}")]
    InvalidForm(String),
    #[error("Failed to download reference image: {0}")]
    ImageDownloadFailed(String),
    #[error("Gemini API request failed: {0}")]
    UpstreamRequestFailed(String),
    #[error("Failed to extract image data from Gemini API response.")]
    MalformedUpstreamResponse,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RelayError {
    /// Whether the caller, rather than the relay or the upstream, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::MissingCredential
                | RelayError::MissingPrompt
                | RelayError::InvalidForm(_)
                | RelayError::ImageDownloadFailed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(feature = "server")]
mod response {
    use super::RelayError;
    use crate::models::ErrorBody;
    use actix_web::{http::StatusCode, HttpResponse, ResponseError};

    impl ResponseError for RelayError {
        fn status_code(&self) -> StatusCode {
            if self.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }

        fn error_response(&self) -> HttpResponse {
            HttpResponse::build(self.status_code()).json(ErrorBody {
                detail: self.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(RelayError::MissingCredential.is_client_error());
        assert!(RelayError::ImageDownloadFailed("404".into()).is_client_error());
        assert!(!RelayError::UpstreamRequestFailed("boom".into()).is_client_error());
        assert!(!RelayError::MalformedUpstreamResponse.is_client_error());
        assert!(!RelayError::Unexpected("?".into()).is_client_error());
    }

    #[test]
    fn test_messages_carry_cause() {
        let err = RelayError::ImageDownloadFailed("HTTP status client error (404 Not Found)".into());
        assert_eq!(
            err.to_string(),
            "Failed to download reference image: HTTP status client error (404 Not Found)"
        );
        assert_eq!(
            RelayError::MalformedUpstreamResponse.to_string(),
            "Failed to extract image data from Gemini API response."
        );
    }

    #[cfg(feature = "server")]
    #[test]
    fn test_status_codes() {
        use actix_web::{http::StatusCode, ResponseError};

        assert_eq!(
            RelayError::MissingCredential.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::UpstreamRequestFailed("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Config("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
