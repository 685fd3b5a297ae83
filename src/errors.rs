use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Failures of calls against the booking backend and of the local session.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response or a body reporting `success: false`.
    #[error("backend rejected the request ({status}): {message}")]
    Application { status: StatusCode, message: String },

    /// 401 from the backend, or the backend reports no authenticated user.
    #[error("session rejected by the backend: {0}")]
    Unauthorized(String),

    /// Persisted session keys are missing.
    #[error("no persisted session")]
    NoSession,

    /// The operation needs a logged-in user and there is none.
    #[error("login required")]
    NotAuthenticated,

    /// A logout or a newer refresh took over while this refresh waited.
    #[error("refresh superseded")]
    Superseded,

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("session storage: {0}")]
    Storage(#[from] std::io::Error),

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn application(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Application {
            status,
            message: message.into(),
        }
    }

    /// Errors that end in a redirect home instead of a soft notice.
    pub fn requires_redirect(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_) | Self::NoSession | Self::NotAuthenticated
        )
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub redirect: Option<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            redirect: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            redirect: None,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let redirect = err.requires_redirect().then(|| "/?modal=login".to_string());
        let status = match &err {
            ClientError::Application { status, .. } => *status,
            ClientError::Validation(_) => StatusCode::BAD_REQUEST,
            ClientError::Superseded => StatusCode::CONFLICT,
            ClientError::Unauthorized(_) | ClientError::NoSession | ClientError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            ClientError::Network(_) | ClientError::Decode(_) => StatusCode::BAD_GATEWAY,
            ClientError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
            redirect,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.redirect {
            Some(location) => Redirect::to(&location).into_response(),
            None => (self.status, self.message).into_response(),
        }
    }
}
