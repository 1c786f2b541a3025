use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use keeper_core::Error as KeeperError;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug)]
pub struct ServerError(anyhow::Error);

impl<E> From<E> for ServerError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        for cause in self.0.chain() {
            if let Some(err) = cause.downcast_ref::<KeeperError>() {
                return match err {
                    KeeperError::NotFound(_) => StatusCode::NOT_FOUND,
                    KeeperError::RequestError { .. } | KeeperError::NetworkError(_) | KeeperError::ParseError(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
            }
            if let Some(err) = cause.downcast_ref::<reddit_client::Error>() {
                return match err {
                    reddit_client::Error::NetworkError(_) | reddit_client::Error::StatusError { .. } => {
                        StatusCode::BAD_GATEWAY
                    }
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
            }
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
