use reqwest::StatusCode;
use thiserror::Error;

/// Every way a call to the console or bot server can fail. Callers collapse
/// these into a single failure outcome; the `Display` text is what ends up
/// in inline error placeholders.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    #[error("Error del servidor: {}", .0.as_u16())]
    Status(StatusCode),
    #[error("Respuesta inválida: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("URL inválida: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status(code) => Some(*code),
            _ => None,
        }
    }
}
