//! API error type
//!
//! Every failure of the request pipeline becomes exactly one [`ApiError`].
//! Messages follow the Skydropx reference clients, which report in Spanish.

use serde_json::{json, Value};
use thiserror::Error;

/// What went wrong, independent of the human-readable message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Connection failure or other transport problem (no status code)
    Transport,
    /// Non-2xx response
    Http(u16),
    /// The request exceeded the client timeout (no status code)
    Timeout,
    /// A polling helper gave up before the resource completed
    Polling,
    /// A payload could not be encoded or a response could not be decoded
    Decode,
}

/// Error raised by the Skydropx API client
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    /// Parsed error payload for HTTP errors
    pub body: Option<Value>,
}

impl ApiError {
    fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), body: None }
    }

    /// Error for a non-2xx response carrying `body`
    pub fn from_status(status: u16, body: Option<Value>) -> Self {
        Self { kind: ApiErrorKind::Http(status), message: status_message(status), body }
    }

    pub fn timeout() -> Self {
        Self::new(ApiErrorKind::Timeout, "Timeout - La solicitud tardó demasiado")
    }

    pub fn connection() -> Self {
        Self::new(ApiErrorKind::Transport, "Error de conexión - Verifica tu internet")
    }

    pub fn unexpected(detail: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Transport, format!("Error inesperado: {detail}"))
    }

    pub fn decode(detail: impl std::fmt::Display) -> Self {
        Self::new(ApiErrorKind::Decode, format!("Error inesperado: {detail}"))
    }

    pub fn polling() -> Self {
        Self::new(ApiErrorKind::Polling, "Timeout esperando cotización - Intenta más tarde")
    }

    /// HTTP status, if the server answered
    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            ApiErrorKind::Http(status) => Some(status),
            _ => None,
        }
    }

    /// True for failures where no response was received
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ApiErrorKind::Transport | ApiErrorKind::Timeout)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code() == Some(429)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout()
        } else if err.is_connect() {
            Self::connection()
        } else if err.is_decode() {
            Self::decode(err)
        } else {
            Self::unexpected(err)
        }
    }
}

/// Message for a non-2xx status code
pub fn status_message(status: u16) -> String {
    match status {
        400 => "Solicitud inválida".to_string(),
        401 => "No autorizado - Verifica tus credenciales".to_string(),
        403 => "Acceso prohibido".to_string(),
        404 => "Recurso no encontrado".to_string(),
        422 => "Error de validación".to_string(),
        429 => "Límite de tasa excedido - Intenta más tarde".to_string(),
        500 => "Error interno del servidor".to_string(),
        503 => "Servicio no disponible".to_string(),
        other => format!("Error {other}"),
    }
}

/// Parse an error response body, wrapping non-JSON text as `{"error": text}`
pub fn parse_error_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "error": text }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(status_message(400), "Solicitud inválida");
        assert_eq!(status_message(401), "No autorizado - Verifica tus credenciales");
        assert_eq!(status_message(403), "Acceso prohibido");
        assert_eq!(status_message(404), "Recurso no encontrado");
        assert_eq!(status_message(422), "Error de validación");
        assert_eq!(status_message(429), "Límite de tasa excedido - Intenta más tarde");
        assert_eq!(status_message(500), "Error interno del servidor");
        assert_eq!(status_message(503), "Servicio no disponible");
        assert_eq!(status_message(418), "Error 418");
        assert_eq!(status_message(502), "Error 502");
    }

    #[test]
    fn test_status_code_only_for_http_errors() {
        let err = ApiError::from_status(404, None);
        assert_eq!(err.status_code(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_transport());

        for err in [ApiError::timeout(), ApiError::connection(), ApiError::polling()] {
            assert_eq!(err.status_code(), None);
        }
        assert!(ApiError::timeout().is_transport());
        assert!(!ApiError::polling().is_transport());
    }

    #[test]
    fn test_display_is_message() {
        let err = ApiError::from_status(429, Some(json!({"retry_after": 30})));
        assert_eq!(err.to_string(), "Límite de tasa excedido - Intenta más tarde");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_error_body_parsing() {
        assert_eq!(parse_error_body(r#"{"errors":["bad zip"]}"#), json!({"errors": ["bad zip"]}));
        assert_eq!(parse_error_body("<html>Bad Gateway</html>"), json!({"error": "<html>Bad Gateway</html>"}));
        assert_eq!(parse_error_body(""), json!({"error": ""}));
    }
}
