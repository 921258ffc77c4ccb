// Error taxonomy shared by the backend client, the retrier and the model router
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GenerationError {
    /// Overload, rate limit, 5xx or transport hiccup. Worth another try.
    #[error("Transient backend error ({}): {message}", status_label(.status))]
    Transient { status: Option<u16>, message: String },

    #[error("Permission denied ({}): {message}", status_label(.status))]
    PermissionDenied { status: Option<u16>, message: String },

    #[error("Model or resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Success envelope with no usable text or inline data
    #[error("No usable payload in response: {0}")]
    EmptyResponse(String),

    #[error("Malformed response payload: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller-level setup problem, raised before any backend call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend error: {0}")]
    Unknown(String),
}

fn status_label(status: &Option<u16>) -> String {
    status.map(|s| s.to_string()).unwrap_or_else(|| "no status".to_string())
}

impl GenerationError {
    /// Errors the retrier should try again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::Transient { .. }
                | GenerationError::EmptyResponse(_)
                | GenerationError::MalformedResponse(_)
        )
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, GenerationError::PermissionDenied { .. })
    }

    /// Map an HTTP failure from the Gemini REST API onto a tagged variant.
    ///
    /// The body is the Google RPC error envelope when available
    /// (`{"error": {"code", "message", "status"}}`); the status string wins
    /// over the HTTP code because proxies sometimes rewrite the latter.
    pub fn from_http(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<serde_json::Value>(body).ok();
        let rpc_status = envelope
            .as_ref()
            .and_then(|v| v["error"]["status"].as_str())
            .map(str::to_string);
        let message = envelope
            .as_ref()
            .and_then(|v| v["error"]["message"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());

        if message.to_lowercase().contains("overloaded") {
            return GenerationError::Transient { status: Some(status), message };
        }

        match rpc_status.as_deref() {
            Some("PERMISSION_DENIED") | Some("UNAUTHENTICATED") => {
                return GenerationError::PermissionDenied { status: Some(status), message };
            }
            Some("RESOURCE_EXHAUSTED") | Some("UNAVAILABLE") | Some("INTERNAL")
            | Some("DEADLINE_EXCEEDED") => {
                return GenerationError::Transient { status: Some(status), message };
            }
            Some("NOT_FOUND") => return GenerationError::NotFound(message),
            Some("INVALID_ARGUMENT") | Some("FAILED_PRECONDITION") => {
                return GenerationError::InvalidRequest(message);
            }
            _ => {}
        }

        match status {
            401 | 403 => GenerationError::PermissionDenied { status: Some(status), message },
            404 => GenerationError::NotFound(message),
            429 | 500 | 502 | 503 | 504 => GenerationError::Transient { status: Some(status), message },
            400..=499 => GenerationError::InvalidRequest(format!("HTTP {}: {}", status, message)),
            _ => GenerationError::Unknown(format!("HTTP {}: {}", status, message)),
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() || e.is_connect() || e.is_request() || e.is_body() {
            GenerationError::Transient { status: None, message: format!("Network error: {}", e) }
        } else if e.is_decode() {
            GenerationError::MalformedResponse(e.to_string())
        } else {
            GenerationError::Unknown(e.to_string())
        }
    }
}

impl From<serde_json::Error> for GenerationError {
    fn from(e: serde_json::Error) -> Self {
        GenerationError::MalformedResponse(e.to_string())
    }
}

impl From<base64::DecodeError> for GenerationError {
    fn from(e: base64::DecodeError) -> Self {
        GenerationError::MalformedResponse(format!("Failed to decode inline data: {}", e))
    }
}
