/// Client-side API error.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// Unique constraint violation (HTTP 409 / Postgres 23505).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("auth: {0}")]
    Auth(String),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success response to an error.
    ///
    /// PostgREST error bodies look like
    /// `{"code": "23505", "message": "duplicate key value ...", ...}`;
    /// anything else is passed through as text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let pg_code = parsed
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());

        match status {
            409 => ApiError::Conflict(message),
            _ if pg_code.as_deref() == Some("23505") => ApiError::Conflict(message),
            401 | 403 => ApiError::Auth(message),
            _ => ApiError::Server { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_is_conflict() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint \"user_roles_user_id_role_key\""}"#;
        let err = ApiError::from_response(409, body);
        assert!(matches!(err, ApiError::Conflict(ref m) if m.starts_with("duplicate key")));

        let err = ApiError::from_response(400, body);
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn auth_failures() {
        let err = ApiError::from_response(401, r#"{"message":"Invalid API key"}"#);
        assert!(matches!(err, ApiError::Auth(ref m) if m == "Invalid API key"));
        assert!(matches!(ApiError::from_response(403, ""), ApiError::Auth(_)));
    }

    #[test]
    fn plain_text_body_passes_through() {
        let err = ApiError::from_response(502, "bad gateway");
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }
}
