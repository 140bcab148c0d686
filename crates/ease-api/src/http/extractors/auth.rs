//! Current-user extractor.
//!
//! Authentication itself is an external collaborator; the gateway in
//! front of this service verifies the user and forwards the identity as
//! a header. The core only ever sees the identity as an opaque display
//! string. Requests without an identity are rejected -- the session
//! views never render without a user.
//!
//! Accepted headers:
//! - `X-User-Email: <email>`
//! - `Authorization: Bearer <email>`

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated user forwarded by the external auth layer.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub email: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let email = extract_identity(parts)?;
        if email.is_empty() || email.chars().any(|c| c.is_control()) {
            return Err(AppError::Unauthorized(
                "Invalid user identity header".to_string(),
            ));
        }
        Ok(CurrentUser { email })
    }
}

/// Pull the identity string from request headers.
fn extract_identity(parts: &Parts) -> Result<String, AppError> {
    if let Some(value) = parts.headers.get("x-user-email") {
        let s = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid X-User-Email encoding".to_string()))?;
        return Ok(s.trim().to_string());
    }

    if let Some(auth) = parts.headers.get("authorization") {
        let s = auth
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization encoding".to_string()))?;
        if let Some(token) = s.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(AppError::Unauthorized(
        "Missing user identity. Provide 'X-User-Email: <email>' or \
         'Authorization: Bearer <email>'."
            .to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: &str, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(header, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_user_email_header() {
        let parts = parts_with("x-user-email", "maya@example.com");
        assert_eq!(extract_identity(&parts).unwrap(), "maya@example.com");
    }

    #[test]
    fn reads_bearer_token() {
        let parts = parts_with("authorization", "Bearer maya@example.com");
        assert_eq!(extract_identity(&parts).unwrap(), "maya@example.com");
    }

    #[test]
    fn missing_identity_is_unauthorized() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(matches!(
            extract_identity(&parts),
            Err(AppError::Unauthorized(_))
        ));
    }
}
