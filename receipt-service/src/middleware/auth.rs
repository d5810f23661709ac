use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::error::AppError;
use uuid::Uuid;

use crate::startup::AppState;

/// Authenticated user extractor.
///
/// Reads the `Authorization: Bearer <token>` header, validates the JWT and
/// exposes the claims to handlers. Any missing, malformed or expired token is
/// rejected with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user_name: String,
    pub business_name: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Missing authorization header")))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Invalid authorization header")))?;

        let claims = state
            .jwt
            .validate_token(token)
            .map_err(|_| AppError::AuthError(anyhow::anyhow!("Invalid or expired token")))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::AuthError(anyhow::anyhow!("Invalid or expired token")))?;

        // Add to tracing span for observability
        tracing::Span::current().record("user_id", claims.sub.as_str());

        Ok(AuthUser {
            user_id,
            user_name: claims.user_name,
            business_name: claims.business_name,
        })
    }
}
