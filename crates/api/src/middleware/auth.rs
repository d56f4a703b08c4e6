//! JWT-based authentication extractor for Axum handlers.
//!
//! The identity provider is an external collaborator; this extractor only
//! verifies the bearer token and yields the seller id it vouches for.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shelfwatch_core::error::CoreError;
use shelfwatch_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated seller extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthSeller) -> AppResult<Json<()>> {
///     tracing::info!(seller_id = auth.seller_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSeller {
    /// The seller's internal database id (from `claims.sub`).
    pub seller_id: DbId,
}

impl FromRequestParts<AppState> for AuthSeller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthSeller {
            seller_id: claims.sub,
        })
    }
}
