//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using Bearer tokens from Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Resolve the token hash to a non-revoked token
/// 3. Insert the token's [`crate::domain::caller::CallerIdentity`] into
///    request extensions
/// 4. Continue to next middleware/handler
///
/// Handlers read the identity with `Extension<CallerIdentity>`; nothing in
/// the request body can change it.
///
/// # Errors
///
/// Returns `401 Unauthorized` if:
/// - Authorization header is missing
/// - Token format is invalid
/// - Token is not found or revoked
///
/// Adds `WWW-Authenticate: Bearer` header to 401 responses per RFC 6750.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let caller = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(caller);

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}
