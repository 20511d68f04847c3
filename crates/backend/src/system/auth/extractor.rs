use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::TokenClaims;

/// Claims of the authenticated caller.
///
/// Reads the `TokenClaims` that `require_auth` placed in request
/// extensions; on a route without that middleware the extension is
/// absent and extraction rejects with 401. Handlers use it for the
/// owner checks on forms and their responses.
pub struct CurrentUser(pub TokenClaims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<TokenClaims>() {
            Some(claims) => Ok(CurrentUser(claims.clone())),
            None => Err(StatusCode::UNAUTHORIZED),
        }
    }
}
