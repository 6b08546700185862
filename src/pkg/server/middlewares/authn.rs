use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    pkg::{internal::auth::AuthToken, server::state::AppState},
    prelude::{Error, Result},
};

/// Resolves `Authorization: Bearer <token>` against the tokens table and
/// attaches the owning user to the request. Token issuance happens outside
/// this service.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        match AuthToken::check_token_validity(&state, token).await {
            Ok(user) => {
                request.extensions_mut().insert(Arc::new(user));
                return Ok(next.run(request).await);
            }
            Err(_) => {}
        }
    }
    tracing::warn!("token missing or invalid, authentication denied");
    Err(Error::Unauthorized)
}
