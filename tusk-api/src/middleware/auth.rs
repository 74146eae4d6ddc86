use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, state::AppState};

pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Claims carried by bearer tokens issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    pub sub: String,
    /// Comma-separated authorities, e.g. `ROLE_USER,ROLE_ADMIN`.
    pub auth: String,
    pub exp: usize,
}

impl TokenClaims {
    pub fn has_authority(&self, authority: &str) -> bool {
        self.auth.split(',').any(|a| a.trim() == authority)
    }
}

fn authenticate(state: &AppState, req: &Request) -> Result<TokenClaims, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthenticationError("Missing bearer token".to_string()))?;

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::new(Algorithm::HS512),
    )
    .map_err(|e| AppError::AuthenticationError(e.to_string()))?;

    Ok(token_data.claims)
}

/// Requires a valid token on every request when authentication is enabled.
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.auth.enabled {
        return Ok(next.run(req).await);
    }

    let claims = authenticate(&state, &req)?;
    tracing::debug!("Authenticated request from {}", claims.sub);
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Like [`user_auth_middleware`] but also requires `ROLE_ADMIN`.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.auth.enabled {
        return Ok(next.run(req).await);
    }

    let claims = authenticate(&state, &req)?;
    if !claims.has_authority(ROLE_ADMIN) {
        return Err(AppError::AuthorizationError(format!(
            "{} lacks {}",
            claims.sub, ROLE_ADMIN
        )));
    }
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
