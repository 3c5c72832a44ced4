//! Current-user resolution. The strategy is picked once at startup from
//! `IDENTITY_STRATEGY`; handlers only ever see the `CurrentUserResolver` trait.
//!
//! The resolved id keys stored profiles and tags run logs. It never gates the
//! tailoring pipeline itself.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IdentityStrategy;

pub type UserId = String;

#[async_trait]
pub trait CurrentUserResolver: Send + Sync {
    /// Returns the user behind `bearer`, or `None` when the request is anonymous
    /// or the credential does not verify.
    async fn resolve(&self, bearer: Option<&str>) -> Option<UserId>;
}

/// Claims carried by session tokens. `sub` is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Verifies HS256 bearer tokens; expiry is enforced.
pub struct JwtUserResolver {
    key: DecodingKey,
    validation: Validation,
}

impl JwtUserResolver {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl CurrentUserResolver for JwtUserResolver {
    async fn resolve(&self, bearer: Option<&str>) -> Option<UserId> {
        let token = bearer?;
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) if !data.claims.sub.trim().is_empty() => Some(data.claims.sub),
            Ok(_) => {
                debug!("Bearer token has an empty subject");
                None
            }
            Err(e) => {
                debug!("Bearer token rejected: {e}");
                None
            }
        }
    }
}

/// Treats every request as anonymous.
pub struct AnonymousResolver;

#[async_trait]
impl CurrentUserResolver for AnonymousResolver {
    async fn resolve(&self, _bearer: Option<&str>) -> Option<UserId> {
        None
    }
}

pub fn resolver_for(strategy: &IdentityStrategy) -> Arc<dyn CurrentUserResolver> {
    match strategy {
        IdentityStrategy::Jwt { secret } => Arc::new(JwtUserResolver::new(secret)),
        IdentityStrategy::Anonymous => Arc::new(AnonymousResolver),
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
