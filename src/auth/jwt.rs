use std::sync::Arc;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{auth::claims::Claims, clock::Clock, config::JwtConfig, state::AppState};

#[derive(Debug, Error)]
pub enum TokenError {
    /// Bad signature, wrong issuer or audience, outside the validity window, or garbage.
    #[error("invalid token")]
    Invalid,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// A freshly minted bearer token and the instant it stops being valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Signs and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
    leeway: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(cfg: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::minutes(cfg.ttl_minutes),
            leeway: Duration::seconds(cfg.leeway_seconds as i64),
            clock,
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<IssuedToken, TokenError> {
        let now = self.clock.now();
        let expires_at = now + self.ttl;
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp(),
            nbf: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(IssuedToken { token, expires_at })
    }

    /// Returns the subject of a valid token.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        // The time window is checked below against the injected clock.
        validation.validate_exp = false;
        validation.validate_nbf = false;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            warn!(error = %e, "jwt rejected");
            TokenError::Invalid
        })?;
        let claims = data.claims;

        let now = self.clock.now().unix_timestamp();
        let leeway = self.leeway.whole_seconds();
        if now < claims.nbf - leeway || now > claims.exp + leeway {
            warn!(user_id = %claims.sub, "jwt outside validity window");
            return Err(TokenError::Invalid);
        }

        debug!(user_id = %claims.sub, "jwt verified");
        Ok(claims.sub)
    }
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.as_ref().clone()
    }
}
