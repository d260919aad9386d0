use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload used for authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: i64,    // issued at (unix timestamp)
    pub nbf: i64,    // not before, same as iat
    pub exp: i64,    // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
