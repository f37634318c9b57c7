use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims carried by the bearer tokens the identity provider issues.
///
/// The `sub` field is the local user's integer id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The local user id, as a string.
    pub sub: String,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    /// Token issued-at (Unix timestamp).
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
}

impl Claims {
    /// Extract the user id from the `sub` claim.
    pub fn user_id(&self) -> Result<i32, String> {
        self.sub
            .parse()
            .map_err(|e| format!("Invalid user id in sub claim: {e}"))
    }
}

/// Validate an HS256 token against the shared secret and return its claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Token validation failed: {e}"))
}
