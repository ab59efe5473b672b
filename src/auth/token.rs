//! Token introspection.
//!
//! Credential validation is an external capability: the gateway only needs
//! `authenticate(token) -> SessionIdentity`. The shipped implementation
//! introspects HS256 JWTs minted by the OAuth front-end, but the dispatcher
//! and transport only ever see the trait.

use crate::core::errors::GatewayError;
use crate::core::identity::SessionIdentity;
use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Opaque `authenticate(token) -> user identity` capability.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<SessionIdentity, GatewayError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: String,
    #[serde(default = "default_client")]
    client: String,
    exp: usize,
}

fn default_client() -> String {
    "default".to_string()
}

/// HS256 JWT introspection against a shared secret.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl TokenValidator for JwtValidator {
    async fn authenticate(&self, token: &str) -> Result<SessionIdentity, GatewayError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Token introspection failed");
                GatewayError::InvalidToken
            })?;

        Ok(SessionIdentity {
            user_id: data.claims.sub,
            email: data.claims.email,
            client_name: data.claims.client,
        })
    }
}
