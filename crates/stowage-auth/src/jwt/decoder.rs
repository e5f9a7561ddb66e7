//! Token verification.

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use stowage_core::config::AuthConfig;
use stowage_core::error::AppError;
use stowage_core::result::AppResult;
use stowage_core::traits::{IdentityResolver, VerifiedIdentity};

use super::claims::Claims;

/// Verifies HS256 tokens against the configured secret, issuer and audience.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;
        match &config.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verify the signature and standard claims of `token`.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Rejected bearer token");
                match e.kind() {
                    JwtErrorKind::ExpiredSignature => AppError::unauthenticated("Token has expired"),
                    JwtErrorKind::InvalidSignature => {
                        AppError::unauthenticated("Invalid token signature")
                    }
                    JwtErrorKind::InvalidIssuer | JwtErrorKind::InvalidAudience => {
                        AppError::unauthenticated("Token was not issued for this service")
                    }
                    _ => AppError::unauthenticated("Invalid token"),
                }
            })
    }
}

#[async_trait]
impl IdentityResolver for JwtDecoder {
    async fn resolve(&self, token: &str) -> AppResult<VerifiedIdentity> {
        let claims = self.decode(token)?;
        if claims.sub.trim().is_empty() {
            return Err(AppError::unauthenticated("Token has no subject"));
        }
        Ok(claims.into())
    }
}
