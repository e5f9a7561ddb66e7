//! # stowage-auth
//!
//! Verification of bearer tokens issued by the external identity provider.
//! Tokens are HS256 JWTs; the `sub` claim is the provider's stable subject
//! identifier and is linked to a Stowage user by `external_id`.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
