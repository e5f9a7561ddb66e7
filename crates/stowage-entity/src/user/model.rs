//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user known to Stowage, linked to an identity-provider subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier; the owner id of every entity they create.
    pub id: Uuid,
    /// Subject identifier issued by the identity provider.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Email address (stored lowercase).
    pub email: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Identity-provider subject.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}
