//! Users are keyed by the identity provider's subject identifier.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use stowage_core::error::AppError;
use stowage_core::result::AppResult;
use stowage_core::traits::VerifiedIdentity;
use stowage_database::EntityStore;
use stowage_entity::{CreateUser, User};

use crate::naming::normalize_name;

/// Registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub external_id: String,
}

#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<dyn EntityStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Register a new user. A second registration for the same subject or
    /// email is a `Conflict`.
    pub async fn register(&self, req: RegisterUser) -> AppResult<User> {
        let name = normalize_name(&req.name, "Name")?;
        let external_id = req.external_id.trim();
        if external_id.is_empty() {
            return Err(AppError::validation("external_id cannot be empty"));
        }
        let email = req.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }

        if self.store.find_user_by_external_id(external_id).await?.is_some() {
            return Err(AppError::conflict("User is already registered"));
        }

        let user = self
            .store
            .insert_user(&CreateUser {
                external_id: external_id.to_string(),
                name,
                email,
            })
            .await?;
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Look up a registered user by subject.
    pub async fn login(&self, external_id: &str) -> AppResult<User> {
        let user = self
            .store
            .find_user_by_external_id(external_id.trim())
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    pub async fn profile(&self, user_id: Uuid) -> AppResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Map a verified bearer identity to its user. Subjects that never
    /// registered are not authenticated.
    pub async fn resolve_identity(&self, identity: &VerifiedIdentity) -> AppResult<User> {
        self.store
            .find_user_by_external_id(&identity.subject)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Unknown user"))
    }
}
