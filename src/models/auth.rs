// src/models/auth.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use secrecy::SecretString;
use uuid::Uuid;

use crate::models::user::UserRole;

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(serialize_with = "crate::models::user::serialize_secret_string",
            deserialize_with = "crate::models::user::deserialize_secret_string")]
    pub password: SecretString,
}

/// Self-service sign-up. New accounts always get the `user` role.
#[derive(Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    #[serde(serialize_with = "crate::models::user::serialize_secret_string",
            deserialize_with = "crate::models::user::deserialize_secret_string")]
    pub password: SecretString,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
}
