use actix_web::{web, HttpResponse};
use chrono::Utc;
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::auth::jwt::generate_token;
use crate::config::jwt::JwtSettings;
use crate::db::LeagueStore;
use crate::error::LeagueError;
use crate::models::auth::{LoginResponse, RegistrationRequest};
use crate::models::common::ApiResponse;
use crate::models::user::{User, UserRole};
use crate::utils::password::hash_password;

pub const MIN_PASSWORD_LENGTH: usize = 6;
// bcrypt only reads the first 72 bytes
pub const MAX_PASSWORD_BYTES: usize = 72;
const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=64;

fn validate_username(username: &str) -> Result<&str, LeagueError> {
    let username = username.trim();
    if !USERNAME_LENGTH.contains(&username.chars().count()) {
        return Err(LeagueError::InvalidInput(
            "username must be between 3 and 64 characters".to_string(),
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(LeagueError::InvalidInput(
            "username may only contain letters, digits, '_', '-' and '.'".to_string(),
        ));
    }
    Ok(username)
}

fn validate_password(password: &str) -> Result<(), LeagueError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(LeagueError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(LeagueError::InvalidInput(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, store, jwt_settings),
    fields(username = %user_form.username)
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    store: web::Data<dyn LeagueStore>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, LeagueError> {
    let username = validate_username(&user_form.username)?;
    let password = user_form.password.expose_secret();
    validate_password(password)?;

    if store.find_user_by_username(username).await?.is_some() {
        return Err(LeagueError::InvalidInput(format!("username {} is taken", username)));
    }

    let password_hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {:?}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Could not create account")));
        }
    };

    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash,
        role: UserRole::User,
        created_at: Utc::now(),
    };
    store.insert_user(&user).await?;
    tracing::info!("Registered user {} ({})", user.username, user.id);

    match generate_token(&user, &jwt_settings) {
        Ok((token, expires_at)) => Ok(HttpResponse::Created().json(ApiResponse::success(
            "Registration successful",
            LoginResponse {
                token,
                username: user.username,
                role: user.role,
                expires_at,
            },
        ))),
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Account created, please log in")))
        }
    }
}
