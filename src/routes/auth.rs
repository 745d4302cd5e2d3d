// src/routes/auth.rs
use actix_web::{post, web, HttpResponse};

use crate::config::jwt::JwtSettings;
use crate::db::LeagueStore;
use crate::error::LeagueError;
use crate::handlers::auth_handler::login_user;
use crate::handlers::registration_handler::register_user;
use crate::models::auth::{LoginRequest, RegistrationRequest};

#[post("/login")]
async fn login(
    login_form: web::Json<LoginRequest>,
    store: web::Data<dyn LeagueStore>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    login_user(login_form, store, jwt_settings).await
}

#[post("/register")]
async fn register(
    user_form: web::Json<RegistrationRequest>,
    store: web::Data<dyn LeagueStore>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, LeagueError> {
    register_user(user_form, store, jwt_settings).await
}
