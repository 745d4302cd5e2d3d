use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;

use crate::auth::jwt::generate_token;
use crate::config::jwt::JwtSettings;
use crate::middleware::auth::Claims;
use crate::db::LeagueStore;
use crate::models::auth::{CurrentUser, LoginRequest, LoginResponse};
use crate::models::common::ApiResponse;
use crate::utils::password::verify_password;

#[tracing::instrument(
    name = "User login",
    skip(login_form, store, jwt_settings),
    fields(username = %login_form.username)
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    store: web::Data<dyn LeagueStore>,
    jwt_settings: web::Data<JwtSettings>,
) -> HttpResponse {
    let user = match store.find_user_by_username(&login_form.username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("User not found or invalid credentials");
            return HttpResponse::Unauthorized()
                .json(ApiResponse::<()>::error("Invalid username or password"));
        }
        Err(e) => {
            tracing::error!("Failed to load user: {}", e);
            return HttpResponse::ServiceUnavailable()
                .json(ApiResponse::<()>::error(e.public_message()));
        }
    };

    if !verify_password(login_form.password.expose_secret(), &user.password_hash) {
        tracing::info!("Invalid password");
        return HttpResponse::Unauthorized()
            .json(ApiResponse::<()>::error("Invalid username or password"));
    }

    match generate_token(&user, &jwt_settings) {
        Ok((token, expires_at)) => HttpResponse::Ok().json(ApiResponse::success(
            "Login successful",
            LoginResponse {
                token,
                username: user.username,
                role: user.role,
                expires_at,
            },
        )),
        Err(e) => {
            tracing::error!("Error generating JWT token: {:?}", e);
            HttpResponse::InternalServerError().json(ApiResponse::<()>::error("Could not issue token"))
        }
    }
}

/// Identity carried by the caller's token.
pub async fn current_user(claims: web::ReqData<Claims>) -> HttpResponse {
    let Some(user_id) = claims.user_id() else {
        return HttpResponse::Unauthorized().json(ApiResponse::<()>::error("Invalid token subject"));
    };
    HttpResponse::Ok().json(ApiResponse::success(
        "Current user retrieved",
        CurrentUser {
            user_id,
            username: claims.username.clone(),
            role: claims.role,
        },
    ))
}
