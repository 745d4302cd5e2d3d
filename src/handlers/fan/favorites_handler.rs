use actix_web::{web, HttpResponse};
use uuid::Uuid;

use super::caller_id;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::fan::FavoriteKind;
use crate::services::FanService;

// GET /user/favorites
pub async fn get_favorites(
    fan_service: web::Data<FanService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = caller_id(&claims)?;
    let favorites = fan_service.favorites(user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Favorites retrieved", favorites)))
}

// POST /user/favorites/teams/{team_id}
pub async fn toggle_favorite_team(
    team_id: web::Path<Uuid>,
    fan_service: web::Data<FanService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, actix_web::Error> {
    toggle(FavoriteKind::Team, team_id.into_inner(), &fan_service, &claims).await
}

// POST /user/favorites/players/{player_id}
pub async fn toggle_favorite_player(
    player_id: web::Path<Uuid>,
    fan_service: web::Data<FanService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, actix_web::Error> {
    toggle(FavoriteKind::Player, player_id.into_inner(), &fan_service, &claims).await
}

#[tracing::instrument(name = "Toggle favorite", skip(fan_service, claims), fields(username = %claims.username))]
async fn toggle(
    kind: FavoriteKind,
    target_id: Uuid,
    fan_service: &FanService,
    claims: &Claims,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = caller_id(claims)?;
    let toggle = fan_service.toggle_favorite(user_id, kind, target_id).await?;
    let message = if toggle.favorite {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, toggle)))
}
