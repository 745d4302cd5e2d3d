use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::team::{CreatePlayerRequest, CreateTeamRequest, UpdatePlayerRequest};
use crate::services::TeamService;

// POST /admin/teams
#[tracing::instrument(name = "Admin create team", skip(request, team_service, claims), fields(admin = %claims.username))]
pub async fn create_team(
    request: web::Json<CreateTeamRequest>,
    team_service: web::Data<TeamService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let team = team_service.create_team(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Team created", team)))
}

// POST /admin/players
#[tracing::instrument(name = "Admin create player", skip(request, team_service, claims), fields(admin = %claims.username))]
pub async fn create_player(
    request: web::Json<CreatePlayerRequest>,
    team_service: web::Data<TeamService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let player = team_service.create_player(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Player registered", player)))
}

// PUT /admin/players/{id}
#[tracing::instrument(name = "Admin update player", skip(request, team_service, claims), fields(admin = %claims.username))]
pub async fn update_player(
    player_id: web::Path<Uuid>,
    request: web::Json<UpdatePlayerRequest>,
    team_service: web::Data<TeamService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let player = team_service
        .update_player(player_id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player updated", player)))
}

// DELETE /admin/players/{id}
#[tracing::instrument(name = "Admin delete player", skip(team_service, claims), fields(admin = %claims.username))]
pub async fn delete_player(
    player_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    team_service.delete_player(player_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Player deleted")))
}
