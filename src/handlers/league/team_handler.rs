use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::models::common::ApiResponse;
use crate::services::TeamService;

pub async fn get_teams(team_service: web::Data<TeamService>) -> Result<HttpResponse, LeagueError> {
    let teams = team_service.list_teams().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Teams retrieved", teams)))
}

pub async fn get_team(
    team_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
) -> Result<HttpResponse, LeagueError> {
    let team = team_service.get_team(team_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Team retrieved", team)))
}

pub async fn get_squad(
    team_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
) -> Result<HttpResponse, LeagueError> {
    let squad = team_service.squad(team_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Squad retrieved", squad)))
}

#[tracing::instrument(name = "Get team matches", skip(team_service))]
pub async fn get_team_matches(
    team_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
) -> Result<HttpResponse, LeagueError> {
    let overview = team_service.team_matches(team_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Team matches retrieved", overview)))
}

pub async fn get_players(team_service: web::Data<TeamService>) -> Result<HttpResponse, LeagueError> {
    let players = team_service.list_players().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Players retrieved", players)))
}

pub async fn get_player(
    player_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
) -> Result<HttpResponse, LeagueError> {
    let player = team_service.get_player(player_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player retrieved", player)))
}
