use actix_web::{web, HttpResponse};

use crate::error::LeagueError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::league::RebuildResponse;
use crate::services::MatchService;

// POST /admin/standings/rebuild - Replay every finished match into a fresh table
#[tracing::instrument(name = "Admin rebuild standings", skip(match_service, claims), fields(admin = %claims.username))]
pub async fn rebuild_standings(
    match_service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let matches_replayed = match_service.rebuild_standings().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Standings rebuilt",
        RebuildResponse { matches_replayed },
    )))
}

// POST /admin/stats/rebuild - Recompute every player's goals, assists and clean sheets
#[tracing::instrument(name = "Admin rebuild statistics", skip(match_service, claims), fields(admin = %claims.username))]
pub async fn rebuild_statistics(
    match_service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let matches_replayed = match_service.rebuild_statistics().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Player statistics rebuilt",
        RebuildResponse { matches_replayed },
    )))
}
