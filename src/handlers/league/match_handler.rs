use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::models::common::{ApiResponse, LimitQuery};
use crate::models::league::ActiveMatchdayResponse;
use crate::services::MatchService;

const DEFAULT_LIST_LIMIT: usize = 10;

pub async fn get_matches(match_service: web::Data<MatchService>) -> Result<HttpResponse, LeagueError> {
    let matches = match_service.list_matches().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Matches retrieved", matches)))
}

#[tracing::instrument(name = "Get match", skip(match_service))]
pub async fn get_match(
    match_id: web::Path<Uuid>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    let summary = match_service.get_match(match_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match retrieved", summary)))
}

pub async fn get_matchday(
    matchday: web::Path<i32>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    let matches = match_service.matches_for_matchday(matchday.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Matchday retrieved", matches)))
}

pub async fn get_active_matchday(match_service: web::Data<MatchService>) -> Result<HttpResponse, LeagueError> {
    let matchday = match_service.get_active_matchday().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Active matchday retrieved",
        ActiveMatchdayResponse { matchday },
    )))
}

pub async fn get_latest_results(
    query: web::Query<LimitQuery>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    let results = match_service.latest_results(query.limit_or(DEFAULT_LIST_LIMIT)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Latest results retrieved", results)))
}

pub async fn get_upcoming_fixtures(
    query: web::Query<LimitQuery>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    let fixtures = match_service.upcoming_fixtures(query.limit_or(DEFAULT_LIST_LIMIT)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Upcoming fixtures retrieved", fixtures)))
}

#[tracing::instrument(name = "Get goal events", skip(match_service))]
pub async fn get_goal_events(
    match_id: web::Path<Uuid>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    let events = match_service.get_goal_events(match_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Goal events retrieved", events)))
}
