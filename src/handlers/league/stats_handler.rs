use actix_web::{web, HttpResponse};

use crate::error::LeagueError;
use crate::league::statistics::{Leaderboard, DEFAULT_LEADERBOARD_SIZE};
use crate::models::common::{ApiResponse, LimitQuery};
use crate::services::MatchService;

pub async fn get_stats_overview(match_service: web::Data<MatchService>) -> Result<HttpResponse, LeagueError> {
    let overview = match_service
        .aggregates()
        .statistics()
        .overview(DEFAULT_LEADERBOARD_SIZE)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Statistics retrieved", overview)))
}

pub async fn get_leaderboard(
    board: Leaderboard,
    query: web::Query<LimitQuery>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    let entries = match_service
        .aggregates()
        .statistics()
        .leaderboard(board, query.limit_or(DEFAULT_LEADERBOARD_SIZE))
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Leaderboard retrieved", entries)))
}
