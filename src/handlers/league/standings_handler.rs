use actix_web::{web, HttpResponse};

use crate::error::LeagueError;
use crate::models::common::ApiResponse;
use crate::services::MatchService;

pub async fn get_standings(match_service: web::Data<MatchService>) -> Result<HttpResponse, LeagueError> {
    let table = match_service.aggregates().standings().table().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Standings retrieved", table)))
}
