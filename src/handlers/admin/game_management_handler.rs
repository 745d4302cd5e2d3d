use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::middleware::auth::Claims;
use crate::models::common::ApiResponse;
use crate::models::goal_event::{GoalEventUpdate, NewGoalEvent};
use crate::models::league::{ActiveSimulationsResponse, CreateMatchRequest};
use crate::services::MatchService;

// POST /admin/matches - Schedule a match
#[tracing::instrument(
    name = "Admin create match",
    skip(request, match_service, claims),
    fields(admin = %claims.username, matchday = request.matchday)
)]
pub async fn create_match(
    request: web::Json<CreateMatchRequest>,
    match_service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let fixture = match_service.create_match(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Match scheduled", fixture)))
}

// PATCH /admin/matches/{id}/start - Kick off a match and its live simulation
#[tracing::instrument(
    name = "Admin start match",
    skip(match_service, claims),
    fields(admin = %claims.username)
)]
pub async fn start_match(
    match_id: web::Path<Uuid>,
    match_service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let fixture = match_service.start_match(match_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match started", fixture)))
}

// PATCH /admin/matches/{id}/finish - Final whistle
#[tracing::instrument(
    name = "Admin finish match",
    skip(match_service, claims),
    fields(admin = %claims.username)
)]
pub async fn finish_match(
    match_id: web::Path<Uuid>,
    match_service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let fixture = match_service.finish_match(match_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match finished", fixture)))
}

// POST /admin/matches/{id}/events - Record a goal by hand
#[tracing::instrument(
    name = "Admin add goal event",
    skip(request, match_service, claims),
    fields(admin = %claims.username)
)]
pub async fn add_goal_event(
    match_id: web::Path<Uuid>,
    request: web::Json<NewGoalEvent>,
    match_service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let event = match_service
        .add_goal_event(match_id.into_inner(), request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Goal event added", event)))
}

// PUT /admin/matches/{id}/events/{event_id}
#[tracing::instrument(
    name = "Admin edit goal event",
    skip(request, match_service, claims),
    fields(admin = %claims.username)
)]
pub async fn edit_goal_event(
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<GoalEventUpdate>,
    match_service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let (match_id, event_id) = path.into_inner();
    let event = match_service
        .edit_goal_event(match_id, event_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Goal event updated", event)))
}

// DELETE /admin/matches/{id}/events/{event_id}
#[tracing::instrument(
    name = "Admin delete goal event",
    skip(match_service, claims),
    fields(admin = %claims.username)
)]
pub async fn delete_goal_event(
    path: web::Path<(Uuid, Uuid)>,
    match_service: web::Data<MatchService>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, LeagueError> {
    let (match_id, event_id) = path.into_inner();
    match_service.delete_goal_event(match_id, event_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Goal event deleted")))
}

// GET /admin/simulations - Matches with a running simulation
pub async fn get_active_simulations(match_service: web::Data<MatchService>) -> HttpResponse {
    let match_ids = match_service.active_simulations().await;
    HttpResponse::Ok().json(ApiResponse::success(
        "Active simulations retrieved",
        ActiveSimulationsResponse { match_ids },
    ))
}
