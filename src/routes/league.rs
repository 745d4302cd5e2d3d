use actix_web::{get, web, HttpResponse};
use uuid::Uuid;

use crate::error::LeagueError;
use crate::handlers::fan::review_handler;
use crate::handlers::league::{match_handler, standings_handler, stats_handler, team_handler};
use crate::league::statistics::Leaderboard;
use crate::models::common::LimitQuery;
use crate::models::fan::ReviewQuery;
use crate::services::{FanService, MatchService, TeamService};

#[get("/matches")]
async fn get_matches(match_service: web::Data<MatchService>) -> Result<HttpResponse, LeagueError> {
    match_handler::get_matches(match_service).await
}

#[get("/matches/active-matchday")]
async fn get_active_matchday(match_service: web::Data<MatchService>) -> Result<HttpResponse, LeagueError> {
    match_handler::get_active_matchday(match_service).await
}

#[get("/matches/latest")]
async fn get_latest_results(
    query: web::Query<LimitQuery>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    match_handler::get_latest_results(query, match_service).await
}

#[get("/matches/upcoming")]
async fn get_upcoming_fixtures(
    query: web::Query<LimitQuery>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    match_handler::get_upcoming_fixtures(query, match_service).await
}

#[get("/matches/matchday/{matchday}")]
async fn get_matchday(
    matchday: web::Path<i32>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    match_handler::get_matchday(matchday, match_service).await
}

#[get("/matches/{match_id}")]
async fn get_match(
    match_id: web::Path<Uuid>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    match_handler::get_match(match_id, match_service).await
}

#[get("/matches/{match_id}/events")]
async fn get_goal_events(
    match_id: web::Path<Uuid>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    match_handler::get_goal_events(match_id, match_service).await
}

#[get("/standings")]
async fn get_standings(match_service: web::Data<MatchService>) -> Result<HttpResponse, LeagueError> {
    standings_handler::get_standings(match_service).await
}

#[get("/stats")]
async fn get_stats(match_service: web::Data<MatchService>) -> Result<HttpResponse, LeagueError> {
    stats_handler::get_stats_overview(match_service).await
}

#[get("/stats/top-scorers")]
async fn get_top_scorers(
    query: web::Query<LimitQuery>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    stats_handler::get_leaderboard(Leaderboard::Goals, query, match_service).await
}

#[get("/stats/top-assists")]
async fn get_top_assists(
    query: web::Query<LimitQuery>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    stats_handler::get_leaderboard(Leaderboard::Assists, query, match_service).await
}

#[get("/stats/clean-sheets")]
async fn get_clean_sheets(
    query: web::Query<LimitQuery>,
    match_service: web::Data<MatchService>,
) -> Result<HttpResponse, LeagueError> {
    stats_handler::get_leaderboard(Leaderboard::CleanSheets, query, match_service).await
}

#[get("/teams")]
async fn get_teams(team_service: web::Data<TeamService>) -> Result<HttpResponse, LeagueError> {
    team_handler::get_teams(team_service).await
}

#[get("/teams/{team_id}")]
async fn get_team(
    team_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
) -> Result<HttpResponse, LeagueError> {
    team_handler::get_team(team_id, team_service).await
}

#[get("/teams/{team_id}/squad")]
async fn get_squad(
    team_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
) -> Result<HttpResponse, LeagueError> {
    team_handler::get_squad(team_id, team_service).await
}

#[get("/teams/{team_id}/matches")]
async fn get_team_matches(
    team_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
) -> Result<HttpResponse, LeagueError> {
    team_handler::get_team_matches(team_id, team_service).await
}

#[get("/players")]
async fn get_players(team_service: web::Data<TeamService>) -> Result<HttpResponse, LeagueError> {
    team_handler::get_players(team_service).await
}

#[get("/players/{player_id}")]
async fn get_player(
    player_id: web::Path<Uuid>,
    team_service: web::Data<TeamService>,
) -> Result<HttpResponse, LeagueError> {
    team_handler::get_player(player_id, team_service).await
}

#[get("/reviews")]
async fn get_reviews(
    query: web::Query<ReviewQuery>,
    fan_service: web::Data<FanService>,
) -> Result<HttpResponse, LeagueError> {
    review_handler::get_reviews(query, fan_service).await
}
