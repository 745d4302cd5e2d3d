use actix_web::web;

use crate::handlers::auth_handler::current_user;
use crate::middleware::auth::AuthMiddleware;

pub mod admin;
pub mod auth;
pub mod backend_health;
pub mod fan;
pub mod league;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(backend_health::backend_health)
            .service(
                web::scope("/auth")
                    .service(auth::login)
                    .service(auth::register)
                    .service(
                        web::resource("/me")
                            .wrap(AuthMiddleware)
                            .route(web::get().to(current_user))
                    )
            )
            .configure(admin::init_admin_routes)
            .configure(fan::init_fan_routes)
            .service(league::get_matches)
            .service(league::get_active_matchday)
            .service(league::get_latest_results)
            .service(league::get_upcoming_fixtures)
            .service(league::get_matchday)
            .service(league::get_match)
            .service(league::get_goal_events)
            .service(league::get_standings)
            .service(league::get_stats)
            .service(league::get_top_scorers)
            .service(league::get_top_assists)
            .service(league::get_clean_sheets)
            .service(league::get_teams)
            .service(league::get_team)
            .service(league::get_squad)
            .service(league::get_team_matches)
            .service(league::get_players)
            .service(league::get_player)
            .service(league::get_reviews)
    );
}
