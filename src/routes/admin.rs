use actix_web::web;

use crate::handlers::admin::{game_management_handler, league_handler, review_handler, team_handler};
use crate::middleware::admin::AdminMiddleware;

pub fn init_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AdminMiddleware)
            // Match lifecycle
            .service(
                web::resource("/matches")
                    .route(web::post().to(game_management_handler::create_match))
            )
            .service(
                web::resource("/matches/{id}/start")
                    .route(web::patch().to(game_management_handler::start_match))
            )
            .service(
                web::resource("/matches/{id}/finish")
                    .route(web::patch().to(game_management_handler::finish_match))
            )

            // Goal event corrections
            .service(
                web::resource("/matches/{id}/events")
                    .route(web::post().to(game_management_handler::add_goal_event))
            )
            .service(
                web::resource("/matches/{id}/events/{event_id}")
                    .route(web::put().to(game_management_handler::edit_goal_event))
                    .route(web::delete().to(game_management_handler::delete_goal_event))
            )
            .service(
                web::resource("/simulations")
                    .route(web::get().to(game_management_handler::get_active_simulations))
            )

            // Derived tables
            .service(
                web::resource("/standings/rebuild")
                    .route(web::post().to(league_handler::rebuild_standings))
            )
            .service(
                web::resource("/stats/rebuild")
                    .route(web::post().to(league_handler::rebuild_statistics))
            )

            // Teams and squads
            .service(
                web::resource("/teams")
                    .route(web::post().to(team_handler::create_team))
            )
            .service(
                web::resource("/players")
                    .route(web::post().to(team_handler::create_player))
            )
            .service(
                web::resource("/players/{id}")
                    .route(web::put().to(team_handler::update_player))
                    .route(web::delete().to(team_handler::delete_player))
            )

            // Moderation
            .service(
                web::resource("/reviews/{id}")
                    .route(web::delete().to(review_handler::delete_review))
            )
    );
}
