use actix_web::{guard, web};

use crate::handlers::fan::{favorites_handler, review_handler};
use crate::middleware::auth::AuthMiddleware;

/// Signed-in fan routes. `GET /reviews` stays public in the league routes,
/// so posting is guarded by method and falls through for reads.
pub fn init_fan_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .wrap(AuthMiddleware)
            .service(
                web::resource("/favorites")
                    .route(web::get().to(favorites_handler::get_favorites))
            )
            .service(
                web::resource("/favorites/teams/{team_id}")
                    .route(web::post().to(favorites_handler::toggle_favorite_team))
            )
            .service(
                web::resource("/favorites/players/{player_id}")
                    .route(web::post().to(favorites_handler::toggle_favorite_player))
            )
    )
    .service(
        web::resource("/reviews")
            .guard(guard::Post())
            .wrap(AuthMiddleware)
            .route(web::post().to(review_handler::create_review))
    );
}
