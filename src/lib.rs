use actix_web::{http, web, App, HttpServer};
use actix_web::dev::Server;
use tracing_actix_web::TracingLogger;
use std::net::TcpListener;
use actix_cors::Cors;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod game;
mod handlers;
pub mod league;
pub mod middleware;
pub mod models;
mod routes;
pub mod services;
pub mod telemetry;
pub mod utils;

use crate::routes::init_routes;
use crate::config::jwt::JwtSettings;
use crate::services::LeagueServices;

pub fn run(
    listener: TcpListener,
    services: LeagueServices,
    jwt_settings: JwtSettings,
    allowed_origins: Vec<String>,
) -> Result<Server, std::io::Error> {
    // Wrap using web::Data, which boils down to an Arc smart pointer
    let store_data: web::Data<dyn db::LeagueStore> = web::Data::from(services.store.clone());
    let match_service = web::Data::new(services.matches.clone());
    let team_service = web::Data::new(services.teams.clone());
    let fan_service = web::Data::new(services.fans.clone());
    let jwt_settings = web::Data::new(jwt_settings);

    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH"])
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .supports_credentials()
            .max_age(3600);
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .app_data(store_data.clone())
            .app_data(match_service.clone())
            .app_data(team_service.clone())
            .app_data(fan_service.clone())
            .app_data(jwt_settings.clone())
            .configure(init_routes)
    })
    .listen(listener)?
    .run();

    Ok(server)
}
