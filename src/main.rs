use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use chrono::Utc;
use uuid::Uuid;

use matchday_backend::run;
use matchday_backend::config::settings::{get_config, get_jwt_settings, get_redis_url, AdminBootstrap};
use matchday_backend::db::{LeagueStore, PgLeagueStore};
use matchday_backend::models::user::{User, UserRole};
use matchday_backend::services::{EventPublisher, LeagueServices, TokioPacer};
use matchday_backend::telemetry::{get_subscriber, init_subscriber};
use matchday_backend::utils::password::hash_password;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Panic if we can't read the config
    let config = get_config().expect("Failed to read the config.");

    let subscriber = get_subscriber(
        "matchday-backend".into(),
        config.application.log_level.clone(),
        std::io::stdout
    );
    init_subscriber(subscriber);

    let jwt_settings = get_jwt_settings(&config);

    // Live event broadcast is optional
    let publisher = match get_redis_url(&config) {
        Some(url) => match redis::Client::open(url.expose_secret()) {
            Ok(client) => {
                tracing::info!("Redis client created successfully");
                EventPublisher::new(Some(Arc::new(client)))
            }
            Err(e) => {
                tracing::error!("Failed to create Redis client: {}. Live broadcast disabled.", e);
                EventPublisher::disabled()
            }
        },
        None => {
            tracing::info!("No redis section configured, live broadcast disabled");
            EventPublisher::disabled()
        }
    };

    // Only try to establish connection when actually used
    let connection_pool = PgPoolOptions::new()
        .max_connections(32)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_lazy(config.database.connection_string().expose_secret())
        .expect("Failed to create Postgres connection pool");

    if let Err(e) = sqlx::migrate!("./migrations").run(&connection_pool).await {
        tracing::error!("❌ Failed to run database migrations: {}", e);
        std::process::exit(1);
    }

    let store: Arc<dyn LeagueStore> = Arc::new(PgLeagueStore::new(
        connection_pool,
        config.database.timeouts(),
    ));

    if let Some(admin) = &config.admin {
        if let Err(e) = ensure_admin(store.as_ref(), admin).await {
            tracing::error!("❌ Failed to bootstrap admin account: {}", e);
        }
    }

    let services = LeagueServices::build(
        store,
        config.simulation.clone(),
        Arc::new(TokioPacer),
        publisher,
    );

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("✅ Listening on {}", address);

    let server = run(
        listener,
        services.clone(),
        jwt_settings,
        config.application.allowed_origins.clone(),
    )?;
    let result = server.await;

    services.matches.shutdown(SHUTDOWN_GRACE).await;
    result
}

async fn ensure_admin(
    store: &dyn LeagueStore,
    admin: &AdminBootstrap,
) -> Result<(), Box<dyn std::error::Error>> {
    if store.find_user_by_username(&admin.username).await?.is_some() {
        return Ok(());
    }

    let user = User {
        id: Uuid::new_v4(),
        username: admin.username.clone(),
        password_hash: hash_password(admin.password.expose_secret())?,
        role: UserRole::Admin,
        created_at: Utc::now(),
    };
    store.insert_user(&user).await?;
    tracing::info!("Created admin account {}", admin.username);
    Ok(())
}
