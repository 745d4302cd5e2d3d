use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use once_cell::sync::Lazy;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;

use matchday_backend::run;
use matchday_backend::config::jwt::JwtSettings;
use matchday_backend::config::settings::{get_config, DatabaseSettings};
use matchday_backend::config::simulation::SimulationSettings;
use matchday_backend::db::{InMemoryLeagueStore, LeagueStore, PgLeagueStore};
use matchday_backend::models::user::{User, UserRole};
use matchday_backend::services::{EventPublisher, InstantPacer, LeagueServices, Pacer, TokioPacer};
use matchday_backend::telemetry::{get_subscriber, init_subscriber};

pub const TEST_PASSWORD: &str = "password123";

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub services: LeagueServices,
    pub admin_username: String,
    pub user_username: String,
}

impl TestApp {
    pub fn api(&self, path: &str) -> String {
        format!("{}/api{}", self.address, path)
    }

    /// Wait until the live simulation of `match_id` is over.
    pub async fn wait_for_simulation(&self, match_id: Uuid) {
        self.services.matches.registry().wait_for(match_id).await;
    }
}

/// Simulations play out immediately with the default goal distribution.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(SimulationSettings::default(), Arc::new(InstantPacer)).await
}

/// Every simulation schedules `goals` goals and completes immediately.
pub async fn spawn_app_with_goals(goals: usize) -> TestApp {
    let settings = SimulationSettings {
        goal_count_thresholds: vec![0.0; goals],
        ..SimulationSettings::default()
    };
    spawn_app_with(settings, Arc::new(InstantPacer)).await
}

/// Simulations wait an hour before their only goal, so a started match stays
/// live without generated events until it is finished by hand.
pub async fn spawn_app_with_held_simulations() -> TestApp {
    let settings = SimulationSettings {
        goal_count_thresholds: vec![0.0],
        min_delay_ms: 3_600_000,
        max_delay_ms: 3_600_000,
        ..SimulationSettings::default()
    };
    spawn_app_with(settings, Arc::new(TokioPacer)).await
}

pub async fn spawn_app_with(simulation: SimulationSettings, pacer: Arc<dyn Pacer>) -> TestApp {
    spawn_app_on(Arc::new(InMemoryLeagueStore::new()), simulation, pacer).await
}

/// Postgres-backed app whose simulations schedule `goals` goals and complete immediately.
pub async fn spawn_pg_app_with_goals(goals: usize) -> Option<TestApp> {
    let settings = SimulationSettings {
        goal_count_thresholds: vec![0.0; goals],
        ..SimulationSettings::default()
    };
    spawn_pg_app_with(settings, Arc::new(InstantPacer)).await
}

/// Postgres-backed app whose started matches stay live until finished by hand.
pub async fn spawn_pg_app_with_held_simulations() -> Option<TestApp> {
    let settings = SimulationSettings {
        goal_count_thresholds: vec![0.0],
        min_delay_ms: 3_600_000,
        max_delay_ms: 3_600_000,
        ..SimulationSettings::default()
    };
    spawn_pg_app_with(settings, Arc::new(TokioPacer)).await
}

/// Same app over a fresh Postgres database created from `configuration/`.
/// Returns `None` when no Postgres server is reachable.
pub async fn spawn_pg_app_with(simulation: SimulationSettings, pacer: Arc<dyn Pacer>) -> Option<TestApp> {
    Lazy::force(&TRACING);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database).await?;

    let store: Arc<dyn LeagueStore> = Arc::new(PgLeagueStore::new(
        connection_pool,
        configuration.database.timeouts(),
    ));
    Some(spawn_app_on(store, simulation, pacer).await)
}

pub async fn configure_db(config: &DatabaseSettings) -> Option<PgPool> {
    // Create database
    let connect = PgConnection::connect(&config.connection_string_without_db());
    let mut connection = match tokio::time::timeout(Duration::from_secs(5), connect).await {
        Ok(Ok(connection)) => connection,
        Ok(Err(e)) => {
            eprintln!("Skipping Postgres-backed test, server unavailable: {}", e);
            return None;
        }
        Err(_) => {
            eprintln!("Skipping Postgres-backed test, connection timed out");
            return None;
        }
    };
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    // Migrate database
    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    Some(connection_pool)
}

async fn spawn_app_on(
    store: Arc<dyn LeagueStore>,
    simulation: SimulationSettings,
    pacer: Arc<dyn Pacer>,
) -> TestApp {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let admin_username = format!("admin{}", Uuid::new_v4().simple());
    let user_username = format!("fan{}", Uuid::new_v4().simple());
    insert_user(store.as_ref(), &admin_username, UserRole::Admin).await;
    insert_user(store.as_ref(), &user_username, UserRole::User).await;

    let services = LeagueServices::build(store, simulation, pacer, EventPublisher::disabled());
    let jwt_settings = JwtSettings::new("test-secret-key-for-integration-tests".to_string(), 1);

    let server = run(listener, services.clone(), jwt_settings, vec![])
        .expect("Failed to bind address");
    // Launch the server as a background task
    let _ = tokio::spawn(server);

    TestApp {
        address,
        services,
        admin_username,
        user_username,
    }
}

async fn insert_user(store: &dyn LeagueStore, username: &str, role: UserRole) {
    // Low cost keeps the suite fast; verification works for any cost.
    let password_hash = bcrypt::hash(TEST_PASSWORD, 4).expect("Failed to hash password");
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash,
        role,
        created_at: Utc::now(),
    };
    store.insert_user(&user).await.expect("Failed to insert user");
}

pub async fn login(app: &TestApp, username: &str) -> String {
    let client = Client::new();
    let response = client
        .post(&app.api("/auth/login"))
        .json(&json!({
            "username": username,
            "password": TEST_PASSWORD
        }))
        .send()
        .await
        .expect("Failed to execute login request.");
    assert!(response.status().is_success(), "Login should succeed");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

pub async fn admin_token(app: &TestApp) -> String {
    login(app, &app.admin_username).await
}

pub async fn user_token(app: &TestApp) -> String {
    login(app, &app.user_username).await
}
