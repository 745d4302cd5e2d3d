use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

use matchday_backend::error::LeagueError;
use matchday_backend::models::goal_event::GoalEvent;
use matchday_backend::models::user::{User, UserRole};

mod common;
use common::league_helpers::{
    create_match, create_team_with_squad, delete_goal, finish_match, get_data, get_events, get_match, player,
    record_goal, standing_of, start_held_match, start_match, unique_name,
};
use common::utils::{admin_token, spawn_pg_app_with_goals, spawn_pg_app_with_held_simulations};

#[tokio::test]
async fn postgres_simulated_match_runs_through_the_lifecycle() {
    let Some(test_app) = spawn_pg_app_with_goals(3).await else {
        return;
    };
    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team_with_squad(&test_app, &token, &unique_name("Away")).await;
    let match_id = create_match(&test_app, &token, home.team_id, away.team_id, 1).await;
    assert_eq!(get_match(&test_app, match_id).await["status"], "SCHEDULED");

    let response = start_match(&test_app, &token, match_id).await;
    assert_eq!(response.status().as_u16(), 200);
    test_app.wait_for_simulation(match_id).await;

    let fixture = get_match(&test_app, match_id).await;
    assert_eq!(fixture["status"], "FINISHED");
    let events = get_events(&test_app, match_id).await;
    assert_eq!(events.len(), 3);

    let home_goals = events.iter().filter(|e| e["is_home_goal"] == true).count() as i64;
    assert_eq!(fixture["home_score"].as_i64().unwrap(), home_goals);
    assert_eq!(fixture["away_score"].as_i64().unwrap(), 3 - home_goals);

    let home_row = standing_of(&test_app, home.team_id).await;
    let away_row = standing_of(&test_app, away.team_id).await;
    assert_eq!(home_row["played"], 1);
    assert_eq!(away_row["played"], 1);
    assert_eq!(home_row["goals_for"].as_i64().unwrap(), home_goals);

    // Finished is terminal in the database too
    let response = finish_match(&test_app, &token, match_id).await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn postgres_retroactive_delete_rebuilds_table_and_statistics() {
    let Some(test_app) = spawn_pg_app_with_held_simulations().await else {
        return;
    };
    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team_with_squad(&test_app, &token, &unique_name("Away")).await;

    let match_id = create_match(&test_app, &token, home.team_id, away.team_id, 1).await;
    start_held_match(&test_app, &token, match_id).await;
    record_goal(&test_app, &token, match_id, home.striker(), None, 20, true).await;
    let late = record_goal(&test_app, &token, match_id, away.striker(), Some(away.playmaker()), 88, false).await;
    finish_match(&test_app, &token, match_id).await;

    assert_eq!(standing_of(&test_app, home.team_id).await["points"], 1);
    assert_eq!(player(&test_app, away.striker()).await["goals"], 1);

    let response = delete_goal(&test_app, &token, match_id, late).await;
    assert_eq!(response.status().as_u16(), 200);

    let fixture = get_match(&test_app, match_id).await;
    assert_eq!(fixture["home_score"], 1);
    assert_eq!(fixture["away_score"], 0);

    let home_row = standing_of(&test_app, home.team_id).await;
    assert_eq!(home_row["played"], 1);
    assert_eq!(home_row["wins"], 1);
    assert_eq!(home_row["points"], 3);
    let away_row = standing_of(&test_app, away.team_id).await;
    assert_eq!(away_row["losses"], 1);
    assert_eq!(away_row["points"], 0);

    assert_eq!(player(&test_app, away.striker()).await["goals"], 0);
    assert_eq!(player(&test_app, away.playmaker()).await["assists"], 0);
    assert_eq!(player(&test_app, home.goalkeeper).await["clean_sheets"], 1);

    // A rebuild over the same rows changes nothing
    let response = Client::new()
        .post(&test_app.api("/admin/standings/rebuild"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["matches_replayed"], 1);
    assert_eq!(standing_of(&test_app, home.team_id).await["points"], 3);
}

#[tokio::test]
async fn postgres_away_clean_sheet_is_credited() {
    let Some(test_app) = spawn_pg_app_with_held_simulations().await else {
        return;
    };
    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team_with_squad(&test_app, &token, &unique_name("Away")).await;

    let match_id = create_match(&test_app, &token, home.team_id, away.team_id, 1).await;
    start_held_match(&test_app, &token, match_id).await;
    for minute in [10, 55] {
        record_goal(&test_app, &token, match_id, away.striker(), None, minute, false).await;
    }
    finish_match(&test_app, &token, match_id).await;

    assert_eq!(player(&test_app, away.goalkeeper).await["clean_sheets"], 1);
    assert_eq!(player(&test_app, home.goalkeeper).await["clean_sheets"], 0);

    let clean_sheets = get_data(&test_app, "/stats/clean-sheets").await;
    assert_eq!(clean_sheets.as_array().unwrap().len(), 1);
    assert_eq!(clean_sheets[0]["player_id"], away.goalkeeper.to_string());
}

#[tokio::test]
async fn postgres_schema_rejects_duplicate_usernames_and_late_minutes() {
    let Some(test_app) = spawn_pg_app_with_held_simulations().await else {
        return;
    };
    let store = test_app.services.store.clone();

    let duplicate = User {
        id: Uuid::new_v4(),
        username: test_app.user_username.clone(),
        password_hash: "not-a-hash".to_string(),
        role: UserRole::User,
        created_at: Utc::now(),
    };
    let result = store.insert_user(&duplicate).await;
    assert!(matches!(result, Err(LeagueError::InvalidInput(_))), "got {:?}", result);

    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team_with_squad(&test_app, &token, &unique_name("Away")).await;
    let match_id = create_match(&test_app, &token, home.team_id, away.team_id, 1).await;

    let stoppage_time = GoalEvent {
        id: Uuid::new_v4(),
        match_id,
        matchday: 1,
        scorer_id: home.striker(),
        scorer_name: "Striker".to_string(),
        assist_id: None,
        assist_name: None,
        team_id: home.team_id,
        team_name: home.name.clone(),
        minute: 91,
        is_home_goal: true,
        created_at: Utc::now(),
    };
    assert!(store.insert_goal_event(&stoppage_time).await.is_err());
    assert!(get_events(&test_app, match_id).await.is_empty());
}
