use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use uuid::Uuid;

mod common;
use common::league_helpers::{
    create_match, create_team, create_team_with_squad, finish_match, get_events, get_match,
    standing_of, start_held_match, start_match, unique_name,
};
use common::utils::{admin_token, spawn_app, spawn_app_with_goals, spawn_app_with_held_simulations};

#[tokio::test]
async fn simulated_match_runs_to_completion() {
    let test_app = spawn_app_with_goals(4).await;
    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team_with_squad(&test_app, &token, &unique_name("Away")).await;
    let match_id = create_match(&test_app, &token, home.team_id, away.team_id, 1).await;

    let response = start_match(&test_app, &token, match_id).await;
    assert_eq!(response.status().as_u16(), 200);
    test_app.wait_for_simulation(match_id).await;

    let fixture = get_match(&test_app, match_id).await;
    assert_eq!(fixture["status"], "FINISHED");

    let events = get_events(&test_app, match_id).await;
    assert_eq!(events.len(), 4, "Every scheduled goal should be emitted");

    let home_goals = events.iter().filter(|e| e["is_home_goal"] == true).count() as i64;
    let away_goals = events.len() as i64 - home_goals;
    assert_eq!(fixture["home_score"].as_i64().unwrap(), home_goals);
    assert_eq!(fixture["away_score"].as_i64().unwrap(), away_goals);

    let home_players: HashSet<String> = home.all_players().iter().map(Uuid::to_string).collect();
    let away_players: HashSet<String> = away.all_players().iter().map(Uuid::to_string).collect();

    let mut previous_minute = 0;
    for event in &events {
        let minute = event["minute"].as_i64().unwrap();
        assert!((1..=90).contains(&minute), "Minute {} out of range", minute);
        assert!(minute >= previous_minute, "Events should come in minute order");
        previous_minute = minute;

        let (squad, team) = if event["is_home_goal"] == true {
            (&home_players, &home)
        } else {
            (&away_players, &away)
        };
        let scorer = event["scorer_id"].as_str().unwrap();
        assert!(squad.contains(scorer), "Scorer must play for the scoring side");
        assert_eq!(event["team_id"], team.team_id.to_string());
        assert_eq!(event["team_name"], team.name);

        if let Some(assist) = event["assist_id"].as_str() {
            assert!(squad.contains(assist), "Assister must play for the scoring side");
            assert_ne!(assist, scorer, "Nobody assists their own goal");
        }
    }

    assert!(test_app.services.matches.active_simulations().await.is_empty());
}

#[tokio::test]
async fn finished_simulation_updates_table() {
    let test_app = spawn_app().await;
    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team_with_squad(&test_app, &token, &unique_name("Away")).await;
    let match_id = create_match(&test_app, &token, home.team_id, away.team_id, 1).await;

    start_match(&test_app, &token, match_id).await;
    test_app.wait_for_simulation(match_id).await;

    let fixture = get_match(&test_app, match_id).await;
    assert_eq!(fixture["status"], "FINISHED");
    let home_score = fixture["home_score"].as_i64().unwrap();
    let away_score = fixture["away_score"].as_i64().unwrap();

    let home_row = standing_of(&test_app, home.team_id).await;
    let away_row = standing_of(&test_app, away.team_id).await;
    assert_eq!(home_row["played"], 1);
    assert_eq!(away_row["played"], 1);
    assert_eq!(home_row["goals_for"].as_i64().unwrap(), home_score);
    assert_eq!(home_row["goals_against"].as_i64().unwrap(), away_score);
    assert_eq!(away_row["goals_for"].as_i64().unwrap(), away_score);

    let expected_home_points = match home_score.cmp(&away_score) {
        std::cmp::Ordering::Greater => 3,
        std::cmp::Ordering::Equal => 1,
        std::cmp::Ordering::Less => 0,
    };
    assert_eq!(home_row["points"].as_i64().unwrap(), expected_home_points);
}

#[tokio::test]
async fn goalless_schedule_finishes_nil_nil() {
    let test_app = spawn_app_with_goals(0).await;
    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team_with_squad(&test_app, &token, &unique_name("Away")).await;
    let match_id = create_match(&test_app, &token, home.team_id, away.team_id, 1).await;

    start_match(&test_app, &token, match_id).await;
    test_app.wait_for_simulation(match_id).await;

    let fixture = get_match(&test_app, match_id).await;
    assert_eq!(fixture["status"], "FINISHED");
    assert_eq!(fixture["home_score"], 0);
    assert_eq!(fixture["away_score"], 0);
    assert!(get_events(&test_app, match_id).await.is_empty());

    let home_row = standing_of(&test_app, home.team_id).await;
    assert_eq!(home_row["draws"], 1);
    assert_eq!(home_row["points"], 1);
}

#[tokio::test]
async fn finishing_live_match_cancels_its_simulation() {
    let test_app = spawn_app_with_held_simulations().await;
    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team_with_squad(&test_app, &token, &unique_name("Away")).await;
    let match_id = create_match(&test_app, &token, home.team_id, away.team_id, 1).await;

    start_held_match(&test_app, &token, match_id).await;

    let response = Client::new()
        .get(&test_app.api("/admin/simulations"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["match_ids"][0], match_id.to_string());

    let response = finish_match(&test_app, &token, match_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["status"], "FINISHED");
    assert_eq!(body["data"]["home_score"], 0);
    assert_eq!(body["data"]["away_score"], 0);

    assert!(test_app.services.matches.active_simulations().await.is_empty());
    assert!(get_events(&test_app, match_id).await.is_empty(), "The cancelled goal must never be written");
}

#[tokio::test]
async fn empty_roster_leaves_match_live() {
    let test_app = spawn_app_with_goals(3).await;
    let token = admin_token(&test_app).await;
    let home = create_team_with_squad(&test_app, &token, &unique_name("Home")).await;
    let away = create_team(&test_app, &token, &unique_name("Nobody")).await;
    let match_id = create_match(&test_app, &token, home.team_id, away, 1).await;

    start_match(&test_app, &token, match_id).await;
    test_app.wait_for_simulation(match_id).await;

    let fixture = get_match(&test_app, match_id).await;
    assert_eq!(fixture["status"], "LIVE");
    assert!(get_events(&test_app, match_id).await.is_empty());

    let response = finish_match(&test_app, &token, match_id).await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn concurrent_matches_simulate_independently() {
    let test_app = spawn_app_with_goals(2).await;
    let token = admin_token(&test_app).await;

    let mut squads = Vec::new();
    for label in ["North", "South", "East", "West", "Central", "Coast"] {
        squads.push(create_team_with_squad(&test_app, &token, &unique_name(label)).await);
    }

    let mut match_ids = Vec::new();
    for pair in squads.chunks(2) {
        match_ids.push(create_match(&test_app, &token, pair[0].team_id, pair[1].team_id, 1).await);
    }

    let starts = match_ids.iter().map(|match_id| start_match(&test_app, &token, *match_id));
    for response in futures::future::join_all(starts).await {
        assert_eq!(response.status().as_u16(), 200);
    }
    for match_id in &match_ids {
        test_app.wait_for_simulation(*match_id).await;
    }

    for match_id in &match_ids {
        let fixture = get_match(&test_app, *match_id).await;
        assert_eq!(fixture["status"], "FINISHED");
        let events = get_events(&test_app, *match_id).await;
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|event| event["match_id"] == match_id.to_string()));
    }

    for squad in &squads {
        let row = standing_of(&test_app, squad.team_id).await;
        assert_eq!(row["played"], 1);
    }
}
