use chrono::{Duration, Utc};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use uuid::Uuid;

use super::utils::TestApp;

/// Players registered for a test team, keyed by role.
pub struct TestSquad {
    pub team_id: Uuid,
    pub name: String,
    pub goalkeeper: Uuid,
    pub defenders: Vec<Uuid>,
    pub midfielders: Vec<Uuid>,
    pub forwards: Vec<Uuid>,
}

impl TestSquad {
    pub fn striker(&self) -> Uuid {
        self.forwards[0]
    }

    pub fn playmaker(&self) -> Uuid {
        self.midfielders[0]
    }

    pub fn all_players(&self) -> Vec<Uuid> {
        let mut players = vec![self.goalkeeper];
        players.extend(&self.defenders);
        players.extend(&self.midfielders);
        players.extend(&self.forwards);
        players
    }
}

pub fn unique_name(prefix: &str) -> String {
    format!("{} {}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

pub async fn create_team(app: &TestApp, token: &str, name: &str) -> Uuid {
    let response = Client::new()
        .post(&app.api("/admin/teams"))
        .bearer_auth(token)
        .json(&json!({
            "name": name,
            "short_name": name.chars().take(3).collect::<String>(),
            "city": "Testville",
            "stadium": format!("{} Arena", name)
        }))
        .send()
        .await
        .expect("Failed to create team");
    assert_eq!(response.status().as_u16(), 201, "Team creation should succeed");

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}

pub async fn create_player(
    app: &TestApp,
    token: &str,
    team_id: Uuid,
    name: &str,
    position: &str,
    jersey_number: i32,
) -> Uuid {
    let response = Client::new()
        .post(&app.api("/admin/players"))
        .bearer_auth(token)
        .json(&json!({
            "team_id": team_id,
            "name": name,
            "position": position,
            "jersey_number": jersey_number
        }))
        .send()
        .await
        .expect("Failed to create player");
    assert_eq!(response.status().as_u16(), 201, "Player creation should succeed");

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}

/// A team with a full eleven: one goalkeeper, four defenders, three
/// midfielders and three forwards.
pub async fn create_team_with_squad(app: &TestApp, token: &str, name: &str) -> TestSquad {
    let team_id = create_team(app, token, name).await;

    let goalkeeper = create_player(app, token, team_id, &format!("{} Keeper", name), "Goalkeeper", 1).await;
    let mut defenders = Vec::new();
    for jersey in 2..=5 {
        defenders.push(create_player(app, token, team_id, &format!("{} Defender {}", name, jersey), "Defender", jersey).await);
    }
    let mut midfielders = Vec::new();
    for jersey in 6..=8 {
        midfielders.push(create_player(app, token, team_id, &format!("{} Midfielder {}", name, jersey), "Midfielder", jersey).await);
    }
    let mut forwards = Vec::new();
    for jersey in 9..=11 {
        forwards.push(create_player(app, token, team_id, &format!("{} Forward {}", name, jersey), "Attacker", jersey).await);
    }

    TestSquad {
        team_id,
        name: name.to_string(),
        goalkeeper,
        defenders,
        midfielders,
        forwards,
    }
}

pub async fn schedule_match(
    app: &TestApp,
    token: &str,
    home_team_id: Uuid,
    away_team_id: Uuid,
    matchday: i32,
) -> Response {
    Client::new()
        .post(&app.api("/admin/matches"))
        .bearer_auth(token)
        .json(&json!({
            "home_team_id": home_team_id,
            "away_team_id": away_team_id,
            "matchday": matchday,
            "scheduled_at": Utc::now() + Duration::days(matchday as i64)
        }))
        .send()
        .await
        .expect("Failed to schedule match")
}

pub async fn create_match(
    app: &TestApp,
    token: &str,
    home_team_id: Uuid,
    away_team_id: Uuid,
    matchday: i32,
) -> Uuid {
    let response = schedule_match(app, token, home_team_id, away_team_id, matchday).await;
    assert_eq!(response.status().as_u16(), 201, "Match creation should succeed");

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}

pub async fn start_match(app: &TestApp, token: &str, match_id: Uuid) -> Response {
    Client::new()
        .patch(&app.api(&format!("/admin/matches/{}/start", match_id)))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to start match")
}

pub async fn finish_match(app: &TestApp, token: &str, match_id: Uuid) -> Response {
    Client::new()
        .patch(&app.api(&format!("/admin/matches/{}/finish", match_id)))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to finish match")
}

pub async fn add_goal(
    app: &TestApp,
    token: &str,
    match_id: Uuid,
    scorer_id: Uuid,
    assist_id: Option<Uuid>,
    minute: i32,
    is_home_goal: bool,
) -> Response {
    Client::new()
        .post(&app.api(&format!("/admin/matches/{}/events", match_id)))
        .bearer_auth(token)
        .json(&json!({
            "scorer_id": scorer_id,
            "assist_id": assist_id,
            "minute": minute,
            "is_home_goal": is_home_goal
        }))
        .send()
        .await
        .expect("Failed to add goal event")
}

/// Add a goal that must be accepted and return its event id.
pub async fn record_goal(
    app: &TestApp,
    token: &str,
    match_id: Uuid,
    scorer_id: Uuid,
    assist_id: Option<Uuid>,
    minute: i32,
    is_home_goal: bool,
) -> Uuid {
    let response = add_goal(app, token, match_id, scorer_id, assist_id, minute, is_home_goal).await;
    assert_eq!(response.status().as_u16(), 201, "Goal event should be accepted");

    let body: Value = response.json().await.unwrap();
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}

pub async fn delete_goal(app: &TestApp, token: &str, match_id: Uuid, event_id: Uuid) -> Response {
    Client::new()
        .delete(&app.api(&format!("/admin/matches/{}/events/{}", match_id, event_id)))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to delete goal event")
}

pub async fn edit_goal(app: &TestApp, token: &str, match_id: Uuid, event_id: Uuid, update: Value) -> Response {
    Client::new()
        .put(&app.api(&format!("/admin/matches/{}/events/{}", match_id, event_id)))
        .bearer_auth(token)
        .json(&update)
        .send()
        .await
        .expect("Failed to edit goal event")
}

/// GET a public endpoint and return the `data` payload.
pub async fn get_data(app: &TestApp, path: &str) -> Value {
    let response = Client::new()
        .get(&app.api(path))
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success(), "GET {} failed with {}", path, response.status());

    let body: Value = response.json().await.expect("Cannot turn into a json.");
    body["data"].clone()
}

pub async fn get_match(app: &TestApp, match_id: Uuid) -> Value {
    get_data(app, &format!("/matches/{}", match_id)).await
}

pub async fn get_events(app: &TestApp, match_id: Uuid) -> Vec<Value> {
    get_data(app, &format!("/matches/{}/events", match_id))
        .await
        .as_array()
        .cloned()
        .unwrap_or_default()
}

/// League table row for `team_id`.
pub async fn standing_of(app: &TestApp, team_id: Uuid) -> Value {
    let table = get_data(app, "/standings").await;
    table
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["team_id"] == json!(team_id))
        .cloned()
        .expect("Team missing from the table")
}

pub async fn player(app: &TestApp, player_id: Uuid) -> Value {
    get_data(app, &format!("/players/{}", player_id)).await
}

/// Start a match that stays live until finished by hand.
pub async fn start_held_match(app: &TestApp, token: &str, match_id: Uuid) {
    let response = start_match(app, token, match_id).await;
    assert!(response.status().is_success(), "Match should start");
}
