// src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::league::MatchSummary;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub short_name: Option<String>,
    pub city: Option<String>,
    pub stadium: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Player {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub display_name: Option<String>,
    /// Free-form position label as imported ("Goalkeeper", "Attacker", ...).
    pub position: String,
    pub jersey_number: i32,
    pub nationality: Option<String>,
    pub image_path: Option<String>,
    pub goals: i32,
    pub assists: i32,
    pub clean_sheets: i32,
}

impl Player {
    /// Name shown in event feeds and leaderboards.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.name)
    }

    pub fn position_kind(&self) -> Position {
        Position::classify(&self.position)
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.position_kind() == Position::Goalkeeper
    }

    pub fn statistics(&self) -> PlayerStatistics {
        PlayerStatistics {
            goals: self.goals,
            assists: self.assists,
            clean_sheets: self.clean_sheets,
        }
    }
}

/// Coarse position buckets used for weighting goal involvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Other,
}

impl Position {
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("goalkeeper") {
            Position::Goalkeeper
        } else if label.contains("defender") {
            Position::Defender
        } else if label.contains("midfield") {
            Position::Midfielder
        } else if label.contains("forward") || label.contains("attacker") || label.contains("striker") {
            Position::Forward
        } else {
            Position::Other
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStatistics {
    pub goals: i32,
    pub assists: i32,
    pub clean_sheets: i32,
}

/// Request to create a team
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    pub short_name: Option<String>,
    pub city: Option<String>,
    pub stadium: Option<String>,
    pub logo_url: Option<String>,
}

/// Request to register a player in a squad
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreatePlayerRequest {
    pub team_id: Uuid,
    pub name: String,
    pub display_name: Option<String>,
    pub position: String,
    pub jersey_number: i32,
    pub nationality: Option<String>,
    pub image_path: Option<String>,
}

/// Partial profile update. Counters and team membership are not editable.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub position: Option<String>,
    pub jersey_number: Option<i32>,
    pub nationality: Option<String>,
    pub image_path: Option<String>,
}

/// Fixture overview for a single team
#[derive(Debug, Serialize, Deserialize)]
pub struct TeamMatchesResponse {
    pub team: Team,
    pub recent_matches: Vec<MatchSummary>,
    pub form: Vec<String>,
    pub next_match: Option<MatchSummary>,
    pub upcoming: Vec<MatchSummary>,
}
