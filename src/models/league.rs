// src/models/league.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use std::fmt;

use crate::models::common::MatchResult;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct LeagueMatch {
    pub id: Uuid,
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub matchday: i32,
    pub scheduled_at: DateTime<Utc>,
    pub status: MatchStatus,
    /// Cached score, kept in line with the match's goal events.
    pub home_score: i32,
    pub away_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeagueMatch {
    pub fn new(
        home_team_id: Uuid,
        away_team_id: Uuid,
        matchday: i32,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            home_team_id,
            away_team_id,
            matchday,
            scheduled_at,
            status: MatchStatus::Scheduled,
            home_score: 0,
            away_score: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn involves(&self, team_id: Uuid) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn home_result(&self) -> MatchResult {
        MatchResult::from_scores(self.home_score, self.away_score)
    }

    /// Result for `team_id`, or `None` if the team did not play in this match.
    pub fn result_for(&self, team_id: Uuid) -> Option<MatchResult> {
        if self.home_team_id == team_id {
            Some(self.home_result())
        } else if self.away_team_id == team_id {
            Some(self.home_result().inverse())
        } else {
            None
        }
    }

    pub fn opponent_of(&self, team_id: Uuid) -> Option<Uuid> {
        if self.home_team_id == team_id {
            Some(self.away_team_id)
        } else if self.away_team_id == team_id {
            Some(self.home_team_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Finished,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A team's row in the league table. Entirely derived from finished matches.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Standing {
    pub team_id: Uuid,
    pub played: i32,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub points: i32,
    pub goals_for: i32,
    pub goals_against: i32,
    pub goal_difference: i32,
}

impl Standing {
    pub fn new(team_id: Uuid) -> Self {
        Self {
            team_id,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            points: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
        }
    }

    /// Fold one finished match into this row.
    pub fn record(&mut self, scored: i32, conceded: i32) {
        let result = MatchResult::from_scores(scored, conceded);
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = self.goals_for - self.goals_against;
        match result {
            MatchResult::Win => self.wins += 1,
            MatchResult::Draw => self.draws += 1,
            MatchResult::Loss => self.losses += 1,
        }
        self.points += result.points();
    }

    pub fn calculate_points(&self) -> i32 {
        self.wins * 3 + self.draws
    }
}

/// Presentation row of the league table
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StandingWithTeam {
    pub position: usize,
    pub team_name: String,
    pub logo_url: Option<String>,
    #[serde(flatten)]
    pub standing: Standing,
    /// Most recent result first, at most five entries.
    pub form: Vec<String>,
    pub next_opponent: Option<String>,
    pub next_opponent_logo: Option<String>,
}

/// Match enriched with team display names
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchSummary {
    #[serde(flatten)]
    pub fixture: LeagueMatch,
    pub home_team_name: String,
    pub away_team_name: String,
}

// Request/Response DTOs
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateMatchRequest {
    pub home_team_id: Uuid,
    pub away_team_id: Uuid,
    pub matchday: i32,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveMatchdayResponse {
    pub matchday: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RebuildResponse {
    pub matches_replayed: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveSimulationsResponse {
    pub match_ids: Vec<Uuid>,
}
