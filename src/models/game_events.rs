use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::goal_event::GoalEvent;

/// Live league messages broadcast to subscribers
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "event_type")]
pub enum LeagueEvent {
    #[serde(rename = "match_started")]
    MatchStarted {
        match_id: Uuid,
        matchday: i32,
        home_team_id: Uuid,
        away_team_id: Uuid,
        started_at: DateTime<Utc>,
    },

    #[serde(rename = "goal_scored")]
    GoalScored {
        match_id: Uuid,
        goal: GoalEvent,
        home_score: i32,
        away_score: i32,
    },

    #[serde(rename = "match_finished")]
    MatchFinished {
        match_id: Uuid,
        home_score: i32,
        away_score: i32,
        finished_at: DateTime<Utc>,
    },
}

impl LeagueEvent {
    pub fn match_id(&self) -> Uuid {
        match self {
            LeagueEvent::MatchStarted { match_id, .. }
            | LeagueEvent::GoalScored { match_id, .. }
            | LeagueEvent::MatchFinished { match_id, .. } => *match_id,
        }
    }
}
