use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The atomic record of one goal. The event log is the source of truth
/// for every match score.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq)]
pub struct GoalEvent {
    pub id: Uuid,
    pub match_id: Uuid,
    pub matchday: i32,
    pub scorer_id: Uuid,
    pub scorer_name: String,
    pub assist_id: Option<Uuid>,
    pub assist_name: Option<String>,
    pub team_id: Uuid,
    pub team_name: String,
    pub minute: i32,
    pub is_home_goal: bool,
    pub created_at: DateTime<Utc>,
}

/// Manually entered goal (editorial corrections)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewGoalEvent {
    pub scorer_id: Uuid,
    pub assist_id: Option<Uuid>,
    pub minute: i32,
    pub is_home_goal: bool,
}

/// Partial update of a goal event. Absent fields keep their value.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GoalEventUpdate {
    pub scorer_id: Option<Uuid>,
    pub assist_id: Option<Uuid>,
    /// Drop the assist entirely. Ignored when `assist_id` is set.
    #[serde(default)]
    pub remove_assist: bool,
    pub minute: Option<i32>,
    pub is_home_goal: Option<bool>,
}

impl GoalEventUpdate {
    pub fn is_empty(&self) -> bool {
        self.scorer_id.is_none()
            && self.assist_id.is_none()
            && !self.remove_assist
            && self.minute.is_none()
            && self.is_home_goal.is_none()
    }
}

/// Goals per side, counted from the event log
pub fn count_goals(events: &[GoalEvent]) -> (i32, i32) {
    events.iter().fold((0, 0), |(home, away), event| {
        if event.is_home_goal {
            (home + 1, away)
        } else {
            (home, away + 1)
        }
    })
}
