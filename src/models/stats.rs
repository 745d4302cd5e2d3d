use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One leaderboard line (goals, assists or clean sheets)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StatEntry {
    pub player_id: Uuid,
    pub name: String,
    pub team_id: Uuid,
    pub team_name: String,
    pub image_path: Option<String>,
    pub value: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub top_scorers: Vec<StatEntry>,
    pub top_assists: Vec<StatEntry>,
    pub clean_sheets: Vec<StatEntry>,
}
