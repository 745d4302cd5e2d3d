use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteKind {
    Team,
    Player,
}

impl FavoriteKind {
    pub fn label(&self) -> &'static str {
        match self {
            FavoriteKind::Team => "team",
            FavoriteKind::Player => "player",
        }
    }
}

/// Teams and players a user follows, oldest first.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    pub teams: Vec<Uuid>,
    pub players: Vec<Uuid>,
}

/// Outcome of flipping one favorite
#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteToggle {
    pub id: Uuid,
    pub favorite: bool,
}

/// A fan's rated comment, optionally about one match, team or player.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub match_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub player_id: Option<Uuid>,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateReviewRequest {
    pub content: String,
    pub rating: i32,
    pub match_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub player_id: Option<Uuid>,
}

/// `GET /reviews` filters
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ReviewQuery {
    pub match_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub player_id: Option<Uuid>,
    pub limit: Option<usize>,
}

impl ReviewQuery {
    pub fn matches(&self, review: &Review) -> bool {
        self.match_id.map_or(true, |id| review.match_id == Some(id))
            && self.team_id.map_or(true, |id| review.team_id == Some(id))
            && self.player_id.map_or(true, |id| review.player_id == Some(id))
    }
}
