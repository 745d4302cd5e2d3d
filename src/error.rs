use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use uuid::Uuid;

use crate::models::common::ApiResponse;
use crate::models::league::MatchStatus;

/// Failures surfaced by the match lifecycle, recomputation and store layers.
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error("match {match_id} is {actual}, expected {expected}")]
    InvalidState {
        match_id: Uuid,
        expected: MatchStatus,
        actual: MatchStatus,
    },

    #[error("only matches of matchday {active} can be started (match is on matchday {requested})")]
    SequencingViolation { active: i32, requested: i32 },

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no squad available for team {team_id}")]
    EmptyRoster { team_id: Uuid },

    /// Persistence failed or timed out. The detail is for logs only.
    #[error("storage unavailable: {0}")]
    StoreUnavailable(String),
}

pub type LeagueResult<T> = Result<T, LeagueError>;

impl LeagueError {
    pub fn not_found(what: &str, id: Uuid) -> Self {
        LeagueError::NotFound(format!("{} {}", what, id))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LeagueError::InvalidState { .. } => "invalid_state",
            LeagueError::SequencingViolation { .. } => "sequencing_violation",
            LeagueError::NotFound(_) => "not_found",
            LeagueError::InvalidInput(_) => "invalid_input",
            LeagueError::EmptyRoster { .. } => "empty_roster",
            LeagueError::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Message that is safe to hand back to API callers.
    pub fn public_message(&self) -> String {
        match self {
            LeagueError::StoreUnavailable(_) => {
                "Storage is temporarily unavailable, please retry".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for LeagueError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => LeagueError::NotFound("record".to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                LeagueError::InvalidInput("record already exists".to_string())
            }
            other => {
                tracing::error!("Database error: {:?}", other);
                LeagueError::StoreUnavailable(other.to_string())
            }
        }
    }
}

impl From<tokio::time::error::Elapsed> for LeagueError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        tracing::error!("Store operation timed out");
        LeagueError::StoreUnavailable("operation timed out".to_string())
    }
}

impl ResponseError for LeagueError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeagueError::InvalidState { .. } | LeagueError::SequencingViolation { .. } => {
                StatusCode::CONFLICT
            }
            LeagueError::NotFound(_) => StatusCode::NOT_FOUND,
            LeagueError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LeagueError::EmptyRoster { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LeagueError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(
            ApiResponse::<()>::error_with_message(self.public_message(), self.kind()),
        )
    }
}
