use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::LeagueResult;
use crate::models::fan::{FavoriteKind, Favorites, Review};
use crate::models::goal_event::GoalEvent;
use crate::models::league::{LeagueMatch, MatchStatus, Standing};
use crate::models::team::{Player, PlayerStatistics, Team};
use crate::models::user::User;

/// Persistence seam for the league core.
///
/// Every write that several tasks may issue at once (score counters, standings
/// rows, player statistics) is expressed as a single atomic store operation so
/// callers never read-modify-write in application code.
#[async_trait]
pub trait LeagueStore: Send + Sync {
    /// All matches ordered by matchday, kick-off and id.
    async fn list_matches(&self) -> LeagueResult<Vec<LeagueMatch>>;
    async fn get_match(&self, match_id: Uuid) -> LeagueResult<Option<LeagueMatch>>;
    async fn insert_match(&self, fixture: &LeagueMatch) -> LeagueResult<()>;
    /// Compare-and-set status change. Returns `false` when the match was not in `from`.
    async fn transition_match(
        &self,
        match_id: Uuid,
        from: MatchStatus,
        to: MatchStatus,
    ) -> LeagueResult<bool>;
    async fn set_match_score(&self, match_id: Uuid, home_score: i32, away_score: i32) -> LeagueResult<()>;
    /// Moves a live match to finished with its final score in one write.
    /// Returns `false` when the match was no longer live.
    async fn complete_match(&self, match_id: Uuid, home_score: i32, away_score: i32) -> LeagueResult<bool>;
    /// Finished matches ordered by kick-off, then id.
    async fn finished_matches(&self) -> LeagueResult<Vec<LeagueMatch>>;

    async fn list_teams(&self) -> LeagueResult<Vec<Team>>;
    async fn get_team(&self, team_id: Uuid) -> LeagueResult<Option<Team>>;
    async fn insert_team(&self, team: &Team) -> LeagueResult<()>;
    /// Squad ordered by jersey number.
    async fn team_squad(&self, team_id: Uuid) -> LeagueResult<Vec<Player>>;
    async fn list_players(&self) -> LeagueResult<Vec<Player>>;
    async fn get_player(&self, player_id: Uuid) -> LeagueResult<Option<Player>>;
    async fn insert_player(&self, player: &Player) -> LeagueResult<()>;
    /// Writes the profile fields only. Statistics counters are left as they are.
    async fn update_player(&self, player: &Player) -> LeagueResult<()>;
    /// Removes the player and the favorites pointing at them. Reviews keep
    /// their text but lose the player reference.
    async fn delete_player(&self, player_id: Uuid) -> LeagueResult<()>;
    /// Goal events naming the player as scorer or assister.
    async fn player_event_count(&self, player_id: Uuid) -> LeagueResult<i64>;
    async fn increment_player_stats(&self, player_id: Uuid, delta: PlayerStatistics) -> LeagueResult<()>;
    /// Overwrites every player's counters; players absent from `totals` are zeroed.
    async fn replace_player_stats(&self, totals: &HashMap<Uuid, PlayerStatistics>) -> LeagueResult<()>;

    async fn insert_goal_event(&self, event: &GoalEvent) -> LeagueResult<()>;
    /// Goal events of one match ordered by minute, then insertion time.
    async fn goal_events_for_match(&self, match_id: Uuid) -> LeagueResult<Vec<GoalEvent>>;
    async fn all_goal_events(&self) -> LeagueResult<Vec<GoalEvent>>;
    async fn get_goal_event(&self, match_id: Uuid, event_id: Uuid) -> LeagueResult<Option<GoalEvent>>;
    async fn update_goal_event(&self, event: &GoalEvent) -> LeagueResult<()>;
    async fn delete_goal_event(&self, match_id: Uuid, event_id: Uuid) -> LeagueResult<()>;
    /// (home, away) goal counts of the match's events.
    async fn count_goals(&self, match_id: Uuid) -> LeagueResult<(i32, i32)>;

    /// Atomically folds one result into a team's row, creating it if needed.
    async fn record_standing_result(&self, team_id: Uuid, scored: i32, conceded: i32) -> LeagueResult<()>;
    async fn list_standings(&self) -> LeagueResult<Vec<Standing>>;
    /// Drops every row and writes `rows` in their place, atomically.
    async fn replace_standings(&self, rows: &[Standing]) -> LeagueResult<()>;

    async fn find_user_by_username(&self, username: &str) -> LeagueResult<Option<User>>;
    async fn insert_user(&self, user: &User) -> LeagueResult<()>;

    /// Adds the favorite when absent and removes it when present, in one
    /// atomic step. Returns whether the target is now a favorite.
    async fn toggle_favorite(&self, user_id: Uuid, kind: FavoriteKind, target_id: Uuid) -> LeagueResult<bool>;
    async fn favorites(&self, user_id: Uuid) -> LeagueResult<Favorites>;

    async fn insert_review(&self, review: &Review) -> LeagueResult<()>;
    /// Newest first.
    async fn list_reviews(&self) -> LeagueResult<Vec<Review>>;
    async fn delete_review(&self, review_id: Uuid) -> LeagueResult<()>;
}
