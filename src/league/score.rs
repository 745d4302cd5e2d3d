use uuid::Uuid;

use crate::db::LeagueStore;
use crate::error::LeagueResult;

/// Resynchronizes a match's cached score from its goal events and returns it.
///
/// Every path that creates, edits or deletes a goal event must call this.
pub async fn recalculate_match_score(
    store: &dyn LeagueStore,
    match_id: Uuid,
) -> LeagueResult<(i32, i32)> {
    let (home_score, away_score) = store.count_goals(match_id).await?;
    store.set_match_score(match_id, home_score, away_score).await?;
    tracing::debug!("Match {} score resynced to {}-{}", match_id, home_score, away_score);
    Ok((home_score, away_score))
}
