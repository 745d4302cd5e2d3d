use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::db::LeagueStore;
use crate::error::{LeagueError, LeagueResult};
use crate::league::score::recalculate_match_score;
use crate::league::standings::StandingsService;
use crate::league::statistics::StatisticsService;
use crate::models::league::LeagueMatch;

/// Proof that the caller holds the aggregates lock
pub type AggregatesGuard<'a> = MutexGuard<'a, ()>;

/// Keeps standings and player statistics in line with finished matches.
///
/// Finishing a match, retroactive event changes and full rebuilds all run
/// under one async lock, so an incremental update never interleaves with a
/// rebuild.
#[derive(Clone)]
pub struct Aggregates {
    store: Arc<dyn LeagueStore>,
    standings: StandingsService,
    statistics: StatisticsService,
    lock: Arc<Mutex<()>>,
}

impl Aggregates {
    pub fn new(store: Arc<dyn LeagueStore>) -> Self {
        Self {
            standings: StandingsService::new(store.clone()),
            statistics: StatisticsService::new(store.clone()),
            store,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn standings(&self) -> &StandingsService {
        &self.standings
    }

    pub fn statistics(&self) -> &StatisticsService {
        &self.statistics
    }

    pub async fn lock(&self) -> AggregatesGuard<'_> {
        self.lock.lock().await
    }

    /// Resync the score of a live match, mark it finished and apply it to
    /// standings and statistics.
    ///
    /// Returns `None` when the match was no longer live, which means some
    /// other path already finished it.
    ///
    /// Once the match is marked finished the incremental update must not be
    /// lost. If it fails part way, standings and statistics are rebuilt from
    /// the finished matches before the lock is released. Should that rebuild
    /// fail too, the error is returned and an admin rebuild restores them.
    pub async fn finish_live(&self, match_id: Uuid) -> LeagueResult<Option<LeagueMatch>> {
        let guard = self.lock().await;

        let (home_score, away_score) = recalculate_match_score(self.store.as_ref(), match_id).await?;
        if !self.store.complete_match(match_id, home_score, away_score).await? {
            return Ok(None);
        }

        let mut fixture = self
            .store
            .get_match(match_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("match", match_id))?;
        fixture.home_score = home_score;
        fixture.away_score = away_score;

        if let Err(e) = self.apply_finished(&fixture).await {
            tracing::error!(
                "❌ Incremental update failed for finished match {}: {}. Rebuilding aggregates",
                match_id,
                e
            );
            if let Err(rebuild_error) = self.rebuild_locked(&guard).await {
                tracing::error!(
                    "❌ Rebuild after match {} failed: {}. Run POST /api/admin/standings/rebuild and /api/admin/stats/rebuild",
                    match_id,
                    rebuild_error
                );
                return Err(rebuild_error);
            }
        }

        tracing::info!("🏁 Match {} finished {}-{}", match_id, home_score, away_score);
        Ok(Some(fixture))
    }

    async fn apply_finished(&self, fixture: &LeagueMatch) -> LeagueResult<()> {
        self.standings.update_after_match(fixture).await?;
        self.statistics.apply_match(fixture).await
    }

    /// Full standings and statistics rebuild for a caller already holding the lock.
    pub async fn rebuild_locked(&self, _guard: &AggregatesGuard<'_>) -> LeagueResult<usize> {
        let replayed = self.standings.rebuild().await?;
        self.statistics.rebuild_all().await?;
        Ok(replayed)
    }

    pub async fn rebuild_standings(&self) -> LeagueResult<usize> {
        let _guard = self.lock().await;
        self.standings.rebuild().await
    }

    pub async fn rebuild_statistics(&self) -> LeagueResult<usize> {
        let _guard = self.lock().await;
        self.statistics.rebuild_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryLeagueStore;
    use crate::models::goal_event::GoalEvent;
    use crate::models::league::MatchStatus;
    use crate::models::team::{Player, Team};
    use chrono::Utc;

    fn team(name: &str) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            short_name: None,
            city: None,
            stadium: None,
            logo_url: None,
            created_at: Utc::now(),
        }
    }

    fn player(team_id: Uuid, position: &str, number: i32) -> Player {
        Player {
            id: Uuid::new_v4(),
            team_id,
            name: format!("Player {}", number),
            display_name: None,
            position: position.to_string(),
            jersey_number: number,
            nationality: None,
            image_path: None,
            goals: 0,
            assists: 0,
            clean_sheets: 0,
        }
    }

    fn goal(fixture: &LeagueMatch, scorer_id: Uuid, team: &Team) -> GoalEvent {
        GoalEvent {
            id: Uuid::new_v4(),
            match_id: fixture.id,
            matchday: fixture.matchday,
            scorer_id,
            scorer_name: "Scorer".to_string(),
            assist_id: None,
            assist_name: None,
            team_id: team.id,
            team_name: team.name.clone(),
            minute: 30,
            is_home_goal: team.id == fixture.home_team_id,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_failed_increment_is_repaired_by_rebuild() {
        let store = Arc::new(InMemoryLeagueStore::new());
        let (home, away) = (team("Home"), team("Away"));
        store.insert_team(&home).await.unwrap();
        store.insert_team(&away).await.unwrap();
        let striker = player(home.id, "Attacker", 9);
        let keeper = player(home.id, "Goalkeeper", 1);
        store.insert_player(&striker).await.unwrap();
        store.insert_player(&keeper).await.unwrap();

        let mut fixture = LeagueMatch::new(home.id, away.id, 1, Utc::now());
        fixture.status = MatchStatus::Live;
        store.insert_match(&fixture).await.unwrap();
        store.insert_goal_event(&goal(&fixture, striker.id, &home)).await.unwrap();
        // Scorer with no player row makes the statistics increment fail
        store.insert_goal_event(&goal(&fixture, Uuid::new_v4(), &home)).await.unwrap();

        let aggregates = Aggregates::new(store.clone());
        let finished = aggregates
            .finish_live(fixture.id)
            .await
            .expect("finish should recover through a rebuild")
            .expect("match was live");
        assert_eq!((finished.home_score, finished.away_score), (2, 0));

        let standings = store.list_standings().await.unwrap();
        assert_eq!(standings.len(), 2);
        let home_row = standings.iter().find(|row| row.team_id == home.id).unwrap();
        assert_eq!(home_row.played, 1);
        assert_eq!(home_row.points, 3);
        assert_eq!(home_row.goals_for, 2);

        let striker = store.get_player(striker.id).await.unwrap().unwrap();
        assert_eq!(striker.goals, 1);
        let keeper = store.get_player(keeper.id).await.unwrap().unwrap();
        assert_eq!(keeper.clean_sheets, 1);
    }

    #[tokio::test]
    async fn test_finish_of_match_that_is_not_live_is_a_no_op() {
        let store = Arc::new(InMemoryLeagueStore::new());
        let (home, away) = (team("Home"), team("Away"));
        store.insert_team(&home).await.unwrap();
        store.insert_team(&away).await.unwrap();
        let fixture = LeagueMatch::new(home.id, away.id, 1, Utc::now());
        store.insert_match(&fixture).await.unwrap();

        let aggregates = Aggregates::new(store.clone());
        assert!(aggregates.finish_live(fixture.id).await.unwrap().is_none());
        assert!(store.list_standings().await.unwrap().is_empty());
    }
}
