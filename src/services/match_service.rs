use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::db::LeagueStore;
use crate::error::{LeagueError, LeagueResult};
use crate::league::aggregates::Aggregates;
use crate::league::matchday::active_matchday;
use crate::league::score::recalculate_match_score;
use crate::models::game_events::LeagueEvent;
use crate::models::goal_event::{GoalEvent, GoalEventUpdate, NewGoalEvent};
use crate::models::league::{CreateMatchRequest, LeagueMatch, MatchStatus, MatchSummary};
use crate::models::team::{Player, Team};
use crate::services::event_publisher::EventPublisher;
use crate::services::live_match_service::LiveMatchService;
use crate::services::simulation_registry::SimulationRegistry;

/// Match lifecycle: Scheduled → Live → Finished, plus the goal event edit
/// protocol that keeps scores, standings and statistics derived from events.
#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn LeagueStore>,
    live: LiveMatchService,
    registry: SimulationRegistry,
    aggregates: Aggregates,
    publisher: EventPublisher,
}

impl MatchService {
    pub fn new(
        store: Arc<dyn LeagueStore>,
        live: LiveMatchService,
        registry: SimulationRegistry,
        aggregates: Aggregates,
        publisher: EventPublisher,
    ) -> Self {
        Self {
            store,
            live,
            registry,
            aggregates,
            publisher,
        }
    }

    pub fn registry(&self) -> &SimulationRegistry {
        &self.registry
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    async fn load_match(&self, match_id: Uuid) -> LeagueResult<LeagueMatch> {
        self.store
            .get_match(match_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("match", match_id))
    }

    fn require_status(fixture: &LeagueMatch, expected: MatchStatus) -> LeagueResult<()> {
        if fixture.status != expected {
            return Err(LeagueError::InvalidState {
                match_id: fixture.id,
                expected,
                actual: fixture.status,
            });
        }
        Ok(())
    }

    pub async fn create_match(&self, request: CreateMatchRequest) -> LeagueResult<LeagueMatch> {
        if request.home_team_id == request.away_team_id {
            return Err(LeagueError::InvalidInput("a team cannot play itself".to_string()));
        }
        if request.matchday < 1 {
            return Err(LeagueError::InvalidInput("matchday must be at least 1".to_string()));
        }
        for team_id in [request.home_team_id, request.away_team_id] {
            if self.store.get_team(team_id).await?.is_none() {
                return Err(LeagueError::not_found("team", team_id));
            }
        }

        let fixture = LeagueMatch::new(
            request.home_team_id,
            request.away_team_id,
            request.matchday,
            request.scheduled_at,
        );
        self.store.insert_match(&fixture).await?;
        tracing::info!("Scheduled match {} on matchday {}", fixture.id, fixture.matchday);
        Ok(fixture)
    }

    /// Move a scheduled match of the active matchday to live and launch its simulation.
    pub async fn start_match(&self, match_id: Uuid) -> LeagueResult<LeagueMatch> {
        let fixture = self.load_match(match_id).await?;
        Self::require_status(&fixture, MatchStatus::Scheduled)?;

        let matches = self.store.list_matches().await?;
        let active = active_matchday(&matches);
        if fixture.matchday != active {
            return Err(LeagueError::SequencingViolation {
                active,
                requested: fixture.matchday,
            });
        }

        if !self
            .store
            .transition_match(match_id, MatchStatus::Scheduled, MatchStatus::Live)
            .await?
        {
            let current = self.load_match(match_id).await?;
            return Err(LeagueError::InvalidState {
                match_id,
                expected: MatchStatus::Scheduled,
                actual: current.status,
            });
        }
        tracing::info!("🎮 Match {} is live", match_id);

        self.publisher
            .publish(&LeagueEvent::MatchStarted {
                match_id,
                matchday: fixture.matchday,
                home_team_id: fixture.home_team_id,
                away_team_id: fixture.away_team_id,
                started_at: Utc::now(),
            })
            .await;

        let live = self.live.clone();
        self.registry
            .launch(match_id, move |cancel| live.run(match_id, cancel))
            .await;

        self.load_match(match_id).await
    }

    /// Stop the simulation, resync the score and apply the result to the
    /// standings and player statistics.
    pub async fn finish_match(&self, match_id: Uuid) -> LeagueResult<LeagueMatch> {
        let fixture = self.load_match(match_id).await?;
        Self::require_status(&fixture, MatchStatus::Live)?;

        self.registry.stop(match_id).await;

        match self.aggregates.finish_live(match_id).await? {
            Some(finished) => {
                self.publisher
                    .publish(&LeagueEvent::MatchFinished {
                        match_id,
                        home_score: finished.home_score,
                        away_score: finished.away_score,
                        finished_at: Utc::now(),
                    })
                    .await;
                Ok(finished)
            }
            None => {
                let current = self.load_match(match_id).await?;
                Err(LeagueError::InvalidState {
                    match_id,
                    expected: MatchStatus::Live,
                    actual: current.status,
                })
            }
        }
    }

    pub async fn get_active_matchday(&self) -> LeagueResult<i32> {
        let matches = self.store.list_matches().await?;
        Ok(active_matchday(&matches))
    }

    pub async fn get_goal_events(&self, match_id: Uuid) -> LeagueResult<Vec<GoalEvent>> {
        self.load_match(match_id).await?;
        self.store.goal_events_for_match(match_id).await
    }

    /// Manually record a goal on a live or finished match.
    pub async fn add_goal_event(&self, match_id: Uuid, goal: NewGoalEvent) -> LeagueResult<GoalEvent> {
        let guard = self.aggregates.lock().await;

        let fixture = self.load_match(match_id).await?;
        if fixture.status == MatchStatus::Scheduled {
            return Err(LeagueError::InvalidState {
                match_id,
                expected: MatchStatus::Live,
                actual: fixture.status,
            });
        }
        validate_minute(goal.minute)?;

        let (team, squad) = self.side_of(&fixture, goal.is_home_goal).await?;
        let scorer = find_in_squad(&squad, goal.scorer_id, "scorer")?;
        let assister = match goal.assist_id {
            Some(assist_id) => Some(find_assister(&squad, assist_id, scorer.id)?),
            None => None,
        };

        let event = GoalEvent {
            id: Uuid::new_v4(),
            match_id,
            matchday: fixture.matchday,
            scorer_id: scorer.id,
            scorer_name: scorer.label().to_string(),
            assist_id: assister.map(|player| player.id),
            assist_name: assister.map(|player| player.label().to_string()),
            team_id: team.id,
            team_name: team.name.clone(),
            minute: goal.minute,
            is_home_goal: goal.is_home_goal,
            created_at: Utc::now(),
        };
        self.store.insert_goal_event(&event).await?;
        recalculate_match_score(self.store.as_ref(), match_id).await?;

        if fixture.is_finished() {
            self.aggregates.rebuild_locked(&guard).await?;
        }
        tracing::info!("Goal event {} added to match {}", event.id, match_id);
        Ok(event)
    }

    /// Partially update a goal event, then resync the score and rebuild
    /// standings and statistics.
    pub async fn edit_goal_event(
        &self,
        match_id: Uuid,
        event_id: Uuid,
        update: GoalEventUpdate,
    ) -> LeagueResult<GoalEvent> {
        if update.is_empty() {
            return Err(LeagueError::InvalidInput("no fields to update".to_string()));
        }

        let guard = self.aggregates.lock().await;

        let fixture = self.load_match(match_id).await?;
        let mut event = self
            .store
            .get_goal_event(match_id, event_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("goal event", event_id))?;

        if let Some(minute) = update.minute {
            validate_minute(minute)?;
            event.minute = minute;
        }
        if let Some(is_home_goal) = update.is_home_goal {
            event.is_home_goal = is_home_goal;
        }

        let (team, squad) = self.side_of(&fixture, event.is_home_goal).await?;
        let scorer = find_in_squad(&squad, update.scorer_id.unwrap_or(event.scorer_id), "scorer")?;
        let assist_id = match (update.assist_id, update.remove_assist) {
            (Some(assist_id), _) => Some(assist_id),
            (None, true) => None,
            (None, false) => event.assist_id,
        };
        let assister = match assist_id {
            Some(assist_id) => Some(find_assister(&squad, assist_id, scorer.id)?),
            None => None,
        };

        event.scorer_id = scorer.id;
        event.scorer_name = scorer.label().to_string();
        event.assist_id = assister.map(|player| player.id);
        event.assist_name = assister.map(|player| player.label().to_string());
        event.team_id = team.id;
        event.team_name = team.name.clone();

        self.store.update_goal_event(&event).await?;
        recalculate_match_score(self.store.as_ref(), match_id).await?;
        self.aggregates.rebuild_locked(&guard).await?;

        tracing::info!("Goal event {} of match {} updated", event_id, match_id);
        Ok(event)
    }

    pub async fn delete_goal_event(&self, match_id: Uuid, event_id: Uuid) -> LeagueResult<()> {
        let guard = self.aggregates.lock().await;

        self.load_match(match_id).await?;
        self.store.delete_goal_event(match_id, event_id).await?;
        recalculate_match_score(self.store.as_ref(), match_id).await?;
        self.aggregates.rebuild_locked(&guard).await?;

        tracing::info!("Goal event {} of match {} deleted", event_id, match_id);
        Ok(())
    }

    pub async fn rebuild_standings(&self) -> LeagueResult<usize> {
        self.aggregates.rebuild_standings().await
    }

    pub async fn rebuild_statistics(&self) -> LeagueResult<usize> {
        self.aggregates.rebuild_statistics().await
    }

    pub async fn active_simulations(&self) -> Vec<Uuid> {
        self.registry.active_matches().await
    }

    pub async fn list_matches(&self) -> LeagueResult<Vec<MatchSummary>> {
        let matches = self.store.list_matches().await?;
        self.summarize(matches).await
    }

    pub async fn get_match(&self, match_id: Uuid) -> LeagueResult<MatchSummary> {
        let fixture = self.load_match(match_id).await?;
        let mut summaries = self.summarize(vec![fixture]).await?;
        summaries
            .pop()
            .ok_or_else(|| LeagueError::not_found("match", match_id))
    }

    pub async fn matches_for_matchday(&self, matchday: i32) -> LeagueResult<Vec<MatchSummary>> {
        let matches = self
            .store
            .list_matches()
            .await?
            .into_iter()
            .filter(|fixture| fixture.matchday == matchday)
            .collect();
        self.summarize(matches).await
    }

    /// Finished matches, newest first.
    pub async fn latest_results(&self, limit: usize) -> LeagueResult<Vec<MatchSummary>> {
        let mut finished = self.store.finished_matches().await?;
        finished.reverse();
        finished.truncate(limit);
        self.summarize(finished).await
    }

    /// Scheduled matches, soonest first.
    pub async fn upcoming_fixtures(&self, limit: usize) -> LeagueResult<Vec<MatchSummary>> {
        let mut scheduled: Vec<LeagueMatch> = self
            .store
            .list_matches()
            .await?
            .into_iter()
            .filter(|fixture| fixture.status == MatchStatus::Scheduled)
            .collect();
        scheduled.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        scheduled.truncate(limit);
        self.summarize(scheduled).await
    }

    /// Attach team names to matches, keeping their order.
    pub async fn summarize(&self, matches: Vec<LeagueMatch>) -> LeagueResult<Vec<MatchSummary>> {
        let teams: HashMap<Uuid, String> = self
            .store
            .list_teams()
            .await?
            .into_iter()
            .map(|team| (team.id, team.name))
            .collect();
        let name_of = |team_id: &Uuid| teams.get(team_id).cloned().unwrap_or_else(|| "Unknown".to_string());

        Ok(matches
            .into_iter()
            .map(|fixture| MatchSummary {
                home_team_name: name_of(&fixture.home_team_id),
                away_team_name: name_of(&fixture.away_team_id),
                fixture,
            })
            .collect())
    }

    /// Cancel and await every running simulation.
    pub async fn shutdown(&self, grace: Duration) {
        self.registry.shutdown(grace).await;
    }

    async fn side_of(&self, fixture: &LeagueMatch, is_home_goal: bool) -> LeagueResult<(Team, Vec<Player>)> {
        let team_id = if is_home_goal {
            fixture.home_team_id
        } else {
            fixture.away_team_id
        };
        let team = self
            .store
            .get_team(team_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("team", team_id))?;
        let squad = self.store.team_squad(team_id).await?;
        Ok((team, squad))
    }
}

fn validate_minute(minute: i32) -> LeagueResult<()> {
    if !(1..=90).contains(&minute) {
        return Err(LeagueError::InvalidInput(format!(
            "minute must be between 1 and 90, got {}",
            minute
        )));
    }
    Ok(())
}

fn find_in_squad<'p>(squad: &'p [Player], player_id: Uuid, role: &str) -> LeagueResult<&'p Player> {
    squad
        .iter()
        .find(|player| player.id == player_id)
        .ok_or_else(|| {
            LeagueError::InvalidInput(format!("{} {} does not play for the scoring side", role, player_id))
        })
}

fn find_assister(squad: &[Player], assist_id: Uuid, scorer_id: Uuid) -> LeagueResult<&Player> {
    if assist_id == scorer_id {
        return Err(LeagueError::InvalidInput("a player cannot assist their own goal".to_string()));
    }
    find_in_squad(squad, assist_id, "assister")
}
