use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::LeagueStore;
use crate::error::{LeagueError, LeagueResult};
use crate::game::goal_generator::GoalGenerator;
use crate::league::aggregates::Aggregates;
use crate::league::score::recalculate_match_score;
use crate::models::game_events::LeagueEvent;
use crate::models::goal_event::GoalEvent;
use crate::models::league::LeagueMatch;
use crate::models::team::Player;
use crate::services::event_publisher::EventPublisher;
use crate::services::simulation_registry::CancelSignal;

/// Real-time pacing between simulated goals
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Sleeps for the requested delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Yields instead of sleeping, so a whole match plays out immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, _delay: Duration) {
        tokio::task::yield_now().await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutcome {
    /// Schedule exhausted and the match was finished by the generator.
    Completed { home_score: i32, away_score: i32 },
    /// Stopped early; events already written are kept.
    Cancelled { goals_emitted: usize },
    /// Schedule exhausted but the match had already been finished elsewhere.
    Superseded,
    /// One side has no players; the match stays live without events.
    EmptyRoster { team_id: Uuid },
}

struct Side<'a> {
    team_id: Uuid,
    team_name: String,
    squad: &'a [Player],
}

/// Generates goal events for one live match at a real-time pace and
/// finishes the match once its schedule runs out.
#[derive(Clone)]
pub struct LiveMatchService {
    store: Arc<dyn LeagueStore>,
    generator: GoalGenerator,
    pacer: Arc<dyn Pacer>,
    publisher: EventPublisher,
    aggregates: Aggregates,
}

impl LiveMatchService {
    pub fn new(
        store: Arc<dyn LeagueStore>,
        generator: GoalGenerator,
        pacer: Arc<dyn Pacer>,
        publisher: EventPublisher,
        aggregates: Aggregates,
    ) -> Self {
        Self {
            store,
            generator,
            pacer,
            publisher,
            aggregates,
        }
    }

    /// Task body handed to the simulation registry. Never fails; every
    /// problem is logged.
    pub async fn run(self, match_id: Uuid, cancel: CancelSignal) {
        match self.simulate(match_id, cancel).await {
            Ok(SimulationOutcome::EmptyRoster { team_id }) => {
                let reason = LeagueError::EmptyRoster { team_id };
                warn!("Skipping simulation for match {}: {}", match_id, reason);
            }
            Ok(outcome) => info!("Simulation for match {} ended: {:?}", match_id, outcome),
            Err(e) => error!("Simulation for match {} aborted: {}", match_id, e),
        }
    }

    pub async fn simulate(&self, match_id: Uuid, mut cancel: CancelSignal) -> LeagueResult<SimulationOutcome> {
        let fixture = self
            .store
            .get_match(match_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("match", match_id))?;

        let home_squad = self.store.team_squad(fixture.home_team_id).await?;
        let away_squad = self.store.team_squad(fixture.away_team_id).await?;
        if home_squad.is_empty() {
            return Ok(SimulationOutcome::EmptyRoster { team_id: fixture.home_team_id });
        }
        if away_squad.is_empty() {
            return Ok(SimulationOutcome::EmptyRoster { team_id: fixture.away_team_id });
        }

        let home = Side {
            team_id: fixture.home_team_id,
            team_name: self.team_name(fixture.home_team_id).await?,
            squad: &home_squad,
        };
        let away = Side {
            team_id: fixture.away_team_id,
            team_name: self.team_name(fixture.away_team_id).await?,
            squad: &away_squad,
        };

        let mut rng = StdRng::from_entropy();
        let goal_count = self.generator.draw_goal_count(&mut rng);
        let minutes = self.generator.draw_goal_minutes(goal_count, &mut rng);
        info!(
            "⚽ Simulating {} vs {} ({} goals scheduled)",
            home.team_name, away.team_name, goal_count
        );

        let mut goals_emitted = 0;
        for minute in minutes {
            if *cancel.borrow() {
                return Ok(SimulationOutcome::Cancelled { goals_emitted });
            }

            let delay = self.generator.draw_delay(&mut rng);
            tokio::select! {
                _ = self.pacer.pause(delay) => {}
                _ = cancel.changed() => {
                    info!("Match {} stopped early before minute {}", match_id, minute);
                    return Ok(SimulationOutcome::Cancelled { goals_emitted });
                }
            }

            let is_home_goal = self.generator.draw_is_home_goal(&mut rng);
            let side = if is_home_goal { &home } else { &away };
            let Some(event) = self.draw_goal(&fixture, side, minute, is_home_goal, &mut rng) else {
                continue;
            };

            if let Err(e) = self.store.insert_goal_event(&event).await {
                error!("Failed to save goal event for match {}: {}", match_id, e);
                continue;
            }
            goals_emitted += 1;

            match recalculate_match_score(self.store.as_ref(), match_id).await {
                Ok((home_score, away_score)) => {
                    info!(
                        "Match {} | {}' GOAL! {} ({}) {}-{}",
                        match_id, minute, event.scorer_name, event.team_name, home_score, away_score
                    );
                    self.publisher
                        .publish(&LeagueEvent::GoalScored {
                            match_id,
                            goal: event,
                            home_score,
                            away_score,
                        })
                        .await;
                }
                Err(e) => error!("Failed to update score for match {}: {}", match_id, e),
            }
        }

        if *cancel.borrow() {
            return Ok(SimulationOutcome::Cancelled { goals_emitted });
        }

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
                Ok(SimulationOutcome::Completed {
                    home_score: finished.home_score,
                    away_score: finished.away_score,
                })
            }
            None => Ok(SimulationOutcome::Superseded),
        }
    }

    fn draw_goal(
        &self,
        fixture: &LeagueMatch,
        side: &Side<'_>,
        minute: i32,
        is_home_goal: bool,
        rng: &mut StdRng,
    ) -> Option<GoalEvent> {
        let scorer = self.generator.pick_scorer(side.squad, rng)?;
        let assister = self.generator.pick_assister(side.squad, scorer.id, rng);

        Some(GoalEvent {
            id: Uuid::new_v4(),
            match_id: fixture.id,
            matchday: fixture.matchday,
            scorer_id: scorer.id,
            scorer_name: scorer.label().to_string(),
            assist_id: assister.map(|player| player.id),
            assist_name: assister.map(|player| player.label().to_string()),
            team_id: side.team_id,
            team_name: side.team_name.clone(),
            minute,
            is_home_goal,
            created_at: Utc::now(),
        })
    }

    async fn team_name(&self, team_id: Uuid) -> LeagueResult<String> {
        Ok(self
            .store
            .get_team(team_id)
            .await?
            .map(|team| team.name)
            .unwrap_or_else(|| "Unknown".to_string()))
    }
}
