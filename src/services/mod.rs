pub mod event_publisher;
pub mod fan_service;
pub mod live_match_service;
pub mod match_service;
pub mod simulation_registry;
pub mod team_service;

pub use event_publisher::EventPublisher;
pub use fan_service::FanService;
pub use live_match_service::{InstantPacer, LiveMatchService, Pacer, TokioPacer};
pub use match_service::MatchService;
pub use simulation_registry::SimulationRegistry;
pub use team_service::TeamService;

use std::sync::Arc;

use crate::config::simulation::SimulationSettings;
use crate::db::LeagueStore;
use crate::game::goal_generator::GoalGenerator;
use crate::league::aggregates::Aggregates;

/// Every service the HTTP layer and the binary need, wired over one store.
#[derive(Clone)]
pub struct LeagueServices {
    pub store: Arc<dyn LeagueStore>,
    pub matches: MatchService,
    pub teams: TeamService,
    pub fans: FanService,
}

impl LeagueServices {
    pub fn build(
        store: Arc<dyn LeagueStore>,
        simulation: SimulationSettings,
        pacer: Arc<dyn Pacer>,
        publisher: EventPublisher,
    ) -> Self {
        let aggregates = Aggregates::new(store.clone());
        let live = LiveMatchService::new(
            store.clone(),
            GoalGenerator::new(simulation),
            pacer,
            publisher.clone(),
            aggregates.clone(),
        );
        let matches = MatchService::new(
            store.clone(),
            live,
            SimulationRegistry::new(),
            aggregates,
            publisher,
        );
        let teams = TeamService::new(store.clone(), matches.clone());
        let fans = FanService::new(store.clone());

        Self { store, matches, teams, fans }
    }
}
