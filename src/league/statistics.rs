use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::db::LeagueStore;
use crate::error::LeagueResult;
use crate::models::goal_event::{count_goals, GoalEvent};
use crate::models::league::LeagueMatch;
use crate::models::stats::{StatEntry, StatsResponse};
use crate::models::team::{Player, PlayerStatistics, Team};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaderboard {
    Goals,
    Assists,
    CleanSheets,
}

impl Leaderboard {
    fn value(&self, stats: &PlayerStatistics) -> i32 {
        match self {
            Leaderboard::Goals => stats.goals,
            Leaderboard::Assists => stats.assists,
            Leaderboard::CleanSheets => stats.clean_sheets,
        }
    }
}

/// Per-player goals, assists and clean sheets, derived from goal events and
/// finished match results.
#[derive(Clone)]
pub struct StatisticsService {
    store: Arc<dyn LeagueStore>,
}

impl StatisticsService {
    pub fn new(store: Arc<dyn LeagueStore>) -> Self {
        Self { store }
    }

    /// Credit one finished match to its players with atomic increments.
    pub async fn apply_match(&self, fixture: &LeagueMatch) -> LeagueResult<()> {
        let events = self.store.goal_events_for_match(fixture.id).await?;
        let mut tallies = tally_events(&events);

        let home_squad = self.store.team_squad(fixture.home_team_id).await?;
        let away_squad = self.store.team_squad(fixture.away_team_id).await?;
        credit_clean_sheets(&mut tallies, fixture, &home_squad, &away_squad);

        for (player_id, delta) in tallies {
            self.store.increment_player_stats(player_id, delta).await?;
        }

        tracing::info!("Player statistics applied for match {}", fixture.id);
        Ok(())
    }

    /// Reset every player's counters and recompute them from all finished
    /// matches. Returns the number of matches replayed.
    pub async fn rebuild_all(&self) -> LeagueResult<usize> {
        let finished = self.store.finished_matches().await?;
        let events = self.store.all_goal_events().await?;
        let players = self.store.list_players().await?;

        let totals = aggregate(&finished, &events, &players);
        self.store.replace_player_stats(&totals).await?;

        tracing::info!(
            "Rebuilt statistics for {} players from {} finished matches",
            totals.len(),
            finished.len()
        );
        Ok(finished.len())
    }

    pub async fn leaderboard(&self, board: Leaderboard, limit: usize) -> LeagueResult<Vec<StatEntry>> {
        let players = self.store.list_players().await?;
        let teams = self.store.list_teams().await?;
        Ok(rank_players(&players, &teams, board, limit))
    }

    pub async fn top_scorers(&self, limit: usize) -> LeagueResult<Vec<StatEntry>> {
        self.leaderboard(Leaderboard::Goals, limit).await
    }

    pub async fn top_assists(&self, limit: usize) -> LeagueResult<Vec<StatEntry>> {
        self.leaderboard(Leaderboard::Assists, limit).await
    }

    pub async fn top_clean_sheets(&self, limit: usize) -> LeagueResult<Vec<StatEntry>> {
        self.leaderboard(Leaderboard::CleanSheets, limit).await
    }

    /// All three boards from one read of players and teams.
    pub async fn overview(&self, limit: usize) -> LeagueResult<StatsResponse> {
        let players = self.store.list_players().await?;
        let teams = self.store.list_teams().await?;
        Ok(StatsResponse {
            top_scorers: rank_players(&players, &teams, Leaderboard::Goals, limit),
            top_assists: rank_players(&players, &teams, Leaderboard::Assists, limit),
            clean_sheets: rank_players(&players, &teams, Leaderboard::CleanSheets, limit),
        })
    }
}

/// Goals per scorer and assists per assister.
pub fn tally_events(events: &[GoalEvent]) -> HashMap<Uuid, PlayerStatistics> {
    let mut tallies: HashMap<Uuid, PlayerStatistics> = HashMap::new();
    for event in events {
        tallies.entry(event.scorer_id).or_default().goals += 1;
        if let Some(assist_id) = event.assist_id {
            tallies.entry(assist_id).or_default().assists += 1;
        }
    }
    tallies
}

/// First-choice goalkeeper: lowest jersey number among goalkeeper-tagged
/// players, else whoever wears number 1.
pub fn clean_sheet_keeper(squad: &[Player]) -> Option<&Player> {
    squad
        .iter()
        .filter(|player| player.is_goalkeeper())
        .min_by_key(|player| (player.jersey_number, player.id))
        .or_else(|| squad.iter().find(|player| player.jersey_number == 1))
}

/// A side keeps a clean sheet when the opponent's final score is zero.
pub fn credit_clean_sheets(
    tallies: &mut HashMap<Uuid, PlayerStatistics>,
    fixture: &LeagueMatch,
    home_squad: &[Player],
    away_squad: &[Player],
) {
    if fixture.away_score == 0 {
        if let Some(keeper) = clean_sheet_keeper(home_squad) {
            tallies.entry(keeper.id).or_default().clean_sheets += 1;
        }
    }
    if fixture.home_score == 0 {
        if let Some(keeper) = clean_sheet_keeper(away_squad) {
            tallies.entry(keeper.id).or_default().clean_sheets += 1;
        }
    }
}

/// Full statistics for every player credited in `finished`.
///
/// Scores are taken from the event log rather than the cached match fields.
pub fn aggregate(
    finished: &[LeagueMatch],
    events: &[GoalEvent],
    players: &[Player],
) -> HashMap<Uuid, PlayerStatistics> {
    let mut events_by_match: HashMap<Uuid, Vec<GoalEvent>> = HashMap::new();
    for event in events {
        events_by_match.entry(event.match_id).or_default().push(event.clone());
    }

    let mut squads: HashMap<Uuid, Vec<Player>> = HashMap::new();
    for player in players {
        squads.entry(player.team_id).or_default().push(player.clone());
    }

    let mut totals: HashMap<Uuid, PlayerStatistics> = HashMap::new();
    for fixture in finished.iter().filter(|fixture| fixture.is_finished()) {
        let match_events = events_by_match.remove(&fixture.id).unwrap_or_default();
        let (home_score, away_score) = count_goals(&match_events);

        let mut resynced = fixture.clone();
        resynced.home_score = home_score;
        resynced.away_score = away_score;

        let mut tallies = tally_events(&match_events);
        credit_clean_sheets(
            &mut tallies,
            &resynced,
            squads.get(&fixture.home_team_id).map(Vec::as_slice).unwrap_or(&[]),
            squads.get(&fixture.away_team_id).map(Vec::as_slice).unwrap_or(&[]),
        );

        for (player_id, delta) in tallies {
            let total = totals.entry(player_id).or_default();
            total.goals += delta.goals;
            total.assists += delta.assists;
            total.clean_sheets += delta.clean_sheets;
        }
    }
    totals
}

/// Players with a non-zero count, highest first, then by name and id.
pub fn rank_players(players: &[Player], teams: &[Team], board: Leaderboard, limit: usize) -> Vec<StatEntry> {
    let team_names: HashMap<Uuid, &str> = teams.iter().map(|team| (team.id, team.name.as_str())).collect();

    let mut ranked: Vec<&Player> = players
        .iter()
        .filter(|player| board.value(&player.statistics()) > 0)
        .collect();
    ranked.sort_by(|a, b| {
        board
            .value(&b.statistics())
            .cmp(&board.value(&a.statistics()))
            .then_with(|| a.label().cmp(b.label()))
            .then(a.id.cmp(&b.id))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|player| StatEntry {
            player_id: player.id,
            name: player.label().to_string(),
            team_id: player.team_id,
            team_name: team_names.get(&player.team_id).unwrap_or(&"Unknown").to_string(),
            image_path: player.image_path.clone(),
            value: board.value(&player.statistics()),
        })
        .collect()
}
