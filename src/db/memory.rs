use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::store::LeagueStore;
use crate::error::{LeagueError, LeagueResult};
use crate::models::fan::{FavoriteKind, Favorites, Review};
use crate::models::goal_event::{count_goals, GoalEvent};
use crate::models::league::{LeagueMatch, MatchStatus, Standing};
use crate::models::team::{Player, PlayerStatistics, Team};
use crate::models::user::User;

#[derive(Default)]
struct Collections {
    matches: HashMap<Uuid, LeagueMatch>,
    teams: HashMap<Uuid, Team>,
    players: HashMap<Uuid, Player>,
    goal_events: Vec<GoalEvent>,
    standings: HashMap<Uuid, Standing>,
    users: HashMap<String, User>,
    // (user, kind, target) in the order they were added
    favorites: Vec<(Uuid, FavoriteKind, Uuid)>,
    reviews: Vec<Review>,
}

/// Thread-safe in-memory league store for tests and local development.
///
/// A single lock guards every collection, so each trait call is atomic.
#[derive(Clone, Default)]
pub struct InMemoryLeagueStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryLeagueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_matches<'a>(matches: impl Iterator<Item = &'a LeagueMatch>) -> Vec<LeagueMatch> {
    let mut matches: Vec<LeagueMatch> = matches.cloned().collect();
    matches.sort_by(|a, b| {
        a.matchday
            .cmp(&b.matchday)
            .then(a.scheduled_at.cmp(&b.scheduled_at))
            .then(a.id.cmp(&b.id))
    });
    matches
}

#[async_trait]
impl LeagueStore for InMemoryLeagueStore {
    async fn list_matches(&self) -> LeagueResult<Vec<LeagueMatch>> {
        let data = self.inner.read().await;
        Ok(sorted_matches(data.matches.values()))
    }

    async fn get_match(&self, match_id: Uuid) -> LeagueResult<Option<LeagueMatch>> {
        Ok(self.inner.read().await.matches.get(&match_id).cloned())
    }

    async fn insert_match(&self, fixture: &LeagueMatch) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        if data.matches.contains_key(&fixture.id) {
            return Err(LeagueError::InvalidInput(format!("match {} already exists", fixture.id)));
        }
        data.matches.insert(fixture.id, fixture.clone());
        Ok(())
    }

    async fn transition_match(
        &self,
        match_id: Uuid,
        from: MatchStatus,
        to: MatchStatus,
    ) -> LeagueResult<bool> {
        let mut data = self.inner.write().await;
        match data.matches.get_mut(&match_id) {
            Some(fixture) if fixture.status == from => {
                fixture.status = to;
                fixture.updated_at = Utc::now();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(LeagueError::not_found("match", match_id)),
        }
    }

    async fn set_match_score(&self, match_id: Uuid, home_score: i32, away_score: i32) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        let fixture = data
            .matches
            .get_mut(&match_id)
            .ok_or_else(|| LeagueError::not_found("match", match_id))?;
        fixture.home_score = home_score;
        fixture.away_score = away_score;
        fixture.updated_at = Utc::now();
        Ok(())
    }

    async fn complete_match(&self, match_id: Uuid, home_score: i32, away_score: i32) -> LeagueResult<bool> {
        let mut data = self.inner.write().await;
        match data.matches.get_mut(&match_id) {
            Some(fixture) if fixture.status == MatchStatus::Live => {
                fixture.status = MatchStatus::Finished;
                fixture.home_score = home_score;
                fixture.away_score = away_score;
                fixture.updated_at = Utc::now();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(LeagueError::not_found("match", match_id)),
        }
    }

    async fn finished_matches(&self) -> LeagueResult<Vec<LeagueMatch>> {
        let data = self.inner.read().await;
        let mut finished: Vec<LeagueMatch> = data
            .matches
            .values()
            .filter(|fixture| fixture.is_finished())
            .cloned()
            .collect();
        finished.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        Ok(finished)
    }

    async fn list_teams(&self) -> LeagueResult<Vec<Team>> {
        let data = self.inner.read().await;
        let mut teams: Vec<Team> = data.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn get_team(&self, team_id: Uuid) -> LeagueResult<Option<Team>> {
        Ok(self.inner.read().await.teams.get(&team_id).cloned())
    }

    async fn insert_team(&self, team: &Team) -> LeagueResult<()> {
        self.inner.write().await.teams.insert(team.id, team.clone());
        Ok(())
    }

    async fn team_squad(&self, team_id: Uuid) -> LeagueResult<Vec<Player>> {
        let data = self.inner.read().await;
        let mut squad: Vec<Player> = data
            .players
            .values()
            .filter(|player| player.team_id == team_id)
            .cloned()
            .collect();
        squad.sort_by(|a, b| a.jersey_number.cmp(&b.jersey_number).then(a.id.cmp(&b.id)));
        Ok(squad)
    }

    async fn list_players(&self) -> LeagueResult<Vec<Player>> {
        let data = self.inner.read().await;
        let mut players: Vec<Player> = data.players.values().cloned().collect();
        players.sort_by(|a, b| {
            a.team_id
                .cmp(&b.team_id)
                .then(a.jersey_number.cmp(&b.jersey_number))
                .then(a.id.cmp(&b.id))
        });
        Ok(players)
    }

    async fn get_player(&self, player_id: Uuid) -> LeagueResult<Option<Player>> {
        Ok(self.inner.read().await.players.get(&player_id).cloned())
    }

    async fn insert_player(&self, player: &Player) -> LeagueResult<()> {
        self.inner.write().await.players.insert(player.id, player.clone());
        Ok(())
    }

    async fn update_player(&self, player: &Player) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        let stored = data
            .players
            .get_mut(&player.id)
            .ok_or_else(|| LeagueError::not_found("player", player.id))?;
        stored.name = player.name.clone();
        stored.display_name = player.display_name.clone();
        stored.position = player.position.clone();
        stored.jersey_number = player.jersey_number;
        stored.nationality = player.nationality.clone();
        stored.image_path = player.image_path.clone();
        Ok(())
    }

    async fn delete_player(&self, player_id: Uuid) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        if data.players.remove(&player_id).is_none() {
            return Err(LeagueError::not_found("player", player_id));
        }
        data.favorites
            .retain(|(_, kind, target)| !(*kind == FavoriteKind::Player && *target == player_id));
        for review in data.reviews.iter_mut() {
            if review.player_id == Some(player_id) {
                review.player_id = None;
            }
        }
        Ok(())
    }

    async fn player_event_count(&self, player_id: Uuid) -> LeagueResult<i64> {
        let data = self.inner.read().await;
        Ok(data
            .goal_events
            .iter()
            .filter(|event| event.scorer_id == player_id || event.assist_id == Some(player_id))
            .count() as i64)
    }

    async fn increment_player_stats(&self, player_id: Uuid, delta: PlayerStatistics) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        let player = data
            .players
            .get_mut(&player_id)
            .ok_or_else(|| LeagueError::not_found("player", player_id))?;
        player.goals += delta.goals;
        player.assists += delta.assists;
        player.clean_sheets += delta.clean_sheets;
        Ok(())
    }

    async fn replace_player_stats(&self, totals: &HashMap<Uuid, PlayerStatistics>) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        for player in data.players.values_mut() {
            let stats = totals.get(&player.id).copied().unwrap_or_default();
            player.goals = stats.goals;
            player.assists = stats.assists;
            player.clean_sheets = stats.clean_sheets;
        }
        Ok(())
    }

    async fn insert_goal_event(&self, event: &GoalEvent) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        if !data.matches.contains_key(&event.match_id) {
            return Err(LeagueError::not_found("match", event.match_id));
        }
        data.goal_events.push(event.clone());
        Ok(())
    }

    async fn goal_events_for_match(&self, match_id: Uuid) -> LeagueResult<Vec<GoalEvent>> {
        let data = self.inner.read().await;
        let mut events: Vec<GoalEvent> = data
            .goal_events
            .iter()
            .filter(|event| event.match_id == match_id)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for goals in the same minute
        events.sort_by_key(|event| event.minute);
        Ok(events)
    }

    async fn all_goal_events(&self) -> LeagueResult<Vec<GoalEvent>> {
        Ok(self.inner.read().await.goal_events.clone())
    }

    async fn get_goal_event(&self, match_id: Uuid, event_id: Uuid) -> LeagueResult<Option<GoalEvent>> {
        let data = self.inner.read().await;
        Ok(data
            .goal_events
            .iter()
            .find(|event| event.id == event_id && event.match_id == match_id)
            .cloned())
    }

    async fn update_goal_event(&self, event: &GoalEvent) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        let stored = data
            .goal_events
            .iter_mut()
            .find(|stored| stored.id == event.id && stored.match_id == event.match_id)
            .ok_or_else(|| LeagueError::not_found("goal event", event.id))?;
        *stored = event.clone();
        Ok(())
    }

    async fn delete_goal_event(&self, match_id: Uuid, event_id: Uuid) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        let before = data.goal_events.len();
        data.goal_events
            .retain(|event| !(event.id == event_id && event.match_id == match_id));
        if data.goal_events.len() == before {
            return Err(LeagueError::not_found("goal event", event_id));
        }
        Ok(())
    }

    async fn count_goals(&self, match_id: Uuid) -> LeagueResult<(i32, i32)> {
        let data = self.inner.read().await;
        let events: Vec<GoalEvent> = data
            .goal_events
            .iter()
            .filter(|event| event.match_id == match_id)
            .cloned()
            .collect();
        Ok(count_goals(&events))
    }

    async fn record_standing_result(&self, team_id: Uuid, scored: i32, conceded: i32) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        data.standings
            .entry(team_id)
            .or_insert_with(|| Standing::new(team_id))
            .record(scored, conceded);
        Ok(())
    }

    async fn list_standings(&self) -> LeagueResult<Vec<Standing>> {
        Ok(self.inner.read().await.standings.values().cloned().collect())
    }

    async fn replace_standings(&self, rows: &[Standing]) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        data.standings = rows.iter().map(|row| (row.team_id, row.clone())).collect();
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> LeagueResult<Option<User>> {
        Ok(self.inner.read().await.users.get(username).cloned())
    }

    async fn insert_user(&self, user: &User) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        if data.users.contains_key(&user.username) {
            return Err(LeagueError::InvalidInput(format!("username {} is taken", user.username)));
        }
        data.users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn toggle_favorite(&self, user_id: Uuid, kind: FavoriteKind, target_id: Uuid) -> LeagueResult<bool> {
        let mut data = self.inner.write().await;
        let entry = (user_id, kind, target_id);
        let before = data.favorites.len();
        data.favorites.retain(|favorite| *favorite != entry);
        if data.favorites.len() < before {
            return Ok(false);
        }
        data.favorites.push(entry);
        Ok(true)
    }

    async fn favorites(&self, user_id: Uuid) -> LeagueResult<Favorites> {
        let data = self.inner.read().await;
        let mut favorites = Favorites::default();
        for (owner, kind, target) in &data.favorites {
            if *owner != user_id {
                continue;
            }
            match kind {
                FavoriteKind::Team => favorites.teams.push(*target),
                FavoriteKind::Player => favorites.players.push(*target),
            }
        }
        Ok(favorites)
    }

    async fn insert_review(&self, review: &Review) -> LeagueResult<()> {
        self.inner.write().await.reviews.push(review.clone());
        Ok(())
    }

    async fn list_reviews(&self) -> LeagueResult<Vec<Review>> {
        let mut reviews = self.inner.read().await.reviews.clone();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(reviews)
    }

    async fn delete_review(&self, review_id: Uuid) -> LeagueResult<()> {
        let mut data = self.inner.write().await;
        let before = data.reviews.len();
        data.reviews.retain(|review| review.id != review_id);
        if data.reviews.len() == before {
            return Err(LeagueError::not_found("review", review_id));
        }
        Ok(())
    }
}
