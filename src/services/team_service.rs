use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::LeagueStore;
use crate::error::{LeagueError, LeagueResult};
use crate::league::standings::{open_fixtures, recent_form, recent_results, FORM_LENGTH};
use crate::models::team::{
    CreatePlayerRequest, CreateTeamRequest, Player, PlayerStatistics, Team, TeamMatchesResponse,
    UpdatePlayerRequest,
};
use crate::services::match_service::MatchService;

const UPCOMING_FIXTURES: usize = 5;

/// Team and player registration plus per-team read models
#[derive(Clone)]
pub struct TeamService {
    store: Arc<dyn LeagueStore>,
    matches: MatchService,
}

impl TeamService {
    pub fn new(store: Arc<dyn LeagueStore>, matches: MatchService) -> Self {
        Self { store, matches }
    }

    pub async fn create_team(&self, request: CreateTeamRequest) -> LeagueResult<Team> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(LeagueError::InvalidInput("team name is required".to_string()));
        }

        let team = Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            short_name: request.short_name,
            city: request.city,
            stadium: request.stadium,
            logo_url: request.logo_url,
            created_at: Utc::now(),
        };
        self.store.insert_team(&team).await?;
        tracing::info!("Registered team {} ({})", team.name, team.id);
        Ok(team)
    }

    pub async fn create_player(&self, request: CreatePlayerRequest) -> LeagueResult<Player> {
        if request.name.trim().is_empty() {
            return Err(LeagueError::InvalidInput("player name is required".to_string()));
        }
        if request.jersey_number < 0 {
            return Err(LeagueError::InvalidInput("jersey number cannot be negative".to_string()));
        }
        self.get_team(request.team_id).await?;

        let player = Player {
            id: Uuid::new_v4(),
            team_id: request.team_id,
            name: request.name.trim().to_string(),
            display_name: request.display_name,
            position: request.position,
            jersey_number: request.jersey_number,
            nationality: request.nationality,
            image_path: request.image_path,
            goals: 0,
            assists: 0,
            clean_sheets: 0,
        };
        self.store.insert_player(&player).await?;
        Ok(player)
    }

    /// Applies the fields present in `request`. A new position or jersey
    /// number can change who keeps goal for a side, so clean sheets are
    /// recomputed when either moves.
    pub async fn update_player(&self, player_id: Uuid, request: UpdatePlayerRequest) -> LeagueResult<Player> {
        let mut player = self.get_player(player_id).await?;
        let keeper_before = (player.position_kind(), player.jersey_number);

        if let Some(name) = request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(LeagueError::InvalidInput("player name is required".to_string()));
            }
            player.name = name.to_string();
        }
        if let Some(jersey_number) = request.jersey_number {
            if jersey_number < 0 {
                return Err(LeagueError::InvalidInput("jersey number cannot be negative".to_string()));
            }
            player.jersey_number = jersey_number;
        }
        if let Some(position) = request.position {
            player.position = position;
        }
        if request.display_name.is_some() {
            player.display_name = request.display_name;
        }
        if request.nationality.is_some() {
            player.nationality = request.nationality;
        }
        if request.image_path.is_some() {
            player.image_path = request.image_path;
        }

        self.store.update_player(&player).await?;
        tracing::info!("Updated player {} ({})", player.label(), player.id);

        if keeper_before != (player.position_kind(), player.jersey_number) {
            self.matches.aggregates().rebuild_statistics().await?;
            player = self.get_player(player_id).await?;
        }
        Ok(player)
    }

    /// Players with goal events or credited statistics stay on record.
    pub async fn delete_player(&self, player_id: Uuid) -> LeagueResult<()> {
        let player = self.get_player(player_id).await?;
        if self.store.player_event_count(player_id).await? > 0 {
            return Err(LeagueError::InvalidInput(format!(
                "player {} appears in goal events and cannot be deleted",
                player_id
            )));
        }
        if player.statistics() != PlayerStatistics::default() {
            return Err(LeagueError::InvalidInput(format!(
                "player {} has recorded statistics and cannot be deleted",
                player_id
            )));
        }

        self.store.delete_player(player_id).await?;
        tracing::info!("Deleted player {} ({})", player.label(), player_id);
        Ok(())
    }

    pub async fn list_players(&self) -> LeagueResult<Vec<Player>> {
        self.store.list_players().await
    }

    pub async fn list_teams(&self) -> LeagueResult<Vec<Team>> {
        self.store.list_teams().await
    }

    pub async fn get_team(&self, team_id: Uuid) -> LeagueResult<Team> {
        self.store
            .get_team(team_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("team", team_id))
    }

    pub async fn squad(&self, team_id: Uuid) -> LeagueResult<Vec<Player>> {
        self.get_team(team_id).await?;
        self.store.team_squad(team_id).await
    }

    pub async fn get_player(&self, player_id: Uuid) -> LeagueResult<Player> {
        self.store
            .get_player(player_id)
            .await?
            .ok_or_else(|| LeagueError::not_found("player", player_id))
    }

    /// Recent results, form, the next fixture and the ones after it.
    pub async fn team_matches(&self, team_id: Uuid) -> LeagueResult<TeamMatchesResponse> {
        let team = self.get_team(team_id).await?;
        let matches = self.store.list_matches().await?;

        let recent = recent_results(team_id, &matches)
            .into_iter()
            .take(FORM_LENGTH)
            .cloned()
            .collect();
        let form = recent_form(team_id, &matches, FORM_LENGTH);
        let mut open = open_fixtures(team_id, &matches).into_iter().cloned();
        let next = open.next();
        let upcoming = open.take(UPCOMING_FIXTURES).collect();

        let recent_matches = self.matches.summarize(recent).await?;
        let next_match = match next {
            Some(fixture) => self.matches.summarize(vec![fixture]).await?.pop(),
            None => None,
        };
        let upcoming = self.matches.summarize(upcoming).await?;

        Ok(TeamMatchesResponse {
            team,
            recent_matches,
            form,
            next_match,
            upcoming,
        })
    }
}
