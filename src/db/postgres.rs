use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;
use tracing::debug;

use crate::config::settings::StoreTimeouts;
use crate::db::store::LeagueStore;
use crate::error::{LeagueError, LeagueResult};
use crate::models::fan::{FavoriteKind, Favorites, Review};
use crate::models::goal_event::GoalEvent;
use crate::models::league::{LeagueMatch, MatchStatus, Standing};
use crate::models::team::{Player, PlayerStatistics, Team};
use crate::models::user::User;

const MATCH_COLUMNS: &str = "id, home_team_id, away_team_id, matchday, scheduled_at, status, \
     home_score, away_score, created_at, updated_at";

const PLAYER_COLUMNS: &str = "id, team_id, name, display_name, position, jersey_number, \
     nationality, image_path, goals, assists, clean_sheets";

const GOAL_EVENT_COLUMNS: &str = "id, match_id, matchday, scorer_id, scorer_name, assist_id, \
     assist_name, team_id, team_name, minute, is_home_goal, created_at";

const REVIEW_COLUMNS: &str = "id, user_id, username, match_id, team_id, player_id, content, \
     rating, created_at";

const STANDING_COLUMNS: &str = "team_id, played, wins, draws, losses, points, goals_for, \
     goals_against, goal_difference";

/// Favorite table and its target column
fn favorite_table(kind: FavoriteKind) -> (&'static str, &'static str) {
    match kind {
        FavoriteKind::Team => ("favorite_teams", "team_id"),
        FavoriteKind::Player => ("favorite_players", "player_id"),
    }
}

/// Postgres-backed league store
#[derive(Debug, Clone)]
pub struct PgLeagueStore {
    pool: PgPool,
    timeouts: StoreTimeouts,
}

impl PgLeagueStore {
    pub fn new(pool: PgPool, timeouts: StoreTimeouts) -> Self {
        Self { pool, timeouts }
    }

    /// Run a single read/write under the short timeout
    async fn query<T, F>(&self, fut: F) -> LeagueResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        bounded(self.timeouts.query, fut).await
    }

    /// Run a full-table read or multi-row rewrite under the long timeout
    async fn scan<T, F>(&self, fut: F) -> LeagueResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        bounded(self.timeouts.scan, fut).await
    }
}

async fn bounded<T, F>(limit: Duration, fut: F) -> LeagueResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    Ok(tokio::time::timeout(limit, fut).await??)
}

#[async_trait]
impl LeagueStore for PgLeagueStore {
    async fn list_matches(&self) -> LeagueResult<Vec<LeagueMatch>> {
        let sql = format!(
            "SELECT {} FROM matches ORDER BY matchday, scheduled_at, id",
            MATCH_COLUMNS
        );
        self.scan(sqlx::query_as::<_, LeagueMatch>(&sql).fetch_all(&self.pool)).await
    }

    async fn get_match(&self, match_id: Uuid) -> LeagueResult<Option<LeagueMatch>> {
        let sql = format!("SELECT {} FROM matches WHERE id = $1", MATCH_COLUMNS);
        self.query(
            sqlx::query_as::<_, LeagueMatch>(&sql)
                .bind(match_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert_match(&self, fixture: &LeagueMatch) -> LeagueResult<()> {
        self.query(
            sqlx::query(
                r#"
                INSERT INTO matches (
                    id, home_team_id, away_team_id, matchday, scheduled_at, status,
                    home_score, away_score, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(fixture.id)
            .bind(fixture.home_team_id)
            .bind(fixture.away_team_id)
            .bind(fixture.matchday)
            .bind(fixture.scheduled_at)
            .bind(fixture.status.as_str())
            .bind(fixture.home_score)
            .bind(fixture.away_score)
            .bind(fixture.created_at)
            .bind(fixture.updated_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn transition_match(
        &self,
        match_id: Uuid,
        from: MatchStatus,
        to: MatchStatus,
    ) -> LeagueResult<bool> {
        let result = self
            .query(
                sqlx::query(
                    "UPDATE matches SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2",
                )
                .bind(match_id)
                .bind(from.as_str())
                .bind(to.as_str())
                .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn set_match_score(&self, match_id: Uuid, home_score: i32, away_score: i32) -> LeagueResult<()> {
        let result = self
            .query(
                sqlx::query(
                    "UPDATE matches SET home_score = $2, away_score = $3, updated_at = NOW() WHERE id = $1",
                )
                .bind(match_id)
                .bind(home_score)
                .bind(away_score)
                .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("match", match_id));
        }
        Ok(())
    }

    async fn complete_match(&self, match_id: Uuid, home_score: i32, away_score: i32) -> LeagueResult<bool> {
        let result = self
            .query(
                sqlx::query(
                    r#"
                    UPDATE matches
                    SET status = 'finished', home_score = $2, away_score = $3, updated_at = NOW()
                    WHERE id = $1 AND status = 'live'
                    "#,
                )
                .bind(match_id)
                .bind(home_score)
                .bind(away_score)
                .execute(&self.pool),
            )
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn finished_matches(&self) -> LeagueResult<Vec<LeagueMatch>> {
        let sql = format!(
            "SELECT {} FROM matches WHERE status = 'finished' ORDER BY scheduled_at, id",
            MATCH_COLUMNS
        );
        self.scan(sqlx::query_as::<_, LeagueMatch>(&sql).fetch_all(&self.pool)).await
    }

    async fn list_teams(&self) -> LeagueResult<Vec<Team>> {
        self.scan(
            sqlx::query_as::<_, Team>(
                "SELECT id, name, short_name, city, stadium, logo_url, created_at FROM teams ORDER BY name",
            )
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn get_team(&self, team_id: Uuid) -> LeagueResult<Option<Team>> {
        self.query(
            sqlx::query_as::<_, Team>(
                "SELECT id, name, short_name, city, stadium, logo_url, created_at FROM teams WHERE id = $1",
            )
            .bind(team_id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert_team(&self, team: &Team) -> LeagueResult<()> {
        self.query(
            sqlx::query(
                r#"
                INSERT INTO teams (id, name, short_name, city, stadium, logo_url, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(team.id)
            .bind(&team.name)
            .bind(&team.short_name)
            .bind(&team.city)
            .bind(&team.stadium)
            .bind(&team.logo_url)
            .bind(team.created_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn team_squad(&self, team_id: Uuid) -> LeagueResult<Vec<Player>> {
        let sql = format!(
            "SELECT {} FROM players WHERE team_id = $1 ORDER BY jersey_number, id",
            PLAYER_COLUMNS
        );
        self.query(
            sqlx::query_as::<_, Player>(&sql)
                .bind(team_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn list_players(&self) -> LeagueResult<Vec<Player>> {
        let sql = format!("SELECT {} FROM players ORDER BY team_id, jersey_number, id", PLAYER_COLUMNS);
        self.scan(sqlx::query_as::<_, Player>(&sql).fetch_all(&self.pool)).await
    }

    async fn get_player(&self, player_id: Uuid) -> LeagueResult<Option<Player>> {
        let sql = format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS);
        self.query(
            sqlx::query_as::<_, Player>(&sql)
                .bind(player_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert_player(&self, player: &Player) -> LeagueResult<()> {
        self.query(
            sqlx::query(
                r#"
                INSERT INTO players (
                    id, team_id, name, display_name, position, jersey_number,
                    nationality, image_path, goals, assists, clean_sheets
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(player.id)
            .bind(player.team_id)
            .bind(&player.name)
            .bind(&player.display_name)
            .bind(&player.position)
            .bind(player.jersey_number)
            .bind(&player.nationality)
            .bind(&player.image_path)
            .bind(player.goals)
            .bind(player.assists)
            .bind(player.clean_sheets)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn update_player(&self, player: &Player) -> LeagueResult<()> {
        let result = self
            .query(
                sqlx::query(
                    r#"
                    UPDATE players
                    SET name = $2, display_name = $3, position = $4, jersey_number = $5,
                        nationality = $6, image_path = $7
                    WHERE id = $1
                    "#,
                )
                .bind(player.id)
                .bind(&player.name)
                .bind(&player.display_name)
                .bind(&player.position)
                .bind(player.jersey_number)
                .bind(&player.nationality)
                .bind(&player.image_path)
                .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("player", player.id));
        }
        Ok(())
    }

    async fn delete_player(&self, player_id: Uuid) -> LeagueResult<()> {
        // favorites cascade, reviews are set to NULL by the schema
        let result = self
            .query(
                sqlx::query("DELETE FROM players WHERE id = $1")
                    .bind(player_id)
                    .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("player", player_id));
        }
        Ok(())
    }

    async fn player_event_count(&self, player_id: Uuid) -> LeagueResult<i64> {
        self.query(
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM goal_events WHERE scorer_id = $1 OR assist_id = $1",
            )
            .bind(player_id)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn increment_player_stats(&self, player_id: Uuid, delta: PlayerStatistics) -> LeagueResult<()> {
        let result = self
            .query(
                sqlx::query(
                    r#"
                    UPDATE players
                    SET goals = goals + $2, assists = assists + $3, clean_sheets = clean_sheets + $4
                    WHERE id = $1
                    "#,
                )
                .bind(player_id)
                .bind(delta.goals)
                .bind(delta.assists)
                .bind(delta.clean_sheets)
                .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("player", player_id));
        }
        Ok(())
    }

    async fn replace_player_stats(&self, totals: &HashMap<Uuid, PlayerStatistics>) -> LeagueResult<()> {
        let pool = self.pool.clone();
        let owned_totals = totals.clone();
        self.scan(async move {
            let mut tx = pool.begin().await?;
            sqlx::query("UPDATE players SET goals = 0, assists = 0, clean_sheets = 0")
                .execute(&mut *tx)
                .await?;
            for (player_id, stats) in &owned_totals {
                sqlx::query(
                    "UPDATE players SET goals = $2, assists = $3, clean_sheets = $4 WHERE id = $1",
                )
                .bind(player_id)
                .bind(stats.goals)
                .bind(stats.assists)
                .bind(stats.clean_sheets)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await
        })
        .await?;
        debug!("Replaced statistics for {} players", totals.len());
        Ok(())
    }

    async fn insert_goal_event(&self, event: &GoalEvent) -> LeagueResult<()> {
        self.query(
            sqlx::query(
                r#"
                INSERT INTO goal_events (
                    id, match_id, matchday, scorer_id, scorer_name, assist_id, assist_name,
                    team_id, team_name, minute, is_home_goal, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(event.id)
            .bind(event.match_id)
            .bind(event.matchday)
            .bind(event.scorer_id)
            .bind(&event.scorer_name)
            .bind(event.assist_id)
            .bind(&event.assist_name)
            .bind(event.team_id)
            .bind(&event.team_name)
            .bind(event.minute)
            .bind(event.is_home_goal)
            .bind(event.created_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn goal_events_for_match(&self, match_id: Uuid) -> LeagueResult<Vec<GoalEvent>> {
        let sql = format!(
            "SELECT {} FROM goal_events WHERE match_id = $1 ORDER BY minute, created_at, id",
            GOAL_EVENT_COLUMNS
        );
        self.query(
            sqlx::query_as::<_, GoalEvent>(&sql)
                .bind(match_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn all_goal_events(&self) -> LeagueResult<Vec<GoalEvent>> {
        let sql = format!(
            "SELECT {} FROM goal_events ORDER BY match_id, minute, created_at, id",
            GOAL_EVENT_COLUMNS
        );
        self.scan(sqlx::query_as::<_, GoalEvent>(&sql).fetch_all(&self.pool)).await
    }

    async fn get_goal_event(&self, match_id: Uuid, event_id: Uuid) -> LeagueResult<Option<GoalEvent>> {
        let sql = format!(
            "SELECT {} FROM goal_events WHERE id = $1 AND match_id = $2",
            GOAL_EVENT_COLUMNS
        );
        self.query(
            sqlx::query_as::<_, GoalEvent>(&sql)
                .bind(event_id)
                .bind(match_id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn update_goal_event(&self, event: &GoalEvent) -> LeagueResult<()> {
        let result = self
            .query(
                sqlx::query(
                    r#"
                    UPDATE goal_events
                    SET scorer_id = $3, scorer_name = $4, assist_id = $5, assist_name = $6,
                        team_id = $7, team_name = $8, minute = $9, is_home_goal = $10
                    WHERE id = $1 AND match_id = $2
                    "#,
                )
                .bind(event.id)
                .bind(event.match_id)
                .bind(event.scorer_id)
                .bind(&event.scorer_name)
                .bind(event.assist_id)
                .bind(&event.assist_name)
                .bind(event.team_id)
                .bind(&event.team_name)
                .bind(event.minute)
                .bind(event.is_home_goal)
                .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("goal event", event.id));
        }
        Ok(())
    }

    async fn delete_goal_event(&self, match_id: Uuid, event_id: Uuid) -> LeagueResult<()> {
        let result = self
            .query(
                sqlx::query("DELETE FROM goal_events WHERE id = $1 AND match_id = $2")
                    .bind(event_id)
                    .bind(match_id)
                    .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("goal event", event_id));
        }
        Ok(())
    }

    async fn count_goals(&self, match_id: Uuid) -> LeagueResult<(i32, i32)> {
        let row = self
            .query(
                sqlx::query(
                    r#"
                    SELECT
                        COUNT(*) FILTER (WHERE is_home_goal) AS home_goals,
                        COUNT(*) FILTER (WHERE NOT is_home_goal) AS away_goals
                    FROM goal_events
                    WHERE match_id = $1
                    "#,
                )
                .bind(match_id)
                .fetch_one(&self.pool),
            )
            .await?;
        let home: i64 = row.try_get("home_goals")?;
        let away: i64 = row.try_get("away_goals")?;
        Ok((home as i32, away as i32))
    }

    async fn record_standing_result(&self, team_id: Uuid, scored: i32, conceded: i32) -> LeagueResult<()> {
        let (win, draw, loss) = if scored > conceded {
            (1, 0, 0)
        } else if scored == conceded {
            (0, 1, 0)
        } else {
            (0, 0, 1)
        };
        self.query(
            sqlx::query(
                r#"
                INSERT INTO standings (
                    team_id, played, wins, draws, losses, points,
                    goals_for, goals_against, goal_difference, updated_at
                ) VALUES ($1, 1, $2, $3, $4, $2 * 3 + $3, $5, $6, $5 - $6, NOW())
                ON CONFLICT (team_id) DO UPDATE SET
                    played = standings.played + 1,
                    wins = standings.wins + $2,
                    draws = standings.draws + $3,
                    losses = standings.losses + $4,
                    points = standings.points + $2 * 3 + $3,
                    goals_for = standings.goals_for + $5,
                    goals_against = standings.goals_against + $6,
                    goal_difference = standings.goal_difference + $5 - $6,
                    updated_at = NOW()
                "#,
            )
            .bind(team_id)
            .bind(win)
            .bind(draw)
            .bind(loss)
            .bind(scored)
            .bind(conceded)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn list_standings(&self) -> LeagueResult<Vec<Standing>> {
        let sql = format!("SELECT {} FROM standings", STANDING_COLUMNS);
        self.scan(sqlx::query_as::<_, Standing>(&sql).fetch_all(&self.pool)).await
    }

    async fn replace_standings(&self, rows: &[Standing]) -> LeagueResult<()> {
        let pool = self.pool.clone();
        let rows = rows.to_vec();
        self.scan(async move {
            let mut tx = pool.begin().await?;
            sqlx::query("DELETE FROM standings").execute(&mut *tx).await?;
            for row in &rows {
                sqlx::query(
                    r#"
                    INSERT INTO standings (
                        team_id, played, wins, draws, losses, points,
                        goals_for, goals_against, goal_difference, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
                    "#,
                )
                .bind(row.team_id)
                .bind(row.played)
                .bind(row.wins)
                .bind(row.draws)
                .bind(row.losses)
                .bind(row.points)
                .bind(row.goals_for)
                .bind(row.goals_against)
                .bind(row.goal_difference)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await
        })
        .await
    }

    async fn find_user_by_username(&self, username: &str) -> LeagueResult<Option<User>> {
        self.query(
            sqlx::query_as::<_, User>(
                "SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1",
            )
            .bind(username)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert_user(&self, user: &User) -> LeagueResult<()> {
        self.query(
            sqlx::query(
                "INSERT INTO users (id, username, password_hash, role, created_at) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(user.created_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn toggle_favorite(&self, user_id: Uuid, kind: FavoriteKind, target_id: Uuid) -> LeagueResult<bool> {
        let (table, column) = favorite_table(kind);
        let pool = self.pool.clone();
        self.query(async move {
            let mut tx = pool.begin().await?;
            let removed = sqlx::query(&format!(
                "DELETE FROM {} WHERE user_id = $1 AND {} = $2",
                table, column
            ))
            .bind(user_id)
            .bind(target_id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
                > 0;
            if !removed {
                sqlx::query(&format!(
                    "INSERT INTO {} (user_id, {}, created_at) VALUES ($1, $2, NOW()) ON CONFLICT DO NOTHING",
                    table, column
                ))
                .bind(user_id)
                .bind(target_id)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await?;
            Ok::<bool, sqlx::Error>(!removed)
        })
        .await
    }

    async fn favorites(&self, user_id: Uuid) -> LeagueResult<Favorites> {
        let mut favorites = Favorites::default();
        for kind in [FavoriteKind::Team, FavoriteKind::Player] {
            let (table, column) = favorite_table(kind);
            let sql = format!(
                "SELECT {column} FROM {table} WHERE user_id = $1 ORDER BY created_at, {column}",
                column = column,
                table = table
            );
            let ids = self
                .query(
                    sqlx::query_scalar::<_, Uuid>(&sql)
                        .bind(user_id)
                        .fetch_all(&self.pool),
                )
                .await?;
            match kind {
                FavoriteKind::Team => favorites.teams = ids,
                FavoriteKind::Player => favorites.players = ids,
            }
        }
        Ok(favorites)
    }

    async fn insert_review(&self, review: &Review) -> LeagueResult<()> {
        self.query(
            sqlx::query(
                r#"
                INSERT INTO reviews (
                    id, user_id, username, match_id, team_id, player_id, content, rating, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(review.id)
            .bind(review.user_id)
            .bind(&review.username)
            .bind(review.match_id)
            .bind(review.team_id)
            .bind(review.player_id)
            .bind(&review.content)
            .bind(review.rating)
            .bind(review.created_at)
            .execute(&self.pool),
        )
        .await?;
        Ok(())
    }

    async fn list_reviews(&self) -> LeagueResult<Vec<Review>> {
        let sql = format!(
            "SELECT {} FROM reviews ORDER BY created_at DESC, id DESC",
            REVIEW_COLUMNS
        );
        self.scan(sqlx::query_as::<_, Review>(&sql).fetch_all(&self.pool)).await
    }

    async fn delete_review(&self, review_id: Uuid) -> LeagueResult<()> {
        let result = self
            .query(
                sqlx::query("DELETE FROM reviews WHERE id = $1")
                    .bind(review_id)
                    .execute(&self.pool),
            )
            .await?;
        if result.rows_affected() == 0 {
            return Err(LeagueError::not_found("review", review_id));
        }
        Ok(())
    }
}
