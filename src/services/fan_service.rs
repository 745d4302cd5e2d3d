use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::LeagueStore;
use crate::error::{LeagueError, LeagueResult};
use crate::models::fan::{CreateReviewRequest, FavoriteKind, FavoriteToggle, Favorites, Review, ReviewQuery};

pub const MAX_REVIEW_LENGTH: usize = 2000;

/// Followed teams and players, and fan reviews
#[derive(Clone)]
pub struct FanService {
    store: Arc<dyn LeagueStore>,
}

impl FanService {
    pub fn new(store: Arc<dyn LeagueStore>) -> Self {
        Self { store }
    }

    pub async fn favorites(&self, user_id: Uuid) -> LeagueResult<Favorites> {
        self.store.favorites(user_id).await
    }

    /// Follow or unfollow a team or player that exists.
    pub async fn toggle_favorite(
        &self,
        user_id: Uuid,
        kind: FavoriteKind,
        target_id: Uuid,
    ) -> LeagueResult<FavoriteToggle> {
        self.ensure_exists(kind, target_id).await?;
        let favorite = self.store.toggle_favorite(user_id, kind, target_id).await?;
        tracing::debug!(
            "User {} {} {} {}",
            user_id,
            if favorite { "followed" } else { "unfollowed" },
            kind.label(),
            target_id
        );
        Ok(FavoriteToggle { id: target_id, favorite })
    }

    async fn ensure_exists(&self, kind: FavoriteKind, target_id: Uuid) -> LeagueResult<()> {
        let exists = match kind {
            FavoriteKind::Team => self.store.get_team(target_id).await?.is_some(),
            FavoriteKind::Player => self.store.get_player(target_id).await?.is_some(),
        };
        if !exists {
            return Err(LeagueError::not_found(kind.label(), target_id));
        }
        Ok(())
    }

    /// Newest first, narrowed by the query's subject filters.
    pub async fn list_reviews(&self, query: &ReviewQuery) -> LeagueResult<Vec<Review>> {
        let reviews = self.store.list_reviews().await?;
        let limit = query.limit.filter(|limit| *limit > 0).unwrap_or(usize::MAX);
        Ok(reviews
            .into_iter()
            .filter(|review| query.matches(review))
            .take(limit)
            .collect())
    }

    pub async fn create_review(
        &self,
        user_id: Uuid,
        username: &str,
        request: CreateReviewRequest,
    ) -> LeagueResult<Review> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(LeagueError::InvalidInput("review content is required".to_string()));
        }
        if content.chars().count() > MAX_REVIEW_LENGTH {
            return Err(LeagueError::InvalidInput(format!(
                "review content is limited to {} characters",
                MAX_REVIEW_LENGTH
            )));
        }
        if !(1..=5).contains(&request.rating) {
            return Err(LeagueError::InvalidInput("rating must be between 1 and 5".to_string()));
        }

        if let Some(match_id) = request.match_id {
            if self.store.get_match(match_id).await?.is_none() {
                return Err(LeagueError::not_found("match", match_id));
            }
        }
        if let Some(team_id) = request.team_id {
            self.ensure_exists(FavoriteKind::Team, team_id).await?;
        }
        if let Some(player_id) = request.player_id {
            self.ensure_exists(FavoriteKind::Player, player_id).await?;
        }

        let review = Review {
            id: Uuid::new_v4(),
            user_id,
            username: username.to_string(),
            match_id: request.match_id,
            team_id: request.team_id,
            player_id: request.player_id,
            content: content.to_string(),
            rating: request.rating,
            created_at: Utc::now(),
        };
        self.store.insert_review(&review).await?;
        tracing::info!("Review {} posted by {}", review.id, username);
        Ok(review)
    }

    pub async fn delete_review(&self, review_id: Uuid) -> LeagueResult<()> {
        self.store.delete_review(review_id).await?;
        tracing::info!("Review {} removed", review_id);
        Ok(())
    }
}
