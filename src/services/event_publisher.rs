use std::sync::Arc;

use redis::AsyncCommands;

use crate::models::game_events::LeagueEvent;

pub const LEAGUE_EVENTS_CHANNEL: &str = "league:events:global";

/// Broadcasts live league events over Redis pub/sub. Disabled when no
/// Redis client is configured; failures never reach the caller.
#[derive(Clone, Default)]
pub struct EventPublisher {
    redis_client: Option<Arc<redis::Client>>,
}

impl EventPublisher {
    pub fn new(redis_client: Option<Arc<redis::Client>>) -> Self {
        Self { redis_client }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub async fn publish(&self, event: &LeagueEvent) {
        let Some(redis_client) = &self.redis_client else {
            return;
        };

        if let Err(e) = Self::send(redis_client, event).await {
            tracing::error!("❌ Failed to broadcast event for match {}: {}", event.match_id(), e);
        }
    }

    async fn send(
        redis_client: &redis::Client,
        event: &LeagueEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = redis_client.get_async_connection().await?;
        let message = serde_json::to_string(event)?;
        let receivers: i32 = conn.publish(LEAGUE_EVENTS_CHANNEL, message).await?;
        tracing::debug!("📡 Broadcasted event for match {} to {} subscribers", event.match_id(), receivers);
        Ok(())
    }
}
