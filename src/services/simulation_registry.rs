use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

/// Cancellation side of a running simulation. The task observes `true` once stop is requested.
pub type CancelSignal = watch::Receiver<bool>;

struct SimulationHandle {
    generation: u64,
    cancel: watch::Sender<bool>,
    done: Shared<BoxFuture<'static, ()>>,
}

/// Owns every in-flight live simulation, one per match.
///
/// Entries are created on launch and removed when the task completes or is
/// stopped. A finished task only removes its own entry, identified by the
/// generation it was launched with.
#[derive(Clone, Default)]
pub struct SimulationRegistry {
    active: Arc<Mutex<HashMap<Uuid, SimulationHandle>>>,
    generations: Arc<AtomicU64>,
}

impl SimulationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the simulation built by `make` for `match_id`.
    ///
    /// Returns `false` without spawning when one is already running for the match.
    pub async fn launch<F, Fut>(&self, match_id: Uuid, make: F) -> bool
    where
        F: FnOnce(CancelSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut active = self.active.lock().await;
        if active.contains_key(&match_id) {
            tracing::warn!("Simulation for match {} is already running", match_id);
            return false;
        }

        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let (cancel, signal) = watch::channel(false);
        let simulation = make(signal);
        let registry = self.clone();

        let task = tokio::spawn(async move {
            simulation.await;
            registry.release(match_id, generation).await;
        });
        let done = task
            .map(move |joined| {
                if let Err(e) = joined {
                    tracing::error!("Simulation task for match {} failed: {}", match_id, e);
                }
            })
            .boxed()
            .shared();

        active.insert(match_id, SimulationHandle { generation, cancel, done });
        tracing::info!("▶️ Simulation launched for match {}", match_id);
        true
    }

    async fn release(&self, match_id: Uuid, generation: u64) {
        let mut active = self.active.lock().await;
        if active.get(&match_id).map(|handle| handle.generation) == Some(generation) {
            active.remove(&match_id);
            tracing::debug!("Simulation for match {} released", match_id);
        }
    }

    /// Cancel the simulation for `match_id` and wait for it to wind down.
    /// A no-op when nothing is running. Returns whether a task was stopped.
    pub async fn stop(&self, match_id: Uuid) -> bool {
        let handle = self.active.lock().await.remove(&match_id);
        match handle {
            Some(handle) => {
                let _ = handle.cancel.send(true);
                handle.done.await;
                tracing::info!("⏹️ Simulation for match {} stopped", match_id);
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self, match_id: Uuid) -> bool {
        self.active.lock().await.contains_key(&match_id)
    }

    pub async fn active_matches(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.active.lock().await.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Wait until the simulation for `match_id` has completed, if one is running.
    pub async fn wait_for(&self, match_id: Uuid) {
        let done = self
            .active
            .lock()
            .await
            .get(&match_id)
            .map(|handle| handle.done.clone());
        if let Some(done) = done {
            done.await;
        }
    }

    /// Cancel every running simulation and wait for each, bounded by `grace`.
    pub async fn shutdown(&self, grace: Duration) {
        let handles: Vec<(Uuid, SimulationHandle)> = self.active.lock().await.drain().collect();
        if handles.is_empty() {
            return;
        }

        tracing::info!("Stopping {} running simulations", handles.len());
        for (_, handle) in &handles {
            let _ = handle.cancel.send(true);
        }

        let all_done = futures::future::join_all(handles.into_iter().map(|(_, handle)| handle.done));
        if tokio::time::timeout(grace, all_done).await.is_err() {
            tracing::warn!("Simulations did not stop within {:?}", grace);
        }
    }
}
