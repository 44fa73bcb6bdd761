//! Runtime for live riddle sessions
//!
//! Each session is owned by its own task; the manager only keeps the handles
//! needed to talk to it.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::session::{Event, Message, Session, SessionState, TransitionError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch, RwLock};
use tokio::time::MissedTickBehavior;

/// Pending commands per session before senders have to wait
const COMMAND_QUEUE_DEPTH: usize = 32;
const BROADCAST_CAPACITY: usize = 128;

/// Sessions nobody has touched for this long are dropped
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
pub const IDLE_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A unit of work for a session runtime
#[derive(Debug)]
pub struct SessionCommand {
    pub event: Event,
    /// Receives the session as it stands once the event is fully processed
    pub reply: Option<oneshot::Sender<Result<Session, TransitionError>>>,
}

/// Events sent to SSE clients, serialized as `{"type": ..., ...}`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseEvent {
    Init { session: Session },
    Message { message: Message },
    StateChange { state: SessionState },
    /// Transcript was wiped by a reset
    Cleared,
    Error { message: String },
}

impl SseEvent {
    /// SSE `event:` field, matching the serialized `type`
    pub fn name(&self) -> &'static str {
        match self {
            SseEvent::Init { .. } => "init",
            SseEvent::Message { .. } => "message",
            SseEvent::StateChange { .. } => "state_change",
            SseEvent::Cleared => "cleared",
            SseEvent::Error { .. } => "error",
        }
    }
}

/// Errors surfaced by the session manager
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),
    #[error("Session runtime stopped: {0}")]
    Stopped(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Handle to interact with a running session
pub struct SessionHandle {
    pub command_tx: mpsc::Sender<SessionCommand>,
    pub snapshot_rx: watch::Receiver<Session>,
    pub broadcast_tx: broadcast::Sender<SseEvent>,
    /// Milliseconds since the manager's epoch at the last client request
    last_active_ms: AtomicU64,
}

impl SessionHandle {
    fn touch(&self, now_ms: u64) {
        self.last_active_ms.fetch_max(now_ms, Ordering::Relaxed);
    }

    fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_active_ms.load(Ordering::Relaxed))
    }
}

/// Manager for all session runtimes
pub struct SessionManager {
    client: Arc<dyn RiddleClient>,
    sessions: RwLock<HashMap<String, SessionHandle>>,
    idle_ttl: Duration,
    epoch: Instant,
}

impl SessionManager {
    pub fn new(client: Arc<dyn RiddleClient>) -> Self {
        Self {
            client,
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: SESSION_IDLE_TTL,
            epoch: Instant::now(),
        }
    }

    #[cfg(test)]
    pub fn with_idle_ttl(mut self, idle_ttl: Duration) -> Self {
        self.idle_ttl = idle_ttl;
        self
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Start a fresh, greeted session
    pub async fn create(&self) -> Session {
        let id = uuid::Uuid::new_v4().to_string();
        let session = Session::new(id.clone());

        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.clone());
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);

        let runtime = SessionRuntime::new(
            session.clone(),
            self.client.clone(),
            command_rx,
            snapshot_tx,
            broadcast_tx.clone(),
        );
        tokio::spawn(runtime.run());

        self.sessions.write().await.insert(
            id.clone(),
            SessionHandle {
                command_tx,
                snapshot_rx,
                broadcast_tx,
                last_active_ms: AtomicU64::new(self.now_ms()),
            },
        );
        tracing::info!(session_id = %id, "Created session");

        session
    }

    /// Latest published state of a session
    pub async fn snapshot(&self, id: &str) -> Result<Session, SessionError> {
        let sessions = self.sessions.read().await;
        let handle = sessions
            .get(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        handle.touch(self.now_ms());
        let snapshot = handle.snapshot_rx.borrow().clone();
        Ok(snapshot)
    }

    pub async fn submit(&self, id: &str, text: String) -> Result<Session, SessionError> {
        self.dispatch(id, Event::UserSubmit { text }).await
    }

    pub async fn reset(&self, id: &str) -> Result<Session, SessionError> {
        self.dispatch(id, Event::Reset).await
    }

    /// Current snapshot plus a live feed of later updates
    pub async fn subscribe(
        &self,
        id: &str,
    ) -> Result<(Session, broadcast::Receiver<SseEvent>), SessionError> {
        let sessions = self.sessions.read().await;
        let handle = sessions
            .get(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        handle.touch(self.now_ms());
        // Subscribe first so nothing falls between the snapshot and the feed
        let rx = handle.broadcast_tx.subscribe();
        let snapshot = handle.snapshot_rx.borrow().clone();
        Ok((snapshot, rx))
    }

    /// Drop a session; its runtime stops once queued work drains
    pub async fn remove(&self, id: &str) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(id).is_none() {
            return Err(SessionError::NotFound(id.to_string()));
        }
        tracing::info!(session_id = %id, "Removed session");
        Ok(())
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than the TTL, returning how many went.
    /// Sessions with an open event stream are kept.
    pub async fn evict_idle(&self) -> usize {
        let now = self.now_ms();
        let ttl_ms = u64::try_from(self.idle_ttl.as_millis()).unwrap_or(u64::MAX);

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, handle| {
            let idle_ms = handle.idle_ms(now);
            let keep = idle_ms < ttl_ms || handle.broadcast_tx.receiver_count() > 0;
            if !keep {
                tracing::info!(session_id = %id, idle_ms, "Evicting idle session");
            }
            keep
        });
        before - sessions.len()
    }

    /// Periodically evict idle sessions until the manager is dropped
    pub fn spawn_idle_sweeper(self: &Arc<Self>, period: Duration) {
        let manager = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(manager) = manager.upgrade() else {
                    break;
                };
                let evicted = manager.evict_idle().await;
                if evicted > 0 {
                    tracing::info!(evicted, "Swept idle sessions");
                }
            }
        });
    }

    async fn dispatch(&self, id: &str, event: Event) -> Result<Session, SessionError> {
        // Clone the sender so the map lock is not held across the exchange
        let command_tx = {
            let sessions = self.sessions.read().await;
            let handle = sessions
                .get(id)
                .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
            handle.touch(self.now_ms());
            handle.command_tx.clone()
        };

        let (reply, reply_rx) = oneshot::channel();
        command_tx
            .send(SessionCommand {
                event,
                reply: Some(reply),
            })
            .await
            .map_err(|_| SessionError::Stopped(id.to_string()))?;

        let outcome = reply_rx
            .await
            .map_err(|_| SessionError::Stopped(id.to_string()))?;
        Ok(outcome?)
    }
}
