//! HTTP API: the riddle relay, the session surface and the embedded UI

mod assets;
mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::proxy::RiddleProxy;
use crate::runtime::{ProxyRiddleClient, SessionManager, IDLE_SWEEP_INTERVAL};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub proxy: RiddleProxy,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Must be called from within a tokio runtime; starts the idle-session sweeper
    pub fn new(proxy: RiddleProxy) -> Self {
        let client = Arc::new(ProxyRiddleClient::new(proxy.clone()));
        let sessions = Arc::new(SessionManager::new(client));
        sessions.spawn_idle_sweeper(IDLE_SWEEP_INTERVAL);
        Self { proxy, sessions }
    }
}
