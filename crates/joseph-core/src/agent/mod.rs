//! Autonomous agent control surface.
//!
//! The chat module treats the agent as an opaque collaborator: it can be
//! started, stopped, and asked for a status snapshot. Nothing else about its
//! behaviour is assumed here.

use std::sync::RwLock;

use chrono::Utc;
use joseph_types::agent::AgentStatus;
use tracing::info;

/// Start/stop/status control over the background agent.
pub trait AgentControl: Send + Sync {
    /// Start the agent. Returns `false` if it was already running.
    fn start(&self) -> bool;

    /// Stop the agent. Returns `false` if it was not running.
    fn stop(&self) -> bool;

    fn status(&self) -> AgentStatus;
}

/// In-process agent handle that only tracks its lifecycle.
///
/// Records `started_at` / `stopped_at` in `last_updates`; task counters stay
/// at zero because no work is scheduled.
#[derive(Debug, Default)]
pub struct LocalAgentControl {
    status: RwLock<AgentStatus>,
}

impl LocalAgentControl {
    pub fn new() -> Self {
        Self::default()
    }

    fn transition(&self, running: bool, marker: &str) -> bool {
        let mut status = self.status.write().unwrap_or_else(|e| e.into_inner());
        if status.is_running == running {
            return false;
        }
        status.is_running = running;
        status
            .last_updates
            .insert(marker.to_string(), Utc::now().to_rfc3339());
        info!(running, "Agent state changed");
        true
    }
}

impl AgentControl for LocalAgentControl {
    fn start(&self) -> bool {
        self.transition(true, "started_at")
    }

    fn stop(&self) -> bool {
        self.transition(false, "stopped_at")
    }

    fn status(&self) -> AgentStatus {
        self.status
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_stopped() {
        let agent = LocalAgentControl::new();
        assert!(!agent.status().is_running);
    }

    #[test]
    fn test_start_is_idempotent() {
        let agent = LocalAgentControl::new();
        assert!(agent.start());
        assert!(!agent.start());
        let status = agent.status();
        assert!(status.is_running);
        assert!(status.last_updates.contains_key("started_at"));
    }

    #[test]
    fn test_stop_requires_running() {
        let agent = LocalAgentControl::new();
        assert!(!agent.stop());
        agent.start();
        assert!(agent.stop());
        let status = agent.status();
        assert!(!status.is_running);
        assert!(status.last_updates.contains_key("stopped_at"));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let agent: Box<dyn AgentControl> = Box::new(LocalAgentControl::new());
        assert!(agent.start());
        assert_eq!(agent.status().pending_tasks, 0);
    }
}
