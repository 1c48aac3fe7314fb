//! Autonomous agent status types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Snapshot reported by the agent control surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStatus {
    pub is_running: bool,
    /// Free-form "what changed when" markers, keyed by update kind.
    pub last_updates: HashMap<String, String>,
    pub pending_tasks: u32,
    pub completed_tasks: u32,
    pub memory_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stopped() {
        let status = AgentStatus::default();
        assert!(!status.is_running);
        assert!(status.last_updates.is_empty());
    }

    #[test]
    fn test_status_field_names() {
        let json = serde_json::to_value(AgentStatus::default()).unwrap();
        for key in [
            "is_running",
            "last_updates",
            "pending_tasks",
            "completed_tasks",
            "memory_size",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
