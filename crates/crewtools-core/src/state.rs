//! Shared crew state.
//!
//! The orchestrator owns a [`CrewState`] and seeds its `env` map with
//! credential keys before any tool runs.  Tools receive a cheap clone and
//! only ever read from it via [`CrewState::env_var`]; all mutation happens
//! on the orchestrator side.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key-value state bag shared between an orchestrator and its tools.
///
/// Cloning is cheap: clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct CrewState {
    env: Arc<RwLock<HashMap<String, String>>>,
}

impl CrewState {
    /// Create an empty state bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a credential key in the `env` map.
    ///
    /// This is the only accessor tools use; they never write.
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.read().ok().and_then(|env| env.get(key).cloned())
    }

    /// Seed a single env key.
    pub fn set_env_var(&self, key: &str, value: &str) {
        if let Ok(mut env) = self.env.write() {
            env.insert(key.to_string(), value.to_string());
        }
    }

    /// Replace the whole env map.
    pub fn set_env(&self, vars: HashMap<String, String>) {
        if let Ok(mut env) = self.env.write() {
            *env = vars;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_returns_none_for_missing_key() {
        let state = CrewState::new();
        assert!(state.env_var("GOOGLE_ACCESS_TOKEN").is_none());
    }

    #[test]
    fn set_env_var_is_visible_to_clones() {
        let state = CrewState::new();
        let view = state.clone();
        state.set_env_var("WORDPRESS_URL", "https://blog.example.com");
        assert_eq!(
            view.env_var("WORDPRESS_URL").as_deref(),
            Some("https://blog.example.com")
        );
    }

    #[test]
    fn set_env_replaces_existing_map() {
        let state = CrewState::new();
        state.set_env_var("A", "1");
        state.set_env(HashMap::from([("B".to_string(), "2".to_string())]));
        assert!(state.env_var("A").is_none());
        assert_eq!(state.env_var("B").as_deref(), Some("2"));
    }
}
