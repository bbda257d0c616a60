//! CSRF state tracking for the QQ OAuth flow.
//!
//! The init endpoint issues an opaque state token; the callback must echo
//! it back exactly once. States expire after ten minutes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::Mutex;

const STATE_TTL: Duration = Duration::from_secs(600);

/// Outstanding OAuth states, keyed by the random token.
pub struct QqStates {
    states: Mutex<HashMap<String, Instant>>,
}

impl QqStates {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a new state token valid for ten minutes.
    pub async fn issue(&self) -> String {
        let state: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let mut states = self.states.lock().await;
        states.insert(state.clone(), Instant::now() + STATE_TTL);
        state
    }

    /// Consumes a state token. Returns false for unknown or expired states.
    pub async fn consume(&self, state: &str) -> bool {
        let mut states = self.states.lock().await;
        match states.remove(state) {
            Some(expires_at) => Instant::now() < expires_at,
            None => false,
        }
    }

    /// Drops expired states. Called from the periodic cleanup task.
    pub async fn cleanup(&self) -> usize {
        let mut states = self.states.lock().await;
        let now = Instant::now();
        let before = states.len();
        states.retain(|_, expires_at| *expires_at > now);
        before - states.len()
    }
}

impl Default for QqStates {
    fn default() -> Self {
        Self::new()
    }
}
