//! Bounded per-user conversation history.
//!
//! Each user keeps at most `max_turns` turns (oldest dropped first). At most
//! `max_users` users are tracked; adding one more evicts the user whose
//! history was touched least recently.

use std::collections::{HashMap, VecDeque};

use serde::Deserialize;
use tokio::sync::Mutex;

use ap_protocol::{ChatRole, Turn};

/// History limits.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    #[serde(default = "default_max_users")]
    pub max_users: usize,
}

fn default_max_turns() -> usize {
    10
}
fn default_max_users() -> usize {
    1000
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            max_users: default_max_users(),
        }
    }
}

struct UserHistory {
    turns: VecDeque<Turn>,
    last_used: u64,
}

#[derive(Default)]
struct Inner {
    users: HashMap<i64, UserHistory>,
    /// Monotonic access counter used as the LRU clock.
    tick: u64,
}

impl Inner {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Per-user turn store shared by all in-flight messages.
pub struct ConversationStore {
    inner: Mutex<Inner>,
    max_turns: usize,
    max_users: usize,
}

impl ConversationStore {
    pub fn new(config: &HistoryConfig) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            max_turns: config.max_turns.max(1),
            max_users: config.max_users.max(1),
        }
    }

    /// The user's turns, oldest first. Marks the user as recently used.
    pub async fn history(&self, user_id: i64) -> Vec<Turn> {
        let mut inner = self.inner.lock().await;
        let tick = inner.next_tick();
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                user.last_used = tick;
                user.turns.iter().cloned().collect()
            }
            None => Vec::new(),
        }
    }

    /// Append a turn, trimming the user's history and evicting the least
    /// recently used user when a new one pushes the store over capacity.
    pub async fn append(&self, user_id: i64, turn: Turn) {
        let mut inner = self.inner.lock().await;
        let tick = inner.next_tick();

        if !inner.users.contains_key(&user_id) && inner.users.len() >= self.max_users {
            let oldest = inner
                .users
                .iter()
                .min_by_key(|(_, u)| u.last_used)
                .map(|(id, _)| *id);
            if let Some(evicted) = oldest {
                inner.users.remove(&evicted);
                tracing::debug!(user_id = evicted, "history evicted");
            }
        }

        let user = inner.users.entry(user_id).or_insert_with(|| UserHistory {
            turns: VecDeque::with_capacity(self.max_turns),
            last_used: tick,
        });
        user.last_used = tick;
        user.turns.push_back(turn);
        while user.turns.len() > self.max_turns {
            user.turns.pop_front();
        }
    }

    /// The user's own messages still in history, oldest first.
    pub async fn user_queries(&self, user_id: i64) -> Vec<String> {
        self.history(user_id)
            .await
            .into_iter()
            .filter(|t| t.role == ChatRole::User)
            .map(|t| t.content)
            .collect()
    }

    /// Number of users currently tracked.
    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(&HistoryConfig::default())
    }
}
