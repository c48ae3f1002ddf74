use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use redis::Client as RedisClient;
use shared::shared_wheel_game::{LeaderboardEntry, SpinRecord};
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::Error;

const LEADERBOARD_KEY: &str = "wheel_rare_leaderboard";

fn history_key(player_id: &str) -> String {
    format!("wheel_history:{}", player_id)
}

/// Where spin records live. Every read returns records most recent first.
#[derive(Clone)]
pub enum HistoryStore {
    Memory(MemoryHistoryStore),
    Redis(RedisHistoryStore),
}

impl HistoryStore {
    pub fn memory(limit: usize) -> Self {
        HistoryStore::Memory(MemoryHistoryStore::new(limit))
    }

    pub fn redis(client: RedisClient, limit: usize) -> Self {
        HistoryStore::Redis(RedisHistoryStore { client, limit })
    }

    pub async fn record(&self, record: &SpinRecord) -> Result<(), Error> {
        match self {
            HistoryStore::Memory(store) => {
                store.record(record).await;
                Ok(())
            }
            HistoryStore::Redis(store) => store.record(record).await,
        }
    }

    pub async fn recent(&self, player_id: &str, limit: usize) -> Result<Vec<SpinRecord>, Error> {
        match self {
            HistoryStore::Memory(store) => Ok(store.recent(player_id, limit).await),
            HistoryStore::Redis(store) => store.recent(player_id, limit).await,
        }
    }

    /// Drops a player's history, which also ends their cooldown.
    pub async fn clear(&self, player_id: &str) -> Result<(), Error> {
        match self {
            HistoryStore::Memory(store) => {
                store.clear(player_id).await;
                Ok(())
            }
            HistoryStore::Redis(store) => store.clear(player_id).await,
        }
    }

    pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, Error> {
        match self {
            HistoryStore::Memory(store) => Ok(store.leaderboard(limit).await),
            HistoryStore::Redis(store) => store.leaderboard(limit).await,
        }
    }
}

#[derive(Default)]
struct MemoryInner {
    history: HashMap<String, VecDeque<SpinRecord>>,
    rare_wins: HashMap<String, u64>,
}

#[derive(Clone)]
pub struct MemoryHistoryStore {
    inner: Arc<Mutex<MemoryInner>>,
    limit: usize,
}

impl MemoryHistoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner::default())),
            limit: limit.max(1),
        }
    }

    async fn record(&self, record: &SpinRecord) {
        let mut inner = self.inner.lock().await;
        let history = inner.history.entry(record.player_id.clone()).or_default();
        history.push_front(record.clone());
        history.truncate(self.limit);
        if record.is_rare {
            *inner.rare_wins.entry(record.player_id.clone()).or_insert(0) += 1;
        }
    }

    async fn recent(&self, player_id: &str, limit: usize) -> Vec<SpinRecord> {
        let inner = self.inner.lock().await;
        inner
            .history
            .get(player_id)
            .map(|history| history.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    async fn clear(&self, player_id: &str) {
        self.inner.lock().await.history.remove(player_id);
    }

    async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let inner = self.inner.lock().await;
        let mut entries: Vec<LeaderboardEntry> = inner
            .rare_wins
            .iter()
            .map(|(player_id, rare_wins)| LeaderboardEntry {
                player_id: player_id.clone(),
                rare_wins: *rare_wins,
            })
            .collect();
        entries.sort_by(|a, b| b.rare_wins.cmp(&a.rare_wins).then_with(|| a.player_id.cmp(&b.player_id)));
        entries.truncate(limit);
        entries
    }
}

/// One list per player, newest pushed to the head, so `LRANGE 0 n` is already
/// most recent first.
#[derive(Clone)]
pub struct RedisHistoryStore {
    client: RedisClient,
    limit: usize,
}

impl RedisHistoryStore {
    async fn record(&self, record: &SpinRecord) -> Result<(), Error> {
        let mut conn = self.client.get_async_connection().await?;
        let key = history_key(&record.player_id);
        let payload = serde_json::to_string(record)?;

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("LPUSH").arg(&key).arg(payload).ignore()
            .cmd("LTRIM").arg(&key).arg(0).arg(self.limit as isize - 1).ignore();
        if record.is_rare {
            pipe.cmd("ZINCRBY").arg(LEADERBOARD_KEY).arg(1).arg(&record.player_id).ignore();
        }
        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn recent(&self, player_id: &str, limit: usize) -> Result<Vec<SpinRecord>, Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.client.get_async_connection().await?;
        let raw: Vec<String> = redis::cmd("LRANGE")
            .arg(history_key(player_id))
            .arg(0)
            .arg(limit as isize - 1)
            .query_async(&mut conn)
            .await?;

        Ok(raw
            .iter()
            .filter_map(|item| match serde_json::from_str::<SpinRecord>(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed spin record for {}: {}", player_id, e);
                    None
                }
            })
            .collect())
    }

    async fn clear(&self, player_id: &str) -> Result<(), Error> {
        let mut conn = self.client.get_async_connection().await?;
        let _: () = redis::cmd("DEL")
            .arg(history_key(player_id))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.client.get_async_connection().await?;
        let rows: Vec<(String, f64)> = redis::cmd("ZREVRANGE")
            .arg(LEADERBOARD_KEY)
            .arg(0)
            .arg(limit as isize - 1)
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(player_id, score)| LeaderboardEntry {
                player_id,
                rare_wins: score.max(0.0) as u64,
            })
            .collect())
    }
}
