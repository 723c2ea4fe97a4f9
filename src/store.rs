use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::models::LeaderboardEntry;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HighScoreRecord {
    pub email: String,
    pub name: String,
    pub high_score: u32,
    pub updated_at: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSnapshot {
    leaderboard: HashMap<String, LeaderboardEntry>,
    users: HashMap<String, HighScoreRecord>,
}

/// The two score collections behind the HTTP surface, both keyed by email.
/// Writes optionally mirror to a JSON snapshot so restarts keep the board.
pub struct DocumentStore {
    leaderboard: RwLock<HashMap<String, LeaderboardEntry>>,
    users: RwLock<HashMap<String, HighScoreRecord>>,
    snapshot_path: Option<String>,
}

impl DocumentStore {
    pub fn new(snapshot_path: Option<&str>) -> Self {
        let snapshot = snapshot_path
            .and_then(|path| {
                let raw = std::fs::read_to_string(path).ok()?;
                match serde_json::from_str::<StoreSnapshot>(&raw) {
                    Ok(snapshot) => Some(snapshot),
                    Err(err) => {
                        warn!("failed to read score snapshot {}: {}", path, err);
                        None
                    }
                }
            })
            .unwrap_or_default();
        Self {
            leaderboard: RwLock::new(snapshot.leaderboard),
            users: RwLock::new(snapshot.users),
            snapshot_path: snapshot_path.map(str::to_string),
        }
    }

    /// Upserts both collections under the email key. Last write wins, even
    /// when the new score is lower; the client gates what it sends.
    pub async fn submit_score(&self, name: &str, email: &str, score: u32) -> anyhow::Result<()> {
        self.leaderboard.write().await.insert(
            email.to_string(),
            LeaderboardEntry {
                email: email.to_string(),
                name: name.to_string(),
                score,
            },
        );
        self.users.write().await.insert(
            email.to_string(),
            HighScoreRecord {
                email: email.to_string(),
                name: name.to_string(),
                high_score: score,
                updated_at: Utc::now().to_rfc3339(),
            },
        );
        self.persist().await
    }

    /// Unordered; ranking is the caller's job.
    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.leaderboard.read().await.values().cloned().collect()
    }

    pub async fn user_record(&self, email: &str) -> Option<HighScoreRecord> {
        self.users.read().await.get(email).cloned()
    }

    async fn persist(&self) -> anyhow::Result<()> {
        let Some(path) = self.snapshot_path.as_deref() else {
            return Ok(());
        };
        let snapshot = StoreSnapshot {
            leaderboard: self.leaderboard.read().await.clone(),
            users: self.users.read().await.clone(),
        };
        let serialized = serde_json::to_vec_pretty(&snapshot)?;
        if let Some(parent) = Path::new(path).parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serialized).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("codify-store-{}-{}.json", name, uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned()
    }

    #[tokio::test]
    async fn submit_upserts_both_collections() {
        let store = DocumentStore::new(None);
        store.submit_score("Ada", "ada@example.com", 12).await.unwrap();

        let board = store.leaderboard().await;
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, "Ada");
        assert_eq!(board[0].score, 12);

        let record = store.user_record("ada@example.com").await.unwrap();
        assert_eq!(record.high_score, 12);
        assert!(!record.updated_at.is_empty());
    }

    #[tokio::test]
    async fn resubmission_overwrites_even_with_a_lower_score() {
        let store = DocumentStore::new(None);
        store.submit_score("Ada", "ada@example.com", 12).await.unwrap();
        store.submit_score("Ada L", "ada@example.com", 3).await.unwrap();

        let board = store.leaderboard().await;
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].name, "Ada L");
        assert_eq!(board[0].score, 3);
        let record = store.user_record("ada@example.com").await.unwrap();
        assert_eq!(record.high_score, 3);
    }

    #[tokio::test]
    async fn distinct_emails_get_distinct_entries() {
        let store = DocumentStore::new(None);
        store.submit_score("Ada", "ada@example.com", 12).await.unwrap();
        store.submit_score("Grace", "grace@example.com", 9).await.unwrap();
        assert_eq!(store.leaderboard().await.len(), 2);
    }

    #[tokio::test]
    async fn snapshot_survives_a_restart() {
        let path = scratch_path("reload");
        {
            let store = DocumentStore::new(Some(&path));
            store.submit_score("Ada", "ada@example.com", 12).await.unwrap();
        }

        let reloaded = DocumentStore::new(Some(&path));
        let board = reloaded.leaderboard().await;
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].score, 12);
        let record = reloaded.user_record("ada@example.com").await.unwrap();
        assert_eq!(record.high_score, 12);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_snapshot_starts_empty() {
        let path = scratch_path("corrupt");
        tokio::fs::write(&path, b"{ nope").await.unwrap();
        let store = DocumentStore::new(Some(&path));
        assert!(store.leaderboard().await.is_empty());
        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn missing_email_has_no_record() {
        let store = DocumentStore::new(None);
        assert!(store.user_record("ghost@example.com").await.is_none());
    }
}
