use std::path::PathBuf;

use tokio::sync::RwLock;
use tracing::warn;

use crate::models::UserProfile;

/// Holds the one signed-in profile between visits, the stand-in for asking
/// the user to sign in on every page load. At most one record lives here;
/// a new put replaces whatever was cached.
pub struct SessionCache {
    record: RwLock<Option<UserProfile>>,
    path: Option<PathBuf>,
}

impl SessionCache {
    pub fn in_memory() -> Self {
        Self {
            record: RwLock::new(None),
            path: None,
        }
    }

    /// An unreadable or corrupt backing file degrades to an empty cache.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<UserProfile>(&raw) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    warn!("failed to read cached profile {}: {}", path.display(), err);
                    None
                }
            },
            Err(_) => None,
        };
        Self {
            record: RwLock::new(record),
            path: Some(path),
        }
    }

    pub async fn get(&self) -> Option<UserProfile> {
        self.record.read().await.clone()
    }

    pub async fn put(&self, profile: UserProfile) -> anyhow::Result<()> {
        if let Some(path) = &self.path {
            let serialized = serde_json::to_vec_pretty(&profile)?;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, serialized).await?;
        }
        *self.record.write().await = Some(profile);
        Ok(())
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        *self.record.write().await = None;
        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}
