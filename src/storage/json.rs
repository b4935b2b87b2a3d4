// JSON file backend: the whole user set lives in memory and is mirrored to a
// single JSON object on disk (id -> user) after every mutation.

use super::{StorageError, StorageResult, UserStore};
use crate::models::User;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

type UserMap = HashMap<String, User>;

pub struct JsonFileStore {
    path: PathBuf,
    users: RwLock<UserMap>,
}

impl JsonFileStore {
    /// Opens the store backed by `path`.
    ///
    /// A missing file is created as `{}`. An unreadable or malformed file is
    /// not fatal: the store starts empty and the next successful mutation
    /// overwrites the file.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => {
                log::info!("📁 Creating empty users file at {}", path.display());
                if let Err(e) = tokio::fs::write(&path, b"{}").await {
                    log::warn!("⚠️  Could not create {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("⚠️  Could not stat {}: {}", path.display(), e),
        }

        let users = load_users(&path).await;
        log::info!("📁 Loaded {} users from {}", users.len(), path.display());

        Self {
            path,
            users: RwLock::new(users),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `apply` to a copy of the map, writes the copy to disk and only
    /// then makes it visible. The exclusive lock is held for the whole sequence.
    async fn mutate<F>(&self, apply: F) -> StorageResult<()>
    where
        F: FnOnce(&mut UserMap) -> StorageResult<()> + Send,
    {
        let mut users = self.users.write().await;
        let mut next = users.clone();
        apply(&mut next)?;
        self.persist(&next).await?;
        *users = next;
        Ok(())
    }

    /// Writes the map to a sibling temp file and renames it over the target.
    async fn persist(&self, users: &UserMap) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(users)?;
        let tmp_path = temp_path(&self.path);

        if let Err(e) = write_synced(&tmp_path, &data).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            log::error!("❌ Failed to write {}: {}", tmp_path.display(), e);
            return Err(e.into());
        }

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            log::error!("❌ Failed to replace {}: {}", self.path.display(), e);
            return Err(e.into());
        }

        Ok(())
    }
}

async fn load_users(path: &Path) -> UserMap {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) => {
            log::warn!("⚠️  Error reading {}, starting empty: {}", path.display(), e);
            return UserMap::new();
        }
    };

    match serde_json::from_slice::<UserMap>(&data) {
        // the map key is authoritative for the id
        Ok(users) => users
            .into_iter()
            .map(|(id, user)| {
                let user = user.with_id(id.clone());
                (id, user)
            })
            .collect(),
        Err(e) => {
            log::warn!("⚠️  Malformed JSON in {}, starting empty: {}", path.display(), e);
            UserMap::new()
        }
    }
}

async fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(data).await?;
    file.flush().await?;
    file.sync_all().await
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "users.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl UserStore for JsonFileStore {
    fn backend(&self) -> &'static str {
        "json"
    }

    async fn list(&self) -> StorageResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn get(&self, id: &str) -> StorageResult<User> {
        let users = self.users.read().await;
        users.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn create(&self, user: User) -> StorageResult<String> {
        let id = Uuid::new_v4().to_string();
        let record = user.with_id(id.clone());

        self.mutate(|users| {
            users.insert(record.id.clone(), record);
            Ok(())
        })
        .await?;

        log::debug!("Created user {} in {}", id, self.path.display());
        Ok(id)
    }

    async fn update(&self, id: &str, user: User) -> StorageResult<()> {
        self.mutate(|users| {
            let existing = users.get_mut(id).ok_or(StorageError::NotFound)?;
            existing.name = user.name;
            existing.email = user.email;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> StorageResult<()> {
        self.mutate(|users| {
            users.remove(id).map(|_| ()).ok_or(StorageError::NotFound)
        })
        .await
    }
}
