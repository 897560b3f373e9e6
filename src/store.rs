//! Whole-file JSON persistence for the bot's small state maps.
//!
//! Each store keeps its map in memory behind an async mutex. Every mutation
//! runs against a copy, writes it to `<file>.tmp`, renames that over the real
//! file and only then replaces the in-memory value, so a failed write leaves
//! both the file and the memory untouched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;

pub struct JsonStore<T> {
    path: PathBuf,
    state: Mutex<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone + Send,
{
    /// Load the store from `path`; a missing or blank file yields an empty store
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => T::default(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet, starting empty", path.display());
                T::default()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    /// Copy of the current contents
    pub async fn snapshot(&self) -> T {
        self.state.lock().await.clone()
    }

    /// Read from the current contents without copying them
    pub async fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.state.lock().await;
        f(&*guard)
    }

    /// Apply `f` and persist the result; mutations are serialized per store
    pub async fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, StoreError> {
        let mut guard = self.state.lock().await;
        let mut next = guard.clone();
        let result = f(&mut next);
        write_atomic(&self.path, &next).await?;
        *guard = next;
        Ok(result)
    }
}

async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value)?;
    let io_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| StoreError::Io { path, source }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(io_error(parent))?;
    }

    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, &bytes).await.map_err(io_error(&tmp))?;
    tokio::fs::rename(&tmp, path).await.map_err(io_error(path))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
