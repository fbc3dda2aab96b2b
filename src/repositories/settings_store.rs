use crate::error::StoreResult;
use crate::models::Settings;
use crate::repositories::traits::{SettingsStore, SettingsTransform};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::Mutex;

fn read_snapshot(state: &RwLock<Settings>) -> Settings {
    match state.read() {
        Ok(settings) => settings.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn write_snapshot(state: &RwLock<Settings>, next: Settings) {
    match state.write() {
        Ok(mut settings) => *settings = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}

/// Settings store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    state: RwLock<Settings>,
    writer: Mutex<()>,
}

impl InMemorySettingsStore {
    pub fn new(initial: Settings) -> Self {
        Self {
            state: RwLock::new(initial),
            writer: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    fn current(&self) -> Settings {
        read_snapshot(&self.state)
    }

    async fn update(&self, transform: SettingsTransform) -> StoreResult<Settings> {
        let _guard = self.writer.lock().await;
        let next = transform(read_snapshot(&self.state));
        write_snapshot(&self.state, next.clone());
        Ok(next)
    }
}

/// Settings store persisted as a JSON file.
///
/// Updates are serialized by a writer lock held across read, transform and
/// write. The file is replaced by writing a sibling temp file and renaming
/// it over the target, so readers of the file never see a torn record.
#[derive(Debug)]
pub struct JsonSettingsStore {
    path: PathBuf,
    state: RwLock<Settings>,
    writer: Mutex<()>,
}

impl JsonSettingsStore {
    /// Open the store at `path`, starting from defaults if the file is absent.
    pub async fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let settings = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), "Settings loaded");

        Ok(Self {
            path,
            state: RwLock::new(settings),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, settings: &Settings) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self
            .path
            .with_extension(format!("json.{}.tmp", std::process::id()));
        let serialized = serde_json::to_vec_pretty(settings)?;
        tokio::fs::write(&temp_path, serialized).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    fn current(&self) -> Settings {
        read_snapshot(&self.state)
    }

    async fn update(&self, transform: SettingsTransform) -> StoreResult<Settings> {
        let _guard = self.writer.lock().await;
        let next = transform(read_snapshot(&self.state));
        self.persist(&next).await?;
        write_snapshot(&self.state, next.clone());
        Ok(next)
    }
}
