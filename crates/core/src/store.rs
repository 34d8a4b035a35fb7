//! Flat-file persistence. Every save rewrites the whole document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::fs;

use crate::{
    alerts::AlertMatrix,
    error::{ChemError, Result},
    orchestrator::OrchestratorEntry,
    types::{Event, Todo},
};

pub const EVENTS_FILE: &str = "events.json";
pub const TODOS_FILE: &str = "todos.json";
pub const SESSION_FILE: &str = "session.json";

/// State that has no file of its own in the data model: the alert list and
/// the orchestrator decision log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub alerts: AlertMatrix,
    #[serde(default)]
    pub orchestrator_log: Vec<OrchestratorEntry>,
}

/// Default data directory, under the platform data dir.
pub fn get_root_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("chemecare"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn events_path(&self) -> PathBuf {
        self.dir.join(EVENTS_FILE)
    }

    pub fn todos_path(&self) -> PathBuf {
        self.dir.join(TODOS_FILE)
    }

    pub fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    pub async fn load_events(&self) -> Result<Vec<Event>> {
        load_json(&self.events_path()).await
    }

    pub async fn save_events(&self, events: &[Event]) -> Result<()> {
        save_json(&self.dir, &self.events_path(), &events).await
    }

    pub async fn load_todos(&self) -> Result<Vec<Todo>> {
        load_json(&self.todos_path()).await
    }

    pub async fn save_todos(&self, todos: &[Todo]) -> Result<()> {
        save_json(&self.dir, &self.todos_path(), &todos).await
    }

    pub async fn load_session(&self) -> Result<SessionState> {
        load_json(&self.session_path()).await
    }

    pub async fn save_session(&self, session: &SessionState) -> Result<()> {
        save_json(&self.dir, &self.session_path(), session).await
    }
}

async fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let json_content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no data file yet, starting empty");
            return Ok(T::default());
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&json_content).map_err(|source| ChemError::CorruptFile {
        path: path.to_path_buf(),
        source,
    })
}

async fn save_json<T: Serialize + ?Sized>(dir: &Path, path: &Path, value: &T) -> Result<()> {
    fs::create_dir_all(dir).await?;
    let pretty_json = serde_json::to_string_pretty(value)?;
    fs::write(path, &pretty_json).await?;
    tracing::debug!(path = %path.display(), bytes = pretty_json.len(), "data file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;

    #[tokio::test]
    async fn missing_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        assert!(store.load_events().await.unwrap().is_empty());
        assert!(store.load_todos().await.unwrap().is_empty());
        assert_eq!(store.load_session().await.unwrap(), SessionState::default());
    }

    #[tokio::test]
    async fn events_file_is_a_plain_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("nested"));
        let event = Event::new(EventKind::RegulatoryUpdate, "new EPA rule").unwrap();
        store.save_events(std::slice::from_ref(&event)).await.unwrap();

        let raw = std::fs::read_to_string(store.events_path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["details"], "new EPA rule");
        assert!(raw.contains("\n  {"), "expected two-space indentation");
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        std::fs::write(store.todos_path(), "[{not json").unwrap();

        match store.load_todos().await {
            Err(ChemError::CorruptFile { path, .. }) => assert_eq!(path, store.todos_path()),
            other => panic!("expected CorruptFile, got {other:?}"),
        }
    }
}
