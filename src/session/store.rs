use crate::project::ProjectFiles;
use crate::session::agents::{default_agents, Agent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const PROJECT_FILES_KEY: &str = "codewrap_project_files";
pub const AGENTS_KEY: &str = "codewrap_agents";

/// Outcome of reading one entry. `warning` is set when a corrupt entry was
/// discarded or could not be read.
#[derive(Debug)]
pub struct Loaded<T> {
    pub value: T,
    pub restored: bool,
    pub warning: Option<String>,
}

/// Directory-backed key-value store: one JSON document per key.
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

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn write_entry<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let final_path = self.entry_path(key);
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;

        fs::write(&tmp_path, bytes)?;
        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path)?;
                    fs::rename(&tmp_path, &final_path)?;
                    Ok(())
                } else {
                    Err(rename_err)
                }
            }
        }
    }

    fn read_entry<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, String> {
        let path = self.entry_path(key);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(format!("failed to read {}: {err}", path.display())),
        };

        match serde_json::from_slice(&data) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                let message = format!("discarded corrupt {}: {err}", path.display());
                if let Err(remove_err) = fs::remove_file(&path) {
                    tracing::warn!(path = %path.display(), %remove_err, "failed to remove corrupt entry");
                }
                Err(message)
            }
        }
    }

    fn remove_entry(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    pub fn load_project(&self) -> Loaded<ProjectFiles> {
        match self.read_entry::<Vec<(String, String)>>(PROJECT_FILES_KEY) {
            Ok(Some(pairs)) if !pairs.is_empty() => Loaded {
                value: ProjectFiles::from_pairs(pairs),
                restored: true,
                warning: None,
            },
            Ok(_) => Loaded {
                value: ProjectFiles::new(),
                restored: false,
                warning: None,
            },
            Err(warning) => Loaded {
                value: ProjectFiles::new(),
                restored: false,
                warning: Some(warning),
            },
        }
    }

    pub fn save_project(&self, files: &ProjectFiles) -> io::Result<()> {
        self.write_entry(PROJECT_FILES_KEY, &files.to_pairs())?;
        tracing::info!(files = files.len(), "project saved");
        Ok(())
    }

    pub fn clear_project(&self) -> io::Result<()> {
        self.remove_entry(PROJECT_FILES_KEY)
    }

    pub fn load_agents(&self) -> Loaded<Vec<Agent>> {
        match self.read_entry::<Vec<Agent>>(AGENTS_KEY) {
            Ok(Some(agents)) => Loaded {
                value: agents,
                restored: true,
                warning: None,
            },
            Ok(None) => Loaded {
                value: default_agents(),
                restored: false,
                warning: None,
            },
            Err(warning) => Loaded {
                value: default_agents(),
                restored: false,
                warning: Some(warning),
            },
        }
    }

    pub fn save_agents(&self, agents: &[Agent]) -> io::Result<()> {
        self.write_entry(AGENTS_KEY, agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let store = Store::new(dir.path().join("data"));
        (dir, store)
    }

    #[test]
    fn missing_entries_fall_back_to_defaults() {
        let (_dir, store) = store();
        let project = store.load_project();
        assert!(project.value.is_empty());
        assert!(!project.restored);
        assert!(project.warning.is_none());

        let agents = store.load_agents();
        assert_eq!(agents.value, default_agents());
        assert!(agents.warning.is_none());
    }

    #[test]
    fn project_round_trips_as_ordered_pairs() {
        let (_dir, store) = store();
        let mut files = ProjectFiles::new();
        files.insert("index.html".to_string(), "<p>x</p>".to_string());
        files.insert("app.js".to_string(), "go()".to_string());
        store.save_project(&files).expect("project should save");

        let raw = fs::read_to_string(store.dir().join("codewrap_project_files.json"))
            .expect("entry should exist");
        let pairs: Vec<(String, String)> =
            serde_json::from_str(&raw).expect("entry should be a pair list");
        assert_eq!(pairs[0].0, "index.html");

        let loaded = store.load_project();
        assert!(loaded.restored);
        assert_eq!(loaded.value, files);
    }

    #[test]
    fn corrupt_project_entry_is_deleted() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).expect("store dir should be created");
        let path = store.dir().join("codewrap_project_files.json");
        fs::write(&path, "{not json").expect("fixture should write");

        let loaded = store.load_project();
        assert!(loaded.value.is_empty());
        assert!(loaded
            .warning
            .expect("corrupt entry should warn")
            .contains("discarded corrupt"));
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_agents_entry_uses_defaults() {
        let (_dir, store) = store();
        fs::create_dir_all(store.dir()).expect("store dir should be created");
        fs::write(store.dir().join("codewrap_agents.json"), "[{\"name\":1}]")
            .expect("fixture should write");

        let loaded = store.load_agents();
        assert_eq!(loaded.value, default_agents());
        assert!(loaded.warning.is_some());
    }

    #[test]
    fn empty_saved_project_is_not_reported_as_restored() {
        let (_dir, store) = store();
        store
            .save_project(&ProjectFiles::new())
            .expect("empty project should save");
        assert!(!store.load_project().restored);
    }

    #[test]
    fn clear_project_removes_entry_and_tolerates_absence() {
        let (_dir, store) = store();
        store.clear_project().expect("clearing absent entry should succeed");
        let mut files = ProjectFiles::new();
        files.insert("a.css".to_string(), "p{}".to_string());
        store.save_project(&files).expect("project should save");
        store.clear_project().expect("entry should be removed");
        assert!(store.load_project().value.is_empty());
    }

    #[test]
    fn agents_round_trip() {
        let (_dir, store) = store();
        let mut agents = default_agents();
        agents.truncate(2);
        store.save_agents(&agents).expect("agents should save");
        let loaded = store.load_agents();
        assert!(loaded.restored);
        assert_eq!(loaded.value, agents);
    }
}
