//! Roster files on disk.
//!
//! Each saved roster is one JSON file named `<name>.<extension>` in the
//! store's data directory, holding `[[next_id, live_count], [record, ...]]`.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::roster::{Roster, SavedRoster};

/// Default roster file extension.
pub const DEFAULT_EXTENSION: &str = "dpb";

/// A directory of saved rosters.
#[derive(Debug, Clone)]
pub struct RosterStore {
    dir: PathBuf,
    extension: String,
    pattern: Regex,
}

impl RosterStore {
    /// Create a store over `dir` for files with the given extension.
    ///
    /// The directory is created on the first save.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if the extension is empty or not
    /// alphanumeric.
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Result<Self> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::ConfigValidation {
                message: format!("invalid roster file extension: '{extension}'"),
            });
        }
        let pattern = Regex::new(&format!(r"(?i)^[^.].*\.{}$", regex::escape(&extension)))
            .map_err(|e| Error::ConfigValidation {
                message: format!("invalid roster file extension: {e}"),
            })?;
        Ok(Self {
            dir: dir.into(),
            extension,
            pattern,
        })
    }

    /// The data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The roster file extension, without the dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path of the file a roster called `name` is saved to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRosterName`] unless the name is letters only.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() || !name.chars().all(char::is_alphabetic) {
            return Err(Error::InvalidRosterName {
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(format!("{name}.{}", self.extension)))
    }

    /// File names of the saved rosters, sorted.
    ///
    /// A missing data directory simply has no rosters.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if self.pattern.is_match(name) {
                    files.push(name.to_string());
                }
            }
        }
        files.sort();
        debug!(count = files.len(), dir = %self.dir.display(), "listed roster files");
        Ok(files)
    }

    /// Save a roster under `name`, replacing any file of that name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NothingToSave`] for an empty roster,
    /// [`Error::InvalidRosterName`] for a bad name, or an I/O error.
    pub fn save(&self, name: &str, roster: &Roster) -> Result<PathBuf> {
        let saved = roster.snapshot()?;
        let path = self.path_for(name)?;

        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| Error::DirectoryCreate {
                path: self.dir.clone(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&saved)?;
        std::fs::write(&path, json)?;
        info!(
            path = %path.display(),
            records = saved.records().len(),
            "roster saved"
        );
        Ok(path)
    }

    /// Read and check a saved roster by file name.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// [`Error::MalformedRoster`] if it does not hold a valid roster.
    pub fn read(&self, file_name: &str) -> Result<SavedRoster> {
        let path = self.dir.join(file_name);
        let contents = std::fs::read_to_string(&path)?;
        let saved: SavedRoster = serde_json::from_str(&contents)
            .map_err(|e| Error::malformed(&path, e.to_string()))?;
        saved
            .check()
            .map_err(|message| Error::malformed(&path, message))?;
        debug!(path = %path.display(), "read roster file");
        Ok(saved)
    }

    /// Replace a roster's contents with a saved file.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`RosterStore::read`]; the roster is untouched
    /// on failure.
    pub fn load_into(&self, file_name: &str, roster: &mut Roster) -> Result<()> {
        let saved = self.read(file_name)?;
        roster.restore(saved, &self.dir.join(file_name))?;
        info!(file = file_name, records = roster.len(), "roster loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::CrewDraft;

    fn store() -> (tempfile::TempDir, RosterStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("rosters"), DEFAULT_EXTENSION).unwrap();
        (dir, store)
    }

    fn sample_roster() -> Roster {
        let mut roster = Roster::default();
        for (given, surname, hours, month) in [
            ("fred", "greg", "4567", "3"),
            ("anne", "coughlan", "2345", "7"),
            ("alexander", "rowan", "9999", "11"),
        ] {
            let draft = CrewDraft {
                position: Some("1".to_string()),
                base_month: Some(month.to_string()),
                ..CrewDraft::new(given, surname, hours)
            };
            roster.begin_add(&draft).unwrap().commit();
        }
        roster.begin_delete(2).unwrap().commit();
        roster
    }

    #[test]
    fn test_extension_validation() {
        assert!(RosterStore::new("/tmp", "").is_err());
        assert!(RosterStore::new("/tmp", "d.b").is_err());
        assert_eq!(RosterStore::new("/tmp", ".DPB").unwrap().extension(), "dpb");
    }

    #[test]
    fn test_path_for() {
        let store = RosterStore::new("/data", "dpb").unwrap();
        assert_eq!(
            store.path_for("fleet").unwrap(),
            PathBuf::from("/data/fleet.dpb")
        );
        assert!(store.path_for("fleet2").is_err());
        assert!(store.path_for("../etc").is_err());
        assert!(store.path_for("").is_err());
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let (_dir, store) = store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (_dir, store) = store();
        let roster = sample_roster();

        let path = store.save("fleet", &roster).unwrap();
        assert!(path.exists());

        let mut loaded = Roster::default();
        store.load_into("fleet.dpb", &mut loaded).unwrap();
        assert_eq!(loaded.records(), roster.records());
        assert_eq!(loaded.next_id(), roster.next_id());
        assert_eq!(loaded.live_count(), roster.live_count());
    }

    #[test]
    fn test_save_empty_roster_refused() {
        let (_dir, store) = store();
        let err = store.save("fleet", &Roster::default()).unwrap_err();
        assert!(matches!(err, Error::NothingToSave));
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_list_filters_by_extension() {
        let (_dir, store) = store();
        let roster = sample_roster();
        store.save("zulu", &roster).unwrap();
        store.save("alpha", &roster).unwrap();
        std::fs::write(store.dir().join("notes.txt"), "x").unwrap();
        std::fs::write(store.dir().join("UPPER.DPB"), "x").unwrap();
        std::fs::create_dir(store.dir().join("folder.dpb")).unwrap();

        assert_eq!(
            store.list().unwrap(),
            vec!["UPPER.DPB", "alpha.dpb", "zulu.dpb"]
        );
    }

    #[test]
    fn test_read_malformed_file() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.dir().join("broken.dpb"), "{\"not\": \"a roster\"}").unwrap();

        let mut roster = sample_roster();
        let before = roster.clone();
        let err = store.load_into("broken.dpb", &mut roster).unwrap_err();
        assert!(matches!(err, Error::MalformedRoster { .. }));
        assert!(err.is_recoverable());
        assert_eq!(roster, before);
    }

    #[test]
    fn test_read_rejects_bad_counters() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.dir()).unwrap();
        let json = r#"[[1, 3], [{"id": 1, "given_name": "Fred", "surname": "Greg", "total_hours": 4567}]]"#;
        std::fs::write(store.dir().join("counts.dpb"), json).unwrap();

        let err = store.read("counts.dpb").unwrap_err();
        assert!(err.to_string().contains("live count"));
    }

    #[test]
    fn test_read_accepts_records_without_optional_fields() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.dir()).unwrap();
        let json = r#"[[4, 1], [{"id": 4, "given_name": "Fred", "surname": "Greg", "total_hours": 4567}]]"#;
        std::fs::write(store.dir().join("lean.dpb"), json).unwrap();

        let saved = store.read("lean.dpb").unwrap();
        assert_eq!(saved.records()[0].id(), 4);
        assert!(saved.records()[0].position().is_err());
    }

    #[test]
    fn test_load_rejects_out_of_range_logged_hours() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.dir()).unwrap();
        let json = r#"[[1, 1], [{"id": 1, "given_name": "Fred", "surname": "Greg", "total_hours": 4567, "pic_hours": 4000000000, "sic_hours": 0}]]"#;
        std::fs::write(store.dir().join("hours.dpb"), json).unwrap();

        let mut roster = Roster::default();
        let err = store.load_into("hours.dpb", &mut roster).unwrap_err();
        assert!(matches!(err, Error::MalformedRoster { .. }));
        assert!(err.to_string().contains("pic_hours"));
        assert!(roster.is_empty());
    }

    #[test]
    fn test_load_rejects_blank_names() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.dir()).unwrap();
        let json = r#"[[1, 1], [{"id": 1, "given_name": "", "surname": "Greg", "total_hours": 4567}]]"#;
        std::fs::write(store.dir().join("blank.dpb"), json).unwrap();

        let err = store.read("blank.dpb").unwrap_err();
        assert!(err.to_string().contains("missing a name"));
    }

    #[test]
    fn test_read_missing_file() {
        let (_dir, store) = store();
        assert!(matches!(store.read("ghost.dpb"), Err(Error::Io(_))));
    }
}
