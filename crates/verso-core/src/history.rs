//! Groups and their version history.
//!
//! A group is a named collection of tracked files with a strictly linear,
//! append-only list of versions. Each version is an immutable snapshot
//! mapping file identifiers to object-store blobs. All groups live in one
//! structured file, `.verso/group_tracker`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{VersoError, VersoResult};
use crate::hash::{identify, Identifier, ObjectRef};
use crate::object::{read_file, write_file};

/// File name of the group tracker inside the control directory.
pub const GROUP_TRACKER_FILE: &str = "group_tracker";

/// Commit message of the version every new group starts with.
pub const INITIAL_MESSAGE: &str = "Initial Tracking";

/// A point-in-time snapshot of a group's files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Version {
    /// Random, never reused.
    pub id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// File identifier -> blob holding that file's content at commit time.
    pub files: BTreeMap<Identifier, ObjectRef>,
}

impl Version {
    /// Create a version stamped with a fresh id and the current time.
    pub fn new(message: &str, files: BTreeMap<Identifier, ObjectRef>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            files,
        }
    }
}

/// A group and its linear history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub versions: BTreeMap<String, Version>,
    /// Version ids, oldest first.
    pub version_order: Vec<String>,
    /// Always the last entry of `version_order`.
    pub current: String,
}

impl Group {
    /// A new group holding only the empty "Initial Tracking" version.
    pub fn new(name: &str) -> Self {
        let initial = Version::new(INITIAL_MESSAGE, BTreeMap::new());
        let current = initial.id.clone();
        Self {
            id: identify(name),
            name: name.to_string(),
            versions: BTreeMap::from([(current.clone(), initial)]),
            version_order: vec![current.clone()],
            current,
        }
    }

    /// The version `current` points at.
    pub fn current(&self) -> &Version {
        // Holds for every group built by `new`/`append` or accepted by `load`.
        &self.versions[&self.current]
    }

    pub fn version_at(&self, version_id: &str) -> VersoResult<&Version> {
        self.versions
            .get(version_id)
            .ok_or_else(|| VersoError::VersionNotFound(version_id.to_string()))
    }

    /// Append a version and move `current` to it.
    pub fn append(&mut self, version: Version) {
        assert!(
            !self.versions.contains_key(&version.id),
            "version id {} reused in group {}",
            version.id,
            self.name
        );
        self.current = version.id.clone();
        self.version_order.push(version.id.clone());
        self.versions.insert(version.id.clone(), version);
    }

    /// Versions oldest to newest.
    pub fn log(&self) -> impl Iterator<Item = &Version> + '_ {
        self.version_order.iter().map(|id| &self.versions[id])
    }

    fn check_invariants(&self) -> Result<(), String> {
        let ordered: BTreeSet<&String> = self.version_order.iter().collect();
        if ordered.len() != self.version_order.len() {
            return Err(format!("group {}: duplicate version ids", self.name));
        }
        if ordered.len() != self.versions.len() || !self.versions.keys().all(|k| ordered.contains(k)) {
            return Err(format!("group {}: version order does not match versions", self.name));
        }
        if self.version_order.last() != Some(&self.current) {
            return Err(format!("group {}: current is not the newest version", self.name));
        }
        if self.versions.iter().any(|(key, v)| *key != v.id) {
            return Err(format!("group {}: version keyed under the wrong id", self.name));
        }
        Ok(())
    }
}

/// All groups, keyed by group id.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupTracker {
    pub groups: BTreeMap<String, Group>,
}

impl GroupTracker {
    /// Load the group tracker, or return an empty one if the file is absent.
    ///
    /// A file that parses but breaks a history invariant is a parse failure.
    pub fn load(path: &Path, config: &Config) -> VersoResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = read_file(path, config)?;
        let tracker: GroupTracker = serde_json::from_slice(&data)?;
        for (key, group) in &tracker.groups {
            let keyed = if group.id != identify(&group.name) {
                Err(format!("group {}: id does not match its name", group.name))
            } else if *key != group.id {
                Err(format!("group {}: stored under the wrong key", group.name))
            } else {
                group.check_invariants()
            };
            keyed.map_err(|msg| VersoError::ParseFailure(serde_json::Error::custom(msg)))?;
        }
        tracing::debug!(groups = tracker.groups.len(), "loaded group tracker");
        Ok(tracker)
    }

    /// Save the tracker (atomic write, then compress in place).
    pub fn save(&self, path: &Path, config: &Config) -> VersoResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_file(path, json.as_bytes(), config)
    }

    /// Start a new group.
    pub fn init_group(&mut self, name: &str) -> VersoResult<&Group> {
        let id = identify(name);
        if self.groups.contains_key(&id) {
            return Err(VersoError::GroupAlreadyTracked(name.to_string()));
        }
        Ok(self.groups.entry(id).or_insert_with(|| Group::new(name)))
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> VersoResult<&Group> {
        self.groups
            .get(&identify(name))
            .ok_or_else(|| VersoError::GroupNotFound(name.to_string()))
    }

    /// Append a version to the named group.
    pub fn append(&mut self, name: &str, version: Version) -> VersoResult<()> {
        let group = self
            .groups
            .get_mut(&identify(name))
            .ok_or_else(|| VersoError::GroupNotFound(name.to_string()))?;
        group.append(version);
        Ok(())
    }

    /// Find a version by id across every group.
    pub fn find_version(&self, version_id: &str) -> VersoResult<(&Group, &Version)> {
        self.groups
            .values()
            .find_map(|g| g.versions.get(version_id).map(|v| (g, v)))
            .ok_or_else(|| VersoError::VersionNotFound(version_id.to_string()))
    }

    /// Every file identifier that appears in any version of any group.
    pub fn known_identifiers(&self) -> BTreeSet<Identifier> {
        self.groups
            .values()
            .flat_map(|g| g.versions.values())
            .flat_map(|v| v.files.keys().cloned())
            .collect()
    }
}
