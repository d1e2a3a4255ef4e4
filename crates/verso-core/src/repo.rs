//! Repository: the main entry point for verso operations.
//!
//! A Repository ties together the object store, the tracker registry, and
//! the group history into a unified interface. Every operation loads the
//! structured files it needs, works on owned values, and persists the result
//! before returning; nothing is cached between calls.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, CONFIG_FILE, CONTROL_DIR};
use crate::diff::FileDiff;
use crate::error::{VersoError, VersoResult};
use crate::fsutil::atomic_write;
use crate::hash::{identify_path, Identifier, ObjectRef};
use crate::history::{Group, GroupTracker, Version, GROUP_TRACKER_FILE};
use crate::object::{write_file, ObjectStore};
use crate::tracker::{relative_path, Registry, TRACKER_FILE};

/// Label for the on-disk side of a working-tree diff.
const WORKING_TREE: &str = "working tree";

/// Label for the committed side of a working-tree diff.
const LAST_COMMIT: &str = "last commit";

/// A verso repository.
pub struct Repository {
    /// Root of the working directory (where `.verso/` lives).
    root: PathBuf,
    /// Path to the `.verso/` directory.
    control_dir: PathBuf,
    /// Content-addressable object store.
    objects: ObjectStore,
    config: Config,
}

impl Repository {
    /// Does `root` contain a verso control directory?
    pub fn is_initialized(root: &Path) -> bool {
        root.join(CONTROL_DIR).is_dir()
    }

    /// Initialize a new verso repository in the given directory.
    ///
    /// Creates `.verso/objects/` and empty, compressed tracker and group
    /// tracker files.
    pub fn init(root: &Path) -> VersoResult<Self> {
        Self::init_with_config(root, None)
    }

    /// Initialize a repository, writing `config` to `.verso/config.toml` first.
    pub fn init_with_config(root: &Path, config: Option<&Config>) -> VersoResult<Self> {
        let control_dir = root.join(CONTROL_DIR);

        if control_dir.exists() {
            return Err(VersoError::RepoAlreadyInit);
        }

        fs::create_dir_all(control_dir.join("objects"))?;

        if let Some(config) = config {
            let text = toml::to_string(config).map_err(|e| VersoError::Config(e.to_string()))?;
            atomic_write(&control_dir.join(CONFIG_FILE), text.as_bytes())?;
        }
        let config = Config::load(&control_dir)?;

        write_file(&control_dir.join(TRACKER_FILE), b"{}", &config)?;
        write_file(&control_dir.join(GROUP_TRACKER_FILE), b"{}", &config)?;

        tracing::info!("initialized verso repository in {}", control_dir.display());
        Self::open(root)
    }

    /// Open an existing verso repository.
    pub fn open(root: &Path) -> VersoResult<Self> {
        if !Self::is_initialized(root) {
            return Err(VersoError::RepoNotFound);
        }

        let control_dir = root.join(CONTROL_DIR);
        let config = Config::load(&control_dir)?;
        let objects = ObjectStore::new(&control_dir.join("objects"), config.compression_level);

        Ok(Self {
            root: root.to_path_buf(),
            control_dir,
            objects,
            config,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    fn tracker_path(&self) -> PathBuf {
        self.control_dir.join(TRACKER_FILE)
    }

    fn group_tracker_path(&self) -> PathBuf {
        self.control_dir.join(GROUP_TRACKER_FILE)
    }

    fn load_groups(&self) -> VersoResult<GroupTracker> {
        GroupTracker::load(&self.group_tracker_path(), &self.config)
    }

    /// Resolve a caller path to (absolute path, root-relative path).
    fn resolve(&self, path: &Path) -> (PathBuf, String) {
        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let rel = relative_path(&self.root, &abs);
        (abs, rel)
    }

    // -------------------------------------------------------------------
    // Tracker registry
    // -------------------------------------------------------------------

    /// The tracker registry, rebuilt from a scan if its file is missing.
    ///
    /// A rebuild looks for every identifier mentioned in group history,
    /// replays that history to restore commit statistics, and persists the
    /// result so later calls read the file directly.
    pub fn tracked_files(&self) -> VersoResult<Registry> {
        let path = self.tracker_path();
        if path.exists() {
            return Registry::load(&path, &self.config);
        }

        let groups = self.load_groups()?;
        let known = groups.known_identifiers();
        let mut registry = Registry::scan(&self.root, &known, &self.config)?;
        replay_history(&mut registry, &groups);
        registry.save(&path, &self.config)?;

        tracing::info!(files = registry.len(), "rebuilt tracker registry");
        Ok(registry)
    }

    /// Insert or overwrite the path recorded for `id`.
    pub fn update_tracked_file(&self, id: &str, path: &str) -> VersoResult<()> {
        let mut registry = self.tracked_files()?;
        registry.upsert(id, path);
        registry.save(&self.tracker_path(), &self.config)
    }

    /// Start tracking the file at `path`, returning its identifier.
    pub fn track(&self, path: &Path) -> VersoResult<Identifier> {
        let (abs, rel) = self.resolve(path);
        let meta = fs::metadata(&abs)?;
        if !meta.is_file() {
            return Err(VersoError::FileNotTracked(rel));
        }
        let id = identify_path(&abs);
        self.update_tracked_file(&id, &rel)?;
        tracing::debug!(path = %rel, id = %id, "tracking file");
        Ok(id)
    }

    // -------------------------------------------------------------------
    // Groups
    // -------------------------------------------------------------------

    /// Create a group with its "Initial Tracking" version.
    pub fn group_init(&self, name: &str) -> VersoResult<Group> {
        let mut groups = self.load_groups()?;
        let group = groups.init_group(name)?.clone();
        groups.save(&self.group_tracker_path(), &self.config)?;
        tracing::info!(group = name, version = %group.current, "initialized group");
        Ok(group)
    }

    /// All groups, ordered by name.
    pub fn groups(&self) -> VersoResult<Vec<Group>> {
        let mut groups: Vec<Group> = self.load_groups()?.groups.into_values().collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    pub fn group(&self, name: &str) -> VersoResult<Group> {
        Ok(self.load_groups()?.group(name)?.clone())
    }

    /// A group's versions, oldest first.
    pub fn log(&self, name: &str) -> VersoResult<Vec<Version>> {
        let groups = self.load_groups()?;
        Ok(groups.group(name)?.log().cloned().collect())
    }

    pub fn version_at(&self, name: &str, version_id: &str) -> VersoResult<Version> {
        let groups = self.load_groups()?;
        Ok(groups.group(name)?.version_at(version_id)?.clone())
    }

    /// The version a group's current pointer refers to.
    pub fn current(&self, name: &str) -> VersoResult<Version> {
        let groups = self.load_groups()?;
        Ok(groups.group(name)?.current().clone())
    }

    // -------------------------------------------------------------------
    // Commit
    // -------------------------------------------------------------------

    /// Record a new version of `group` containing `paths`.
    ///
    /// Each file's current bytes go into the object store and its tracking
    /// record is created or moved to the given path. With no paths, every
    /// file the group has ever committed is snapshotted again from its
    /// recorded location.
    ///
    /// History is saved before the registry. If the registry save fails the
    /// version stays committed and [`VersoError::RegistryOutOfSync`] is
    /// returned.
    pub fn commit(&self, group: &str, message: &str, paths: &[PathBuf]) -> VersoResult<Version> {
        self.commit_with(group, message, paths, |registry| {
            registry.save(&self.tracker_path(), &self.config)
        })
    }

    /// [`commit`](Self::commit) with the final registry write supplied by
    /// the caller. Everything before it has already been persisted when
    /// `save_registry` runs.
    fn commit_with(
        &self,
        group: &str,
        message: &str,
        paths: &[PathBuf],
        save_registry: impl FnOnce(&Registry) -> VersoResult<()>,
    ) -> VersoResult<Version> {
        let mut groups = self.load_groups()?;
        let mut registry = self.tracked_files()?;

        let targets: Vec<(Identifier, PathBuf, String)> = if paths.is_empty() {
            let members = group_members(groups.group(group)?);
            members
                .into_iter()
                .map(|id| {
                    let record = registry
                        .get(&id)
                        .ok_or_else(|| VersoError::FileNotTracked(id.clone()))?;
                    let rel = record.path.clone();
                    Ok((id, self.root.join(&rel), rel))
                })
                .collect::<VersoResult<_>>()?
        } else {
            // Fail on an unknown group before touching the object store.
            groups.group(group)?;
            paths
                .iter()
                .map(|p| {
                    let (abs, rel) = self.resolve(p);
                    (identify_path(&abs), abs, rel)
                })
                .collect()
        };

        let mut staged: BTreeMap<Identifier, ObjectRef> = BTreeMap::new();
        for (id, abs, rel) in &targets {
            let content = fs::read(abs)?;
            let object = self.objects.put(&content)?;
            registry.upsert(id, rel);
            staged.insert(id.clone(), object);
        }

        let version = Version::new(message, staged.clone());
        groups.append(group, version.clone())?;
        groups.save(&self.group_tracker_path(), &self.config)?;

        for (id, object) in &staged {
            registry.record_commit(id, message, version.timestamp, object);
        }
        if let Err(e) = save_registry(&registry) {
            tracing::error!(
                group,
                version = %version.id,
                error = %e,
                "group history saved but tracker registry was not; re-run the commit or rebuild the registry"
            );
            return Err(VersoError::RegistryOutOfSync {
                version_id: version.id.clone(),
                source: Box::new(e),
            });
        }

        tracing::info!(group, version = %version.id, files = staged.len(), "committed");
        Ok(version)
    }

    // -------------------------------------------------------------------
    // Diff
    // -------------------------------------------------------------------

    /// Compare two snapshots of the file at `path`.
    ///
    /// With both version ids empty, the last committed content is compared
    /// against the file on disk. With both given, the file's snapshot in
    /// `from` is compared against its snapshot in `to`. Giving only one is
    /// an [`VersoError::ArgumentMismatch`].
    pub fn diff(&self, path: &Path, from: &str, to: &str) -> VersoResult<FileDiff> {
        if from.is_empty() != to.is_empty() {
            return Err(VersoError::ArgumentMismatch);
        }

        let (abs, rel) = self.resolve(path);
        let id = identify_path(&abs);
        let registry = self.tracked_files()?;
        let record = registry
            .get(&id)
            .ok_or_else(|| VersoError::FileNotTracked(rel.clone()))?;

        if from.is_empty() {
            let old = match &record.last_object {
                Some(object) => self.objects.get(object)?,
                None => Vec::new(),
            };
            let new = fs::read(&abs)?;
            return Ok(FileDiff::compute(&rel, LAST_COMMIT, WORKING_TREE, &old, &new));
        }

        let groups = self.load_groups()?;
        let old = self.snapshot(&groups, from, &id, &rel)?;
        let new = self.snapshot(&groups, to, &id, &rel)?;
        Ok(FileDiff::compute(&rel, from, to, &old, &new))
    }

    /// Bytes of file `id` as recorded in version `version_id`.
    fn snapshot(
        &self,
        groups: &GroupTracker,
        version_id: &str,
        id: &str,
        rel: &str,
    ) -> VersoResult<Vec<u8>> {
        let (_, version) = groups.find_version(version_id)?;
        let object = version
            .files
            .get(id)
            .ok_or_else(|| VersoError::FileNotTracked(rel.to_string()))?;
        self.objects.get(object)
    }
}

/// Every file identifier a group has committed at least once.
fn group_members(group: &Group) -> Vec<Identifier> {
    let mut ids: Vec<Identifier> = group
        .log()
        .flat_map(|v| v.files.keys().cloned())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Re-derive commit statistics for `registry` from group history.
///
/// Versions from all groups are applied in timestamp order, so the last
/// commit message and object are those of the newest version.
fn replay_history(registry: &mut Registry, groups: &GroupTracker) {
    let mut versions: Vec<&Version> = groups
        .groups
        .values()
        .flat_map(|g| g.log())
        .filter(|v| !v.files.is_empty())
        .collect();
    versions.sort_by_key(|v| v.timestamp);

    for version in versions {
        for (id, object) in &version.files {
            registry.record_commit(id, &version.message, version.timestamp, object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::hash::identify;
    use crate::history::INITIAL_MESSAGE;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        PathBuf::from(rel)
    }

    #[test]
    fn test_init_creates_structure() {
        let dir = tempdir().unwrap();
        Repository::init(dir.path()).unwrap();

        assert!(dir.path().join(".verso").is_dir());
        assert!(dir.path().join(".verso/objects").is_dir());
        assert!(dir.path().join(".verso/tracker").is_file());
        assert!(dir.path().join(".verso/group_tracker").is_file());
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let result = Repository::init(dir.path());
        assert!(matches!(result, Err(VersoError::RepoAlreadyInit)));
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let dir = tempdir().unwrap();
        let result = Repository::open(dir.path());
        assert!(matches!(result, Err(VersoError::RepoNotFound)));
        assert!(!Repository::is_initialized(dir.path()));
    }

    #[test]
    fn test_init_with_config_is_persisted() {
        let dir = tempdir().unwrap();
        let config = Config {
            diff_context_lines: 1,
            ..Config::default()
        };
        Repository::init_with_config(dir.path(), Some(&config)).unwrap();

        let repo = Repository::open(dir.path()).unwrap();
        assert_eq!(repo.config(), &config);
    }

    #[test]
    fn test_group_init() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();

        let group = repo.group_init("docs").unwrap();
        assert_eq!(group.name, "docs");
        assert_eq!(group.id, identify("docs"));
        assert_eq!(group.version_order.len(), 1);
        assert_eq!(repo.current("docs").unwrap().message, INITIAL_MESSAGE);

        let err = repo.group_init("docs").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GroupAlreadyTracked);
    }

    #[test]
    fn test_track_records_relative_path() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let rel = write(dir.path(), "notes/todo.txt", "a\n");

        let id = repo.track(&rel).unwrap();
        assert_eq!(id, identify("todo.txt"));
        let registry = repo.tracked_files().unwrap();
        assert_eq!(registry.get(&id).unwrap().path, "notes/todo.txt");
        assert_eq!(registry.get(&id).unwrap().commit_count, 0);
    }

    #[test]
    fn test_track_missing_file_is_io() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let err = repo.track(Path::new("ghost.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
    }

    #[test]
    fn test_commit_updates_history_and_stats() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.group_init("docs").unwrap();
        let a = write(dir.path(), "a.txt", "one\n");

        let version = repo.commit("docs", "first", &[a.clone()]).unwrap();

        let group = repo.group("docs").unwrap();
        assert_eq!(group.current, version.id);
        assert_eq!(group.version_order.len(), 2);
        assert_eq!(version.files.len(), 1);

        let record = repo.tracked_files().unwrap().get(&identify("a.txt")).cloned().unwrap();
        assert_eq!(record.commit_count, 1);
        assert_eq!(record.last_commit_message.as_deref(), Some("first"));
        assert_eq!(record.last_commit_timestamp, Some(version.timestamp));
        assert_eq!(record.last_object.as_ref(), version.files.get(&identify("a.txt")));
    }

    #[test]
    fn test_commit_unknown_group() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let a = write(dir.path(), "a.txt", "one\n");
        let err = repo.commit("ghost", "msg", &[a]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GroupNotFound);
    }

    #[test]
    fn test_commit_without_paths_resnapshots_members() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.group_init("docs").unwrap();
        let a = write(dir.path(), "a.txt", "one\n");
        let b = write(dir.path(), "sub/b.txt", "two\n");
        repo.commit("docs", "first", &[a, b]).unwrap();

        write(dir.path(), "a.txt", "one changed\n");
        let second = repo.commit("docs", "again", &[]).unwrap();
        assert_eq!(second.files.len(), 2);

        let registry = repo.tracked_files().unwrap();
        assert_eq!(registry.get(&identify("b.txt")).unwrap().commit_count, 2);
    }

    #[test]
    fn test_commit_follows_moved_file() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.group_init("docs").unwrap();
        let old = write(dir.path(), "a.txt", "one\n");
        repo.commit("docs", "first", &[old]).unwrap();

        fs::create_dir_all(dir.path().join("moved")).unwrap();
        fs::rename(dir.path().join("a.txt"), dir.path().join("moved/a.txt")).unwrap();
        repo.commit("docs", "moved", &[PathBuf::from("moved/a.txt")]).unwrap();

        let record = repo.tracked_files().unwrap().get(&identify("a.txt")).cloned().unwrap();
        assert_eq!(record.path, "moved/a.txt");
        assert_eq!(record.commit_count, 2);
    }

    #[test]
    fn test_working_tree_diff() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.group_init("docs").unwrap();
        let a = write(dir.path(), "a.txt", "keep\nold\n");
        repo.commit("docs", "first", &[a.clone()]).unwrap();
        write(dir.path(), "a.txt", "keep\nnew\n");

        let diff = repo.diff(&a, "", "").unwrap();
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
        assert_eq!(diff.new_label, "working tree");
    }

    #[test]
    fn test_working_tree_diff_before_first_commit() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let a = write(dir.path(), "a.txt", "x\ny\n");
        repo.track(&a).unwrap();

        let diff = repo.diff(&a, "", "").unwrap();
        assert_eq!(diff.additions(), 2);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn test_version_diff() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.group_init("docs").unwrap();
        let a = write(dir.path(), "a.txt", "one\n");
        let v1 = repo.commit("docs", "v1", &[a.clone()]).unwrap();
        write(dir.path(), "a.txt", "one\ntwo\n");
        let v2 = repo.commit("docs", "v2", &[a.clone()]).unwrap();

        let diff = repo.diff(&a, &v1.id, &v2.id).unwrap();
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.old_label, v1.id);

        let initial = repo.group("docs").unwrap().version_order[0].clone();
        let err = repo.diff(&a, &initial, &v2.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotTracked);

        let err = repo.diff(&a, "no-such-version", &v2.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VersionNotFound);
    }

    #[test]
    fn test_diff_argument_mismatch() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let a = write(dir.path(), "a.txt", "x\n");

        for (from, to) in [("", "1"), ("1", "")] {
            let err = repo.diff(&a, from, to).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentMismatch);
        }
    }

    #[test]
    fn test_diff_untracked_file() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let a = write(dir.path(), "untracked.txt", "x\n");

        let err = repo.diff(&a, "", "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotTracked);
    }

    #[test]
    fn test_registry_rebuilt_from_history() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.group_init("docs").unwrap();
        let a = write(dir.path(), "deep/a.txt", "1\n");
        write(dir.path(), "stray.txt", "not tracked\n");
        repo.commit("docs", "one", &[a.clone()]).unwrap();
        write(dir.path(), "deep/a.txt", "2\n");
        let last = repo.commit("docs", "two", &[a]).unwrap();

        fs::remove_file(dir.path().join(".verso/tracker")).unwrap();
        let rebuilt = repo.tracked_files().unwrap();

        assert_eq!(rebuilt.len(), 1);
        let record = rebuilt.get(&identify("a.txt")).unwrap();
        assert_eq!(record.path, "deep/a.txt");
        assert_eq!(record.commit_count, 2);
        assert_eq!(record.last_commit_message.as_deref(), Some("two"));
        assert_eq!(record.last_object.as_ref(), last.files.get(&identify("a.txt")));
        assert!(dir.path().join(".verso/tracker").exists());
    }

    #[test]
    fn test_groups_sorted_by_name() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        for name in ["zeta", "alpha", "mid"] {
            repo.group_init(name).unwrap();
        }
        let names: Vec<_> = repo.groups().unwrap().into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_log_and_version_at() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.group_init("docs").unwrap();
        let a = write(dir.path(), "a.txt", "1\n");
        let v = repo.commit("docs", "one", &[a]).unwrap();

        let log = repo.log("docs").unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].id, v.id);
        assert_eq!(repo.version_at("docs", &v.id).unwrap(), v);
        assert_eq!(
            repo.version_at("docs", "missing").unwrap_err().kind(),
            ErrorKind::VersionNotFound
        );
    }

    #[test]
    fn test_failed_registry_write_leaves_version_committed() {
        let dir = tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.group_init("docs").unwrap();
        let a = write(dir.path(), "a.txt", "1\n");

        let err = repo
            .commit_with("docs", "one", &[a], |_| {
                Err(VersoError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )))
            })
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RegistryOutOfSync);
        let VersoError::RegistryOutOfSync { version_id, source } = err else {
            unreachable!();
        };
        assert_eq!(source.kind(), ErrorKind::IoFailure);

        // History has the version; the registry on disk never saw it.
        let log = repo.log("docs").unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[1].id, version_id);
        assert!(repo.tracked_files().unwrap().get(&identify("a.txt")).is_none());

        // Rebuilding from history converges.
        fs::remove_file(dir.path().join(".verso/tracker")).unwrap();
        let rebuilt = repo.tracked_files().unwrap();
        let record = rebuilt.get(&identify("a.txt")).unwrap();
        assert_eq!(record.path, "a.txt");
        assert_eq!(record.commit_count, 1);
        assert_eq!(record.last_commit_message.as_deref(), Some("one"));
        assert_eq!(record.last_object.as_ref(), log[1].files.get(&identify("a.txt")));
    }
}
