// crates/goldentest-fixture/src/store.rs
// ============================================================================
// Module: Fixture Stores
// Description: File-backed and in-memory fixture stores keyed by filename.
// Purpose: Read and replace golden fixture bytes under a fixed base directory.
// Dependencies: cap-primitives, cap-std, tracing, std
// ============================================================================

//! ## Overview
//! [`DirFixtureStore`] maps a fixture name to a file under its base directory.
//! Directories and files are opened through capability handles without
//! following symlinks, and writes land through a temporary sibling that is
//! atomically renamed over the target, so a fixture is always either the old
//! content or the new content. New fixture files are created owner-only
//! (`0600`) on unix.
//!
//! [`InMemoryFixtureStore`] implements the same contract over a shared map
//! for tests that should not touch the filesystem.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use cap_primitives::fs::FollowSymlinks;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use cap_std::fs::OpenOptions;
use tracing::debug;

use crate::FixtureError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Base directory for fixtures, relative to the test working directory.
pub const DEFAULT_FIXTURE_DIR: &str = "testdata";

/// Permission bits for newly written fixture files.
#[cfg(unix)]
const FIXTURE_FILE_MODE: u32 = 0o600;

/// Maximum attempts at allocating a unique temporary file name.
const MAX_TEMP_ATTEMPTS: u32 = 64;

// ============================================================================
// SECTION: Store Contract
// ============================================================================

/// Filename-keyed byte storage for golden fixtures.
///
/// # Invariants
/// - Implementations never cache content across calls.
/// - `write` fully replaces any prior content stored under `name`.
/// - Names are validated with [`validate_fixture_name`] before any access.
pub trait FixtureStore {
    /// Reads the raw bytes stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the name is invalid or the fixture cannot be read.
    fn read(&self, name: &str) -> Result<Vec<u8>, FixtureError>;

    /// Creates or replaces the fixture stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the name is invalid or the fixture cannot be written.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), FixtureError>;
}

// ============================================================================
// SECTION: Directory Store
// ============================================================================

/// Fixture store backed by files under a base directory.
///
/// # Invariants
/// - Relative base directories resolve against the current working directory at
///   call time.
/// - A symlinked base directory, subdirectory, or fixture file is rejected
///   rather than followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirFixtureStore {
    /// Directory holding the fixture files.
    base_dir: PathBuf,
}

impl DirFixtureStore {
    /// Creates a store rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the default base directory (`testdata`).
    #[must_use]
    pub fn default_base_dir() -> PathBuf {
        PathBuf::from(DEFAULT_FIXTURE_DIR)
    }

    /// Returns the configured base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the on-disk path a fixture name maps to.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidName`] when the name is not a safe relative path.
    pub fn fixture_path(&self, name: &str) -> Result<PathBuf, FixtureError> {
        let relative = validate_fixture_name(name)?;
        Ok(self.base_dir.join(relative))
    }
}

impl Default for DirFixtureStore {
    fn default() -> Self {
        Self::new(Self::default_base_dir())
    }
}

impl FixtureStore for DirFixtureStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, FixtureError> {
        let relative = validate_fixture_name(name)?;
        let path = self.base_dir.join(&relative);
        let base = open_base_dir(&self.base_dir, false).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                FixtureError::Read {
                    path: path.clone(),
                    message: format!(
                        "fixture directory '{}' does not exist: {err}",
                        self.base_dir.display()
                    ),
                }
            } else {
                base_dir_error(&self.base_dir, &err)
            }
        })?;
        let (parent, file_name) = open_parent_dir(&base, &relative, false)
            .map_err(|err| read_error(&path, &err))?;

        let mut options = OpenOptions::new();
        options.read(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        let mut file = parent
            .open_with(Path::new(file_name.as_os_str()), &options)
            .map_err(|err| read_error(&path, &err))?;
        let metadata = file.metadata().map_err(|err| read_error(&path, &err))?;
        if !metadata.is_file() {
            return Err(FixtureError::Read {
                path,
                message: String::from("not a regular file"),
            });
        }
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|err| read_error(&path, &err))?;
        debug!(fixture = %path.display(), bytes = bytes.len(), "read fixture");
        Ok(bytes)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), FixtureError> {
        let relative = validate_fixture_name(name)?;
        let path = self.base_dir.join(&relative);
        let base = open_base_dir(&self.base_dir, true)
            .map_err(|err| base_dir_error(&self.base_dir, &err))?;
        let (parent, file_name) = open_parent_dir(&base, &relative, true)
            .map_err(|err| write_error(&path, &err))?;
        write_file_atomic(&parent, Path::new(file_name.as_os_str()), bytes)
            .map_err(|err| write_error(&path, &err))?;
        debug!(fixture = %path.display(), bytes = bytes.len(), "wrote fixture");
        Ok(())
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory fixture store for tests.
///
/// Clones share the same underlying map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFixtureStore {
    /// Fixture map protected by a mutex.
    fixtures: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryFixtureStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a fixture, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the name is invalid or the store is poisoned.
    pub fn insert(&self, name: &str, bytes: impl Into<Vec<u8>>) -> Result<(), FixtureError> {
        self.write(name, &bytes.into())
    }

    /// Returns a copy of the fixture stored under `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        let key = fixture_key(Path::new(name));
        self.fixtures.lock().ok().and_then(|guard| guard.get(&key).cloned())
    }
}

impl FixtureStore for InMemoryFixtureStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, FixtureError> {
        let relative = validate_fixture_name(name)?;
        let guard = self.fixtures.lock().map_err(|_| FixtureError::Read {
            path: relative.clone(),
            message: String::from("fixture store mutex poisoned"),
        })?;
        guard.get(&fixture_key(&relative)).cloned().ok_or_else(|| FixtureError::Read {
            path: relative,
            message: String::from("fixture not found"),
        })
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), FixtureError> {
        let relative = validate_fixture_name(name)?;
        self.fixtures
            .lock()
            .map_err(|_| FixtureError::Write {
                path: relative.clone(),
                message: String::from("fixture store mutex poisoned"),
            })?
            .insert(fixture_key(&relative), bytes.to_vec());
        Ok(())
    }
}

/// Builds the map key for a validated name, dropping `.` components.
fn fixture_key(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// SECTION: Name Validation
// ============================================================================

/// Validates that a fixture name is a non-empty path relative to the base directory.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidName`] for empty names, absolute paths, or
/// names containing parent, root, or prefix components.
pub fn validate_fixture_name(name: &str) -> Result<PathBuf, FixtureError> {
    if name.trim().is_empty() {
        return Err(FixtureError::InvalidName(String::from("fixture name is empty")));
    }
    let candidate = PathBuf::from(name);
    if candidate.is_absolute() {
        return Err(FixtureError::InvalidName(format!("fixture name must be relative: {name}")));
    }
    let mut has_file = false;
    for component in candidate.components() {
        match component {
            Component::Normal(_) => has_file = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(FixtureError::InvalidName(format!(
                    "fixture name contains invalid component: {name}"
                )));
            }
        }
    }
    if !has_file {
        return Err(FixtureError::InvalidName(format!("fixture name has no file component: {name}")));
    }
    Ok(candidate)
}

// ============================================================================
// SECTION: Directory Helpers
// ============================================================================

/// Opens the base directory as a capability handle.
///
/// The parent of the base directory is opened ambiently; the base directory
/// itself and everything beneath it are opened without following symlinks.
fn open_base_dir(base_dir: &Path, create_missing: bool) -> std::io::Result<Dir> {
    let Some(Component::Normal(leaf)) = base_dir.components().next_back() else {
        return Err(std::io::Error::new(
            ErrorKind::InvalidInput,
            "fixture directory must end in a named directory",
        ));
    };
    let parent = match base_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if create_missing {
        std::fs::create_dir_all(parent)?;
    }
    let parent_dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    open_or_create_child_dir_nofollow(&parent_dir, Path::new(leaf), create_missing)
}

/// Opens a child directory without following symlinks.
fn open_child_dir_nofollow(parent: &Dir, child: &Path) -> std::io::Result<Dir> {
    let mut options = OpenOptions::new();
    options.read(true);
    options._cap_fs_ext_follow(FollowSymlinks::No);
    let file = parent.open_with(child, &options)?;
    let metadata = file.metadata()?;
    if !metadata.is_dir() {
        return Err(std::io::Error::new(
            ErrorKind::InvalidInput,
            "path component is not a directory",
        ));
    }
    Ok(Dir::from_std_file(file.into_std()))
}

/// Opens or creates a child directory without following symlinks.
fn open_or_create_child_dir_nofollow(
    parent: &Dir,
    child: &Path,
    create_missing: bool,
) -> std::io::Result<Dir> {
    match open_child_dir_nofollow(parent, child) {
        Ok(dir) => Ok(dir),
        Err(err) if err.kind() == ErrorKind::NotFound && create_missing => {
            parent.create_dir(child)?;
            open_child_dir_nofollow(parent, child)
        }
        Err(err) => Err(err),
    }
}

/// Opens the directory holding a fixture, returning it with the file name.
fn open_parent_dir(
    base: &Dir,
    relative: &Path,
    create_missing: bool,
) -> std::io::Result<(Dir, OsString)> {
    let mut current = base.try_clone()?;
    let mut components =
        relative.components().filter(|component| !matches!(component, Component::CurDir)).peekable();
    while let Some(component) = components.next() {
        let Component::Normal(name) = component else {
            break;
        };
        if components.peek().is_none() {
            return Ok((current, name.to_os_string()));
        }
        current = open_or_create_child_dir_nofollow(&current, Path::new(name), create_missing)?;
    }
    Err(std::io::Error::new(ErrorKind::InvalidInput, "fixture name has no file component"))
}

// ============================================================================
// SECTION: File Helpers
// ============================================================================

/// Writes file bytes using a temporary sibling and atomic rename.
fn write_file_atomic(parent: &Dir, file_name: &Path, bytes: &[u8]) -> std::io::Result<()> {
    for attempt in 0 .. MAX_TEMP_ATTEMPTS {
        let temp_name = temp_file_name(file_name, attempt);
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        options._cap_fs_ext_follow(FollowSymlinks::No);
        #[cfg(unix)]
        {
            use cap_std::fs::OpenOptionsExt;
            options.mode(FIXTURE_FILE_MODE);
        }
        match parent.open_with(&temp_name, &options) {
            Ok(mut temp_file) => {
                let result = temp_file
                    .write_all(bytes)
                    .and_then(|()| temp_file.sync_all())
                    .and_then(|()| parent.rename(&temp_name, parent, file_name));
                if result.is_err() {
                    let _ = parent.remove_file(&temp_name);
                }
                return result;
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
            Err(err) => return Err(err),
        }
    }
    Err(std::io::Error::new(ErrorKind::AlreadyExists, "unable to allocate temporary fixture file"))
}

/// Builds a deterministic temporary file name for atomic writes.
fn temp_file_name(file_name: &Path, attempt: u32) -> PathBuf {
    let mut temp = OsString::from(".tmp-");
    temp.push(file_name.as_os_str());
    temp.push(format!(".{}.{}", std::process::id(), attempt));
    PathBuf::from(temp)
}

/// Maps an I/O failure on the base directory.
fn base_dir_error(base_dir: &Path, err: &std::io::Error) -> FixtureError {
    FixtureError::BaseDir {
        path: base_dir.to_path_buf(),
        message: err.to_string(),
    }
}

/// Maps an I/O failure on a fixture read.
fn read_error(path: &Path, err: &std::io::Error) -> FixtureError {
    FixtureError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Maps an I/O failure on a fixture write.
fn write_error(path: &Path, err: &std::io::Error) -> FixtureError {
    FixtureError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
