//! Filesystem probe: stateless path classification, content hashing and the
//! few mutations shared by every resource kind.
//!
//! Nothing here caches.  Each call looks at the filesystem as it is right
//! now, so a resource re-probes between deciding and mutating if it needs to.
use sha2::{Digest as _, Sha512};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Classification of a path, taken without following a final symlink.
///
/// # Examples
///
/// ```
/// use deploy_configs::resources::fs::{PathStatus, classify};
///
/// let dir = tempfile::tempdir().unwrap();
/// assert_eq!(classify(dir.path()), PathStatus::Directory);
/// assert_eq!(classify(&dir.path().join("nope")), PathStatus::Absent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathStatus {
    /// Nothing exists at the path.
    Absent,
    /// A regular file.
    RegularFile,
    /// A real directory (not a link to one).
    Directory,
    /// A symbolic link, whether or not its target exists.
    Symlink,
    /// The path could not be inspected, or is a device, socket or fifo.
    Unknown,
}

impl std::fmt::Display for PathStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Absent => "absent",
            Self::RegularFile => "regular file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// SHA-512 digest of a file's content, used only for change detection.
///
/// Two missing files compare equal; a missing file never equals real content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentHash {
    /// The file could not be opened or read.
    Missing,
    /// Digest of the bytes read.
    Digest(Vec<u8>),
}

/// Classify `path` using a non-dereferencing stat.
#[must_use]
pub fn classify(path: &Path) -> PathStatus {
    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => PathStatus::Absent,
        Err(_) => PathStatus::Unknown,
        Ok(meta) => {
            let file_type = meta.file_type();
            if file_type.is_symlink() {
                PathStatus::Symlink
            } else if file_type.is_dir() {
                PathStatus::Directory
            } else if file_type.is_file() {
                PathStatus::RegularFile
            } else {
                PathStatus::Unknown
            }
        }
    }
}

/// Stream the file at `path` through SHA-512.
#[must_use]
pub fn content_hash(path: &Path) -> ContentHash {
    let Ok(mut file) = fs::File::open(path) else {
        return ContentHash::Missing;
    };
    let mut hasher = Sha512::new();
    match io::copy(&mut file, &mut hasher) {
        Ok(_) => ContentHash::Digest(hasher.finalize().to_vec()),
        Err(_) => ContentHash::Missing,
    }
}

/// Hash an in-memory buffer the same way [`content_hash`] hashes a file.
#[must_use]
pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
    ContentHash::Digest(Sha512::digest(bytes).to_vec())
}

/// Return `true` if `link` is a symlink whose stored target names the same
/// absolute path as `destination`.
///
/// A relative stored target is resolved against the link's own directory; a
/// relative `destination` against the current directory.  Both sides are
/// normalized lexically and compared for exact equality, so `..` and `.`
/// components are folded but symlinks along the way are not resolved.
#[must_use]
pub fn resolves_to(link: &Path, destination: &Path) -> bool {
    let Ok(stored) = fs::read_link(link) else {
        return false;
    };
    let Ok(link) = std::path::absolute(link) else {
        return false;
    };
    let Ok(destination) = std::path::absolute(destination) else {
        return false;
    };
    let base = link.parent().unwrap_or(&link);
    let resolved = normalize_lexically(&base.join(stored));
    dunce::simplified(&resolved) == dunce::simplified(&normalize_lexically(&destination))
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// A `..` at the root stays at the root.
#[must_use]
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Create `path` and any missing ancestors.
///
/// Succeeds without change if `path` already is a directory (following
/// symlinks), fails if it exists as anything else.
///
/// # Errors
///
/// Returns an error if `path` exists as a non-directory or cannot be created.
pub fn ensure_directory(path: &Path) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(not_a_directory(path)),
        Err(_) => fs::create_dir_all(path),
    }
}

pub(crate) fn not_a_directory(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "unable to create directory, because file exists: {}",
            path.display()
        ),
    )
}

/// Remove the entry at `path`: a file, a symlink (never its target) or an
/// empty directory.
///
/// # Errors
///
/// Returns an error if `path` cannot be inspected or removed.
pub fn remove_entry(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Check if metadata represents a directory-like entry.
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory symlinks,
/// so we check the raw `FILE_ATTRIBUTE_DIRECTORY` bit instead.
fn is_dir_like(meta: &fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns the OS error if the link cannot be created.
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}

/// Names of the direct entries of `dir`, in no particular order.
///
/// # Errors
///
/// Returns an error if the directory or one of its entries cannot be read.
pub fn list_entries(dir: &Path) -> io::Result<Vec<OsString>> {
    fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect()
}

/// Search `start` and each of its ancestors for an entry called `name`
/// whose status is one of `kinds`.
///
/// Returns the first match, closest to `start`.
#[must_use]
pub fn find_entry_ascending(start: &Path, name: &str, kinds: &[PathStatus]) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| kinds.contains(&classify(candidate)))
}
