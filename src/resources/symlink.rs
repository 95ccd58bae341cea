//! Symlink resource.
use std::io;
use std::path::PathBuf;

use super::fs::{self, PathStatus};
use super::{Applicable, Resource, ResourceChange, ResourceError, ResourceState, UnitKind};

/// A symlink resource that can be checked and applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkResource {
    /// Unit name, used for ordering and reporting.
    pub name: String,
    /// What the symlink points to.
    pub target: PathBuf,
    /// Where the symlink is created.
    pub link: PathBuf,
}

impl SymlinkResource {
    /// Create a new symlink resource.
    #[must_use]
    pub fn new(name: impl Into<String>, target: PathBuf, link: PathBuf) -> Self {
        Self {
            name: name.into(),
            target,
            link,
        }
    }

    /// Expand a unit whose target is a directory into one unit per direct
    /// entry, named `name/entry`.  Any other unit is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::DirectoryUnreadable`] if the target directory
    /// cannot be listed; no entry units are produced in that case.
    pub fn fan_out(self) -> Result<Vec<Self>, ResourceError> {
        if fs::classify(&self.target) != PathStatus::Directory {
            return Ok(vec![self]);
        }

        let entries =
            fs::list_entries(&self.target).map_err(|source| ResourceError::DirectoryUnreadable {
                path: self.target.clone(),
                source,
            })?;
        Ok(entries
            .into_iter()
            .map(|entry| {
                Self::new(
                    format!("{}/{}", self.name, entry.to_string_lossy()),
                    self.target.join(&entry),
                    self.link.join(&entry),
                )
            })
            .collect())
    }

    fn parent_blocked(&self) -> Option<ResourceError> {
        let parent = self.link.parent()?;
        let error = match std::fs::metadata(parent) {
            Ok(meta) if meta.is_dir() => return None,
            Ok(_) => fs::not_a_directory(parent),
            // Created on apply.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => e,
        };
        Some(ResourceError::io("create directory", parent, error))
    }
}

impl Applicable for SymlinkResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> UnitKind {
        UnitKind::Link
    }

    fn description(&self) -> String {
        format!("target: {:?}\nlink: {:?}", self.target, self.link)
    }

    fn apply(&self) -> Result<ResourceChange, ResourceError> {
        if let Some(parent) = self.link.parent() {
            fs::ensure_directory(parent)
                .map_err(|e| ResourceError::io("create directory", parent, e))?;
        }

        if fs::classify(&self.link) == PathStatus::Symlink {
            fs::remove_entry(&self.link)
                .map_err(|e| ResourceError::io("replace link", &self.link, e))?;
        }

        fs::create_symlink(&self.target, &self.link)
            .map_err(|e| ResourceError::io("create link", &self.link, e))?;

        Ok(ResourceChange::Applied)
    }
}

impl Resource for SymlinkResource {
    fn current_state(&self) -> ResourceState {
        if fs::classify(&self.target) == PathStatus::Absent {
            return ResourceState::Invalid(ResourceError::TargetMissing);
        }
        if let Some(err) = self.parent_blocked() {
            return ResourceState::Invalid(err);
        }

        match fs::classify(&self.link) {
            PathStatus::Absent => ResourceState::Missing,
            PathStatus::Symlink if fs::resolves_to(&self.link, &self.target) => {
                ResourceState::Correct
            }
            PathStatus::Symlink => ResourceState::Incorrect {
                current: std::fs::read_link(&self.link).map_or_else(
                    |e| format!("unreadable link: {e}"),
                    |p| format!("points to {}", p.display()),
                ),
            },
            PathStatus::RegularFile => ResourceState::Invalid(ResourceError::LinkFileExists),
            PathStatus::Directory => ResourceState::Invalid(ResourceError::LinkPathOccupied),
            PathStatus::Unknown => ResourceState::Invalid(ResourceError::LinkPathExists),
        }
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use std::os::unix::fs::{FileTypeExt, symlink};
    use std::os::unix::net::UnixListener;

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("home").join("link");
        std::fs::write(&target, "content").unwrap();
        (dir, target, link)
    }

    #[test]
    fn description_lists_paths() {
        let resource = SymlinkResource::new("x", PathBuf::from("/source"), PathBuf::from("/dest"));
        assert_eq!(resource.description(), "target: \"/source\"\nlink: \"/dest\"");
    }

    #[test]
    fn invalid_when_target_missing() {
        let dir = tempfile::tempdir().unwrap();
        let resource = SymlinkResource::new(
            "x",
            dir.path().join("nonexistent"),
            dir.path().join("link"),
        );
        assert!(matches!(
            resource.current_state(),
            ResourceState::Invalid(ResourceError::TargetMissing)
        ));
    }

    #[test]
    fn missing_then_correct_after_apply() {
        let (_dir, target, link) = setup();
        let resource = SymlinkResource::new("x", target.clone(), link.clone());

        assert!(matches!(resource.current_state(), ResourceState::Missing));
        assert_eq!(resource.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_link(&link).unwrap(), target);
        assert!(matches!(resource.current_state(), ResourceState::Correct));
    }

    #[test]
    fn incorrect_link_is_replaced_not_merged() {
        let (dir, target, link) = setup();
        let other = dir.path().join("other");
        std::fs::write(&other, "other").unwrap();
        std::fs::create_dir_all(link.parent().unwrap()).unwrap();
        symlink(&other, &link).unwrap();

        let resource = SymlinkResource::new("x", target.clone(), link.clone());
        assert!(matches!(
            resource.current_state(),
            ResourceState::Incorrect { .. }
        ));
        resource.apply().unwrap();

        assert_eq!(fs::classify(&link), PathStatus::Symlink);
        assert_eq!(std::fs::read_link(&link).unwrap(), target);
        assert_eq!(std::fs::read_to_string(&other).unwrap(), "other");
        let siblings = fs::list_entries(link.parent().unwrap()).unwrap();
        assert_eq!(siblings.len(), 1);
    }

    #[test]
    fn broken_link_is_incorrect() {
        let (dir, target, link) = setup();
        std::fs::create_dir_all(link.parent().unwrap()).unwrap();
        symlink(dir.path().join("gone"), &link).unwrap();
        let resource = SymlinkResource::new("x", target, link);
        assert!(matches!(
            resource.current_state(),
            ResourceState::Incorrect { .. }
        ));
    }

    #[test]
    fn regular_file_at_link_is_refused() {
        let (_dir, target, link) = setup();
        std::fs::create_dir_all(link.parent().unwrap()).unwrap();
        std::fs::write(&link, "user data").unwrap();

        let resource = SymlinkResource::new("x", target, link.clone());
        assert!(matches!(
            resource.current_state(),
            ResourceState::Invalid(ResourceError::LinkFileExists)
        ));
        assert_eq!(std::fs::read_to_string(&link).unwrap(), "user data");
    }

    #[test]
    fn directory_at_link_is_refused() {
        let (_dir, target, link) = setup();
        std::fs::create_dir_all(&link).unwrap();
        let resource = SymlinkResource::new("x", target, link);
        assert!(matches!(
            resource.current_state(),
            ResourceState::Invalid(ResourceError::LinkPathOccupied)
        ));
    }

    #[test]
    fn socket_at_link_is_refused() {
        let (_dir, target, link) = setup();
        std::fs::create_dir_all(link.parent().unwrap()).unwrap();
        let _listener = UnixListener::bind(&link).unwrap();
        let resource = SymlinkResource::new("x", target, link.clone());

        assert_eq!(fs::classify(&link), PathStatus::Unknown);
        assert!(matches!(
            resource.current_state(),
            ResourceState::Invalid(ResourceError::LinkPathExists)
        ));
        let meta = std::fs::symlink_metadata(&link).unwrap();
        assert!(meta.file_type().is_socket());
    }

    #[test]
    fn file_in_place_of_parent_directory_is_refused() {
        let (dir, target, _) = setup();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let resource = SymlinkResource::new("x", target, blocker.join("link"));
        let err = match resource.current_state() {
            ResourceState::Invalid(err) => Some(err),
            _ => None,
        }
        .expect("expected invalid state");
        assert!(err.to_string().contains("file exists"), "{err}");
    }

    #[test]
    fn file_in_place_of_grandparent_directory_is_refused() {
        let (dir, target, _) = setup();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let link = blocker.join("sub").join(".vimrc");
        let resource = SymlinkResource::new("x", target, link);

        let state = resource.current_state();
        assert!(
            matches!(
                state,
                ResourceState::Invalid(ResourceError::Io { action: "create directory", ref path, .. })
                    if path == &blocker.join("sub")
            ),
            "{state:?}"
        );
        assert!(blocker.is_file());
    }

    #[test]
    fn missing_parent_chain_is_created_on_apply() {
        let (dir, target, _) = setup();
        let link = dir.path().join("a").join("b").join("link");
        let resource = SymlinkResource::new("x", target.clone(), link.clone());
        assert!(matches!(resource.current_state(), ResourceState::Missing));
        resource.apply().unwrap();
        assert_eq!(std::fs::read_link(&link).unwrap(), target);
    }

    #[test]
    fn fan_out_leaves_file_targets_alone() {
        let (_dir, target, link) = setup();
        let resource = SymlinkResource::new("x", target, link);
        assert_eq!(resource.clone().fan_out().unwrap(), vec![resource]);
    }

    #[test]
    fn fan_out_expands_directory_one_level() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("configs");
        std::fs::create_dir_all(target.join("nested").join("deep")).unwrap();
        std::fs::write(target.join("a.conf"), "").unwrap();
        let link = dir.path().join("home");

        let parent = SymlinkResource::new("cfg", target.clone(), link.clone());
        let mut units = parent.fan_out().unwrap();
        units.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].name, "cfg/a.conf");
        assert_eq!(units[0].target, target.join("a.conf"));
        assert_eq!(units[0].link, link.join("a.conf"));
        assert_eq!(units[1].name, "cfg/nested");
        assert!(units.iter().all(|u| u.link.parent() == Some(link.as_path())));
    }

    #[test]
    fn fan_out_of_empty_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let resource = SymlinkResource::new("x", dir.path().to_path_buf(), dir.path().join("l"));
        assert!(resource.fan_out().unwrap().is_empty());
    }
}
