// Shared helpers for integration tests.
//
// Provides a temporary git work tree with a config file so each test can
// run a full deploy in isolation.  Paths in test configs use `{{.GitRoot}}`
// so nothing is ever written outside the temporary directory.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use deploy_configs::cli::Cli;
use deploy_configs::commands::deploy;
use deploy_configs::logging::{Log, LogLevel, MemoryLog};

/// An isolated repository backed by a [`tempfile::TempDir`].
///
/// Contains a `.git` directory so `{{.GitRoot}}` resolves to its root.
pub struct TestRepo {
    /// Temporary directory containing the repository.
    pub root: tempfile::TempDir,
}

impl TestRepo {
    /// Create an empty repository.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(root.path().join(".git")).expect("create .git");
        Self { root }
    }

    /// Path to the repository root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Absolute path of `rel` inside the repository.
    pub fn join(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    /// Read `rel` as a string.
    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.join(rel)).expect("read file")
    }

    /// Write `deploy-configs.yml` at the repository root.
    pub fn write_config(&self, yaml: &str) {
        self.write_file("deploy-configs.yml", yaml);
    }

    /// Run a deploy of `instance` from the repository root.
    pub fn try_deploy(&self, instance: &str) -> (anyhow::Result<bool>, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::new());
        let cli = Cli {
            instance: instance.to_string(),
            config: None,
            directory: Some(self.path().to_path_buf()),
            verbose: false,
        };
        let result = deploy::run(
            &cli,
            Arc::clone(&log) as Arc<dyn Log>,
            Arc::new(AtomicBool::new(false)),
        );
        (result, log)
    }

    /// Run a deploy of `instance` that must get past config loading.
    pub fn deploy(&self, instance: &str) -> (bool, Arc<MemoryLog>) {
        let (result, log) = self.try_deploy(instance);
        (result.expect("deploy reached the tasks"), log)
    }
}

/// Headlines (first lines) of the messages recorded at `level`.
pub fn headlines(log: &MemoryLog, level: LogLevel) -> Vec<String> {
    log.messages(level)
        .iter()
        .map(|m| m.lines().next().unwrap_or_default().to_string())
        .collect()
}
