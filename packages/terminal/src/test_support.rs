use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::TerminalConfig;
use crate::state::SessionState;

/// A throwaway workspace root on disk for exercising builtins against a real
/// filesystem.
pub struct TempWorkspace {
    _dir: TempDir,
    root: PathBuf,
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TempWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp workspace");
        let root = dir.path().canonicalize().expect("canonicalize temp workspace");
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> TerminalConfig {
        TerminalConfig::default().with_workspace_root(&self.root)
    }

    pub fn session(&self) -> SessionState {
        SessionState::new(&self.config()).expect("open session")
    }

    /// Add a file with the given content, creating parent directories.
    pub fn with_file(self, rel: &str, content: &[u8]) -> Self {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, content).expect("write fixture file");
        self
    }

    /// Add a directory (and parents).
    pub fn with_dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.root.join(rel)).expect("create fixture dir");
        self
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).expect("read fixture file")
    }
}

pub fn make_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
