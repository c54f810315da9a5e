use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::config::TerminalConfig;
use crate::control::TerminalError;
use crate::path::PathResolver;

/// Number of entries the `history` builtin prints.
pub const HISTORY_DISPLAY_LIMIT: usize = 50;

/// Command log with a fixed capacity. The oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Append `line` unless it is blank or repeats the most recent entry.
    pub fn record(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        if self.entries.back().map(String::as_str) == Some(line) {
            return;
        }
        self.entries.push_back(line.to_string());
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).map(String::as_str)
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

/// Per-session interpreter state. One instance per client session; callers
/// serialize access through `&mut`.
pub struct SessionState {
    resolver: PathResolver,
    cwd: PathBuf,
    pub history: History,
    pub aliases: Vec<(String, String)>,
}

impl SessionState {
    /// Create the workspace root if needed and start a session at it.
    pub fn new(config: &TerminalConfig) -> Result<Self, TerminalError> {
        let requested = &config.workspace_root;
        std::fs::create_dir_all(requested).map_err(|source| TerminalError::Workspace {
            path: requested.clone(),
            source,
        })?;
        let root = requested
            .canonicalize()
            .map_err(|source| TerminalError::Workspace {
                path: requested.clone(),
                source,
            })?;
        tracing::info!(root = %root.display(), "terminal session started");

        Ok(Self {
            resolver: PathResolver::new(root.clone()),
            cwd: root,
            history: History::new(config.history_limit),
            aliases: config.aliases.clone(),
        })
    }

    pub fn workspace_root(&self) -> &Path {
        self.resolver.root()
    }

    pub fn current_dir(&self) -> &Path {
        &self.cwd
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Resolve user input against the current directory, confined to the
    /// workspace.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        self.resolver.resolve(&self.cwd, path)
    }

    /// Move the session to `dir`. Paths outside the workspace are rejected
    /// and leave the state unchanged.
    pub fn set_current_dir(&mut self, dir: PathBuf) -> Result<(), TerminalError> {
        if !self.resolver.contains(&dir) {
            return Err(TerminalError::Escaped);
        }
        self.cwd = dir;
        Ok(())
    }

    pub fn reset_current_dir(&mut self) {
        self.cwd = self.resolver.root().to_path_buf();
    }

    /// Current directory as shown to clients.
    pub fn virtual_cwd(&self) -> String {
        self.resolver.virtual_path(&self.cwd)
    }

    pub fn history_snapshot(&self) -> Vec<String> {
        self.history.snapshot()
    }
}
