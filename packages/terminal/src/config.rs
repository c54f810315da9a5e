use std::path::PathBuf;

pub const DEFAULT_WORKSPACE: &str = "/tmp/terminal_workspace";
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

pub const WORKSPACE_ENV: &str = "CODEPOD_TERMINAL_WORKSPACE";
pub const HISTORY_LIMIT_ENV: &str = "CODEPOD_TERMINAL_HISTORY_LIMIT";

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    pub workspace_root: PathBuf,
    pub history_limit: usize,
    /// Alias token and expansion, checked in order.
    pub aliases: Vec<(String, String)>,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            workspace_root: PathBuf::from(DEFAULT_WORKSPACE),
            history_limit: DEFAULT_HISTORY_LIMIT,
            aliases: default_aliases(),
        }
    }
}

impl TerminalConfig {
    /// Defaults overridden by `CODEPOD_TERMINAL_*` environment variables.
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = std::env::var(WORKSPACE_ENV) {
            if !root.trim().is_empty() {
                config.workspace_root = PathBuf::from(root);
            }
        }
        if let Ok(limit) = std::env::var(HISTORY_LIMIT_ENV) {
            match limit.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.history_limit = n,
                _ => tracing::warn!(value = %limit, "ignoring invalid {HISTORY_LIMIT_ENV}"),
            }
        }
        config
    }

    pub fn with_workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

pub fn default_aliases() -> Vec<(String, String)> {
    [("ll", "ls -la"), ("la", "ls -a"), ("clear", "clear")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TerminalConfig::default();
        assert_eq!(config.workspace_root, PathBuf::from("/tmp/terminal_workspace"));
        assert_eq!(config.history_limit, 1000);
        assert_eq!(config.aliases[0], ("ll".to_string(), "ls -la".to_string()));
        assert_eq!(config.aliases[1], ("la".to_string(), "ls -a".to_string()));
    }

    #[test]
    fn from_env_reads_overrides() {
        std::env::set_var(WORKSPACE_ENV, "/srv/from-env");
        std::env::set_var(HISTORY_LIMIT_ENV, "not-a-number");
        let config = TerminalConfig::from_env();
        std::env::remove_var(WORKSPACE_ENV);
        std::env::remove_var(HISTORY_LIMIT_ENV);
        assert_eq!(config.workspace_root, PathBuf::from("/srv/from-env"));
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn builders_override_fields() {
        let config = TerminalConfig::default()
            .with_workspace_root("/srv/ws")
            .with_history_limit(5);
        assert_eq!(config.workspace_root, PathBuf::from("/srv/ws"));
        assert_eq!(config.history_limit, 5);
    }
}
