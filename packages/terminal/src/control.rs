use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output sentinel telling the client to wipe its visible transcript.
pub const CLEAR_SCREEN: &str = "CLEAR_SCREEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub output: String,
    pub error: String,
    pub success: bool,
}

impl CommandResult {
    pub fn empty() -> Self {
        Self {
            output: String::new(),
            error: String::new(),
            success: true,
        }
    }

    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: String::new(),
            success: true,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            error: error.into(),
            success: false,
        }
    }

    /// Build the result of a command that ran against `targets` operands and
    /// collected one message per failed operand. The command still counts as
    /// successful unless every operand failed.
    pub fn aggregate(errors: Vec<String>, targets: usize) -> Self {
        if errors.is_empty() {
            return Self::empty();
        }
        Self {
            output: String::new(),
            success: errors.len() < targets,
            error: errors.join("\n"),
        }
    }

    /// Like [`CommandResult::aggregate`], but any failed operand fails the
    /// whole command.
    pub fn strict(output: String, errors: Vec<String>) -> Self {
        Self {
            output,
            success: errors.is_empty(),
            error: errors.join("\n"),
        }
    }
}

/// Faults that are not part of a command's normal error reporting. They are
/// converted into a generic `Error: ...` result at the `execute` boundary.
#[derive(Debug, thiserror::Error)]
pub enum TerminalError {
    #[error("cannot prepare workspace '{path}': {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("current directory left the workspace")]
    Escaped,
}

impl TerminalError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Short, path-free description of an I/O failure for per-operand messages.
pub fn describe_io(err: &std::io::Error) -> String {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound => "No such file or directory".to_string(),
        ErrorKind::PermissionDenied => "Permission denied".to_string(),
        ErrorKind::AlreadyExists => "File exists".to_string(),
        _ => {
            let text = err.to_string();
            match text.rfind(" (os error") {
                Some(idx) => text[..idx].to_string(),
                None => text,
            }
        }
    }
}
