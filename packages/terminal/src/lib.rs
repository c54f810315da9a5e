//! Workspace-confined command interpreter.
//!
//! A [`SessionState`] owns one client's view of the workspace. Command lines
//! go through [`execute`], partial lines through [`complete`].

pub mod builtins;
pub mod completion;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod intent;
pub mod listing;
pub mod path;
pub mod state;

#[cfg(test)]
pub mod test_support;

pub use completion::complete;
pub use config::TerminalConfig;
pub use control::{CommandResult, TerminalError, CLEAR_SCREEN};
pub use dispatch::execute;
pub use state::SessionState;
