//! Command-line entry point: history, alias expansion, tokenizing and routing.

use crate::builtins::{try_builtin, BuiltinResult};
use crate::control::CommandResult;
use crate::intent::{run_intent, INTENT_PREFIXES};
use crate::state::SessionState;

/// A whitespace-tokenized command line. No quoting or escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lower-cased command name.
    pub name: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let name = words.next()?.to_lowercase();
        Some(Self {
            name,
            args: words.map(str::to_string).collect(),
        })
    }
}

/// Replace a leading alias token with its expansion, once. The match is a
/// plain prefix test on the raw line, so `ll` also rewrites `llama`.
pub fn expand_alias(aliases: &[(String, String)], line: &str) -> String {
    for (alias, expansion) in aliases {
        if let Some(rest) = line.strip_prefix(alias.as_str()) {
            return format!("{expansion}{rest}");
        }
    }
    line.to_string()
}

/// Run one raw command line against the session.
///
/// Never fails: unknown commands and internal faults are reported through
/// the returned [`CommandResult`].
pub fn execute(state: &mut SessionState, raw_line: &str) -> CommandResult {
    state.history.record(raw_line);

    let line = expand_alias(&state.aliases, raw_line);
    let Some(parsed) = ParsedCommand::parse(&line) else {
        return CommandResult::empty();
    };
    tracing::debug!(cmd = %parsed.name, args = ?parsed.args, "dispatching");

    match route(state, &line, &parsed) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(cmd = %parsed.name, error = %e, "command fault");
            CommandResult::error(format!("Error: {e}"))
        }
    }
}

fn route(state: &mut SessionState, line: &str, parsed: &ParsedCommand) -> BuiltinResult {
    if let Some(result) = try_builtin(state, &parsed.name, &parsed.args) {
        return result;
    }

    if let Some(prefix) = INTENT_PREFIXES
        .iter()
        .find(|p| parsed.name.starts_with(**p))
    {
        let text = line.trim_start().get(prefix.len()..).unwrap_or_default();
        return run_intent(state, text);
    }

    Ok(CommandResult::error(format!(
        "Command '{}' not allowed in web environment. Use built-in commands or natural language.",
        parsed.name
    )))
}
