//! Tab completion for command names and workspace paths.

use std::fs;

use crate::builtins::BUILTIN_NAMES;
use crate::intent::INTENT_PREFIXES;
use crate::state::SessionState;

/// Upper bound on path suggestions.
pub const MAX_PATH_COMPLETIONS: usize = 10;

/// Suggest completions for the last word of `partial`.
///
/// A single word completes against command names; anything after the first
/// word completes against entries of the directory named by the word. Errors
/// produce no suggestions.
pub fn complete(state: &SessionState, partial: &str) -> Vec<String> {
    let words: Vec<&str> = partial.split_whitespace().collect();
    match words.as_slice() {
        [] => Vec::new(),
        [word] => complete_command(word),
        [.., last] => complete_path(state, last),
    }
}

fn complete_command(word: &str) -> Vec<String> {
    let word = word.to_lowercase();
    BUILTIN_NAMES
        .iter()
        .chain(INTENT_PREFIXES)
        .filter(|name| name.starts_with(&word))
        .map(|name| name.to_string())
        .collect()
}

fn complete_path(state: &SessionState, fragment: &str) -> Vec<String> {
    let (dir, prefix) = match fragment.rsplit_once('/') {
        Some((dir, prefix)) => (state.resolve_path(dir), prefix),
        None => (state.current_dir().to_path_buf(), fragment),
    };

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(prefix) {
                return None;
            }
            if entry.path().is_dir() {
                Some(format!("{name}/"))
            } else {
                Some(name)
            }
        })
        .take(MAX_PATH_COMPLETIONS)
        .collect()
}
