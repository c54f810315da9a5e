//! Natural-language intents.
//!
//! A phrase is checked against an ordered rule table; the first rule that
//! matches decides which built-in runs. Rule order is significant: several
//! phrasings match more than one rule.

use std::fs;
use std::sync::OnceLock;

use regex::Regex;

use crate::builtins::{try_builtin, BuiltinResult};
use crate::control::{describe_io, CommandResult};
use crate::state::SessionState;

/// Line prefixes that route the rest of the line to the intent mapper.
pub const INTENT_PREFIXES: &[&str] = &["nl:", "natural:"];

/// File extension listed by "show ... python ... files".
pub const PYTHON_EXTENSION: &str = ".py";

const SYSTEM_KEYWORDS: &[&str] = &["system", "info", "stats", "performance"];

/// What a recognized phrase asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Run a built-in with the given operands.
    Builtin { name: &'static str, args: Vec<String> },
    /// List files with [`PYTHON_EXTENSION`] in the current directory.
    ListPythonFiles,
}

impl Intent {
    fn builtin(name: &'static str, args: &[&str]) -> Self {
        Self::Builtin {
            name,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

enum Matcher {
    Pattern(&'static str),
    Keywords(fn(&str) -> bool),
}

struct IntentRule {
    name: &'static str,
    matcher: Matcher,
    /// Receives the capture groups, group 0 being the whole match (the whole
    /// phrase for keyword rules). Unmatched optional groups are empty.
    build: fn(&[&str]) -> Intent,
}

/// Rule names in evaluation order.
pub const INTENT_ORDER: &[&str] = &[
    "create-folder-named",
    "create-folder",
    "move",
    "copy",
    "delete",
    "create-file-named",
    "show-files",
    "navigate",
    "system-info",
];

fn shows_files(phrase: &str) -> bool {
    phrase.contains("show") && phrase.contains("file")
}

fn mentions_system(phrase: &str) -> bool {
    SYSTEM_KEYWORDS.iter().any(|k| phrase.contains(k))
}

fn make_dir(groups: &[&str]) -> Intent {
    Intent::builtin("mkdir", &[groups[1]])
}

fn move_to(groups: &[&str]) -> Intent {
    Intent::builtin("mv", &[groups[1], groups[2]])
}

fn copy_to(groups: &[&str]) -> Intent {
    Intent::builtin("cp", &[groups[1], groups[2]])
}

fn remove(groups: &[&str]) -> Intent {
    Intent::builtin("rm", &[groups[1]])
}

fn make_file(groups: &[&str]) -> Intent {
    Intent::builtin("touch", &[groups[1]])
}

fn show_files(groups: &[&str]) -> Intent {
    if groups[0].contains("python") {
        Intent::ListPythonFiles
    } else {
        Intent::builtin("ls", &[])
    }
}

fn change_dir(groups: &[&str]) -> Intent {
    Intent::builtin("cd", &[groups[1]])
}

fn system_info(_: &[&str]) -> Intent {
    Intent::builtin("sysinfo", &[])
}

const RULES: &[IntentRule] = &[
    IntentRule {
        name: "create-folder-named",
        matcher: Matcher::Pattern(r"create.*(?:folder|directory|dir).*(?:called|named)\s+(\w+)"),
        build: make_dir,
    },
    IntentRule {
        name: "create-folder",
        matcher: Matcher::Pattern(r"(?:make|create)\s+(?:a\s+)?(?:folder|directory|dir)\s+(\w+)"),
        build: make_dir,
    },
    IntentRule {
        name: "move",
        matcher: Matcher::Pattern(r"move\s+(\S+)\s+(?:to|into)\s+(?:the\s+)?(\S+)"),
        build: move_to,
    },
    IntentRule {
        name: "copy",
        matcher: Matcher::Pattern(r"copy\s+(\S+)\s+(?:to|into)\s+(?:the\s+)?(\S+)"),
        build: copy_to,
    },
    IntentRule {
        name: "delete",
        matcher: Matcher::Pattern(r"(?:delete|remove)\s+(?:file\s+)?(\S+)"),
        build: remove,
    },
    IntentRule {
        name: "create-file-named",
        matcher: Matcher::Pattern(r"create.*file.*(?:called|named)\s+(\S+)"),
        build: make_file,
    },
    IntentRule {
        name: "show-files",
        matcher: Matcher::Keywords(shows_files),
        build: show_files,
    },
    IntentRule {
        name: "navigate",
        matcher: Matcher::Pattern(r"(?:go|navigate)\s+to\s+(\S+)"),
        build: change_dir,
    },
    IntentRule {
        name: "system-info",
        matcher: Matcher::Keywords(mentions_system),
        build: system_info,
    },
];

/// Compiled patterns, index-aligned with `RULES` (`None` for keyword rules).
fn compiled() -> &'static [Option<Regex>] {
    static COMPILED: OnceLock<Vec<Option<Regex>>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| match rule.matcher {
                Matcher::Pattern(p) => Some(Regex::new(p).expect("intent pattern is valid")),
                Matcher::Keywords(_) => None,
            })
            .collect()
    })
}

/// Map an already lower-cased phrase to an intent and the name of the rule
/// that recognized it.
pub fn classify(phrase: &str) -> Option<(&'static str, Intent)> {
    for (rule, regex) in RULES.iter().zip(compiled()) {
        let groups: Vec<&str> = match (&rule.matcher, regex) {
            (Matcher::Pattern(_), Some(re)) => match re.captures(phrase) {
                Some(caps) => caps
                    .iter()
                    .map(|m| m.map(|m| m.as_str()).unwrap_or_default())
                    .collect(),
                None => continue,
            },
            (Matcher::Keywords(pred), _) if pred(phrase) => vec![phrase],
            _ => continue,
        };
        return Some((rule.name, (rule.build)(&groups)));
    }
    None
}

/// Interpret the text following an intent prefix.
pub fn run_intent(state: &mut SessionState, text: &str) -> BuiltinResult {
    let phrase = text.trim().to_lowercase();
    let Some((rule, intent)) = classify(&phrase) else {
        tracing::debug!(%phrase, "no intent matched");
        return Ok(not_understood(&phrase));
    };
    tracing::debug!(%phrase, rule, ?intent, "intent matched");

    match intent {
        Intent::Builtin { name, args } => match try_builtin(state, name, &args) {
            Some(result) => result,
            None => Ok(CommandResult::error(format!("intent target '{name}' is not a builtin"))),
        },
        Intent::ListPythonFiles => Ok(list_python_files(state)),
    }
}

fn list_python_files(state: &SessionState) -> CommandResult {
    let entries = match fs::read_dir(state.current_dir()) {
        Ok(entries) => entries,
        Err(e) => return CommandResult::error(describe_io(&e)),
    };
    let matches: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(PYTHON_EXTENSION))
        .collect();
    if matches.is_empty() {
        CommandResult::success("No Python files found in current directory")
    } else {
        CommandResult::success(matches.join("\n"))
    }
}

fn not_understood(phrase: &str) -> CommandResult {
    CommandResult {
        output: format!(
            "I didn't understand the command: '{phrase}'\n\n\
             Try commands like:\n\
             - create a folder test\n\
             - move file.txt to documents\n\
             - show me files\n\
             - delete temp.txt"
        ),
        error: String::new(),
        success: false,
    }
}
