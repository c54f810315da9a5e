//! Built-in commands.
//!
//! Every command is implemented in-process against the session's workspace.
//! Operands go through `SessionState::resolve_path` before any filesystem
//! call, so nothing here can reach outside the workspace root.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Local;

use crate::control::{describe_io, CommandResult, TerminalError, CLEAR_SCREEN};
use crate::listing;
use crate::state::{SessionState, HISTORY_DISPLAY_LIMIT};

// ---------------------------------------------------------------------------
// Command table
// ---------------------------------------------------------------------------

/// Built-in names in the order completion offers them.
pub const BUILTIN_NAMES: &[&str] = &[
    "ls", "cd", "pwd", "mkdir", "rm", "rmdir", "cp", "mv", "cat", "touch", "echo", "history",
    "clear", "help", "sysinfo", "ps",
];

pub type BuiltinResult = Result<CommandResult, TerminalError>;

/// Try to handle `cmd_name` as a built-in.
///
/// Returns `None` if the name is not a built-in; the dispatcher then decides
/// what to do with it.
pub fn try_builtin(
    state: &mut SessionState,
    cmd_name: &str,
    args: &[String],
) -> Option<BuiltinResult> {
    let result = match cmd_name {
        "pwd" => Ok(builtin_pwd(state)),
        "ls" => listing::ls(state, args),
        "cd" => Ok(builtin_cd(state, args)),
        "mkdir" => Ok(builtin_mkdir(state, args)),
        "rm" => Ok(builtin_rm(state, args)),
        "rmdir" => Ok(builtin_rmdir(state, args)),
        "cp" => Ok(builtin_cp(state, args)),
        "mv" => Ok(builtin_mv(state, args)),
        "cat" => Ok(builtin_cat(state, args)),
        "touch" => Ok(builtin_touch(state, args)),
        "echo" => Ok(builtin_echo(args)),
        "history" => Ok(builtin_history(state)),
        "clear" => Ok(CommandResult::success(CLEAR_SCREEN)),
        "sysinfo" | "system" => Ok(builtin_sysinfo(state)),
        "ps" => Ok(builtin_ps()),
        "help" => Ok(builtin_help()),
        _ => return None,
    };
    Some(result)
}

fn operands(args: &[String]) -> Vec<&String> {
    args.iter().filter(|a| !a.starts_with('-')).collect()
}

fn has_flag(args: &[String], flags: &[&str]) -> bool {
    args.iter().any(|a| flags.contains(&a.as_str()))
}

/// Where `src` lands when copied or moved onto `dest`: inside it when `dest`
/// is an existing directory, otherwise at `dest` itself.
fn landing_path(src: &Path, dest: &Path) -> PathBuf {
    match (dest.is_dir(), src.file_name()) {
        (true, Some(name)) => dest.join(name),
        _ => dest.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// Individual builtins
// ---------------------------------------------------------------------------

// -- pwd ------------------------------------------------------------------

fn builtin_pwd(state: &SessionState) -> CommandResult {
    CommandResult::success(state.virtual_cwd())
}

// -- cd -------------------------------------------------------------------

fn builtin_cd(state: &mut SessionState, args: &[String]) -> CommandResult {
    let Some(target) = args.first() else {
        state.reset_current_dir();
        return CommandResult::empty();
    };

    let resolved = state.resolve_path(target);
    if !resolved.exists() {
        return CommandResult::error(format!("cd: {target}: No such file or directory"));
    }
    if !resolved.is_dir() {
        return CommandResult::error(format!("cd: {target}: Not a directory"));
    }
    // Resolved paths are already confined; this only trips if that changes.
    match state.set_current_dir(resolved) {
        Ok(()) => CommandResult::empty(),
        Err(e) => CommandResult::error(format!("cd: {target}: {e}")),
    }
}

// -- mkdir ----------------------------------------------------------------

fn builtin_mkdir(state: &SessionState, args: &[String]) -> CommandResult {
    let parents = has_flag(args, &["-p"]);
    let dirs = operands(args);
    if dirs.is_empty() {
        return CommandResult::error("mkdir: missing operand");
    }

    let mut errors = Vec::new();
    for dir in &dirs {
        let path = state.resolve_path(dir);
        let created = if parents {
            fs::create_dir_all(&path)
        } else {
            fs::create_dir(&path)
        };
        if let Err(e) = created {
            errors.push(format!("mkdir: {dir}: {}", describe_io(&e)));
        }
    }
    CommandResult::aggregate(errors, dirs.len())
}

// -- rm -------------------------------------------------------------------

fn builtin_rm(state: &SessionState, args: &[String]) -> CommandResult {
    let recursive = has_flag(args, &["-r", "-rf"]);
    let force = has_flag(args, &["-f", "-rf"]);
    let targets = operands(args);
    if targets.is_empty() {
        return CommandResult::error("rm: missing operand");
    }

    let mut errors = Vec::new();
    for target in &targets {
        let path = state.resolve_path(target);
        if path == state.workspace_root() {
            errors.push(format!("rm: {target}: refusing to remove workspace root"));
            continue;
        }
        let removed = if path.is_dir() {
            if !recursive {
                errors.push(format!("rm: {target}: is a directory"));
                continue;
            }
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound && force => {}
            Err(e) => errors.push(format!("rm: {target}: {}", describe_io(&e))),
        }
    }
    CommandResult::aggregate(errors, targets.len())
}

// -- rmdir ----------------------------------------------------------------

fn builtin_rmdir(state: &SessionState, args: &[String]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("rmdir: missing operand");
    }

    let mut errors = Vec::new();
    for dir in args {
        let path = state.resolve_path(dir);
        if path == state.workspace_root() {
            errors.push(format!("rmdir: {dir}: refusing to remove workspace root"));
            continue;
        }
        if let Err(e) = fs::remove_dir(&path) {
            errors.push(format!("rmdir: {dir}: {}", describe_io(&e)));
        }
    }
    CommandResult::aggregate(errors, args.len())
}

// -- cp -------------------------------------------------------------------

fn builtin_cp(state: &SessionState, args: &[String]) -> CommandResult {
    if args.len() < 2 {
        return CommandResult::error("cp: missing file operand");
    }
    let recursive = has_flag(args, &["-r"]);
    let Some((dest_arg, rest)) = args.split_last() else {
        return CommandResult::error("cp: missing file operand");
    };
    let sources = operands(rest);
    if sources.is_empty() {
        return CommandResult::error("cp: missing file operand");
    }

    let dest = state.resolve_path(dest_arg);
    let mut errors = Vec::new();
    for source in &sources {
        let src = state.resolve_path(source);
        let outcome = if src.is_dir() {
            if !recursive {
                errors.push(format!("cp: {source}: is a directory (not copied)"));
                continue;
            }
            let target = landing_path(&src, &dest);
            if target.starts_with(&src) {
                errors.push(format!("cp: {source}: cannot copy a directory into itself"));
                continue;
            }
            copy_tree(&src, &target)
        } else {
            let target = landing_path(&src, &dest);
            if same_file(&src, &target) {
                errors.push(format!(
                    "cp: {source}: '{source}' and '{dest_arg}' are the same file"
                ));
                continue;
            }
            copy_file(&src, &target)
        };
        if let Err(e) = outcome {
            errors.push(format!("cp: {source}: {}", describe_io(&e)));
        }
    }
    CommandResult::aggregate(errors, sources.len())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Copy contents, permissions and modification time of a single file.
fn copy_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::copy(src, dst)?;
    let modified = fs::metadata(src)?.modified()?;
    // A read-only source yields a read-only copy; fall back to a plain open.
    let copy = File::options()
        .write(true)
        .open(dst)
        .or_else(|_| File::open(dst))?;
    copy.set_modified(modified)
}

/// Copy a directory tree into `dst`, which must not exist yet.
fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    if dst.exists() {
        return Err(ErrorKind::AlreadyExists.into());
    }
    fs::create_dir(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        if from.is_dir() {
            copy_tree(&from, &to)?;
        } else {
            copy_file(&from, &to)?;
        }
    }
    fs::set_permissions(dst, fs::metadata(src)?.permissions())
}

// -- mv -------------------------------------------------------------------

fn builtin_mv(state: &SessionState, args: &[String]) -> CommandResult {
    let Some((dest_arg, sources)) = args.split_last() else {
        return CommandResult::error("mv: missing file operand");
    };
    if sources.is_empty() {
        return CommandResult::error("mv: missing file operand");
    }

    let dest = state.resolve_path(dest_arg);
    let mut errors = Vec::new();
    for source in sources {
        let src = state.resolve_path(source);
        if src == state.workspace_root() {
            errors.push(format!("mv: {source}: refusing to move workspace root"));
            continue;
        }
        if let Err(e) = fs::rename(&src, landing_path(&src, &dest)) {
            errors.push(format!("mv: {source}: {}", describe_io(&e)));
        }
    }
    CommandResult::aggregate(errors, sources.len())
}

// -- cat ------------------------------------------------------------------

fn builtin_cat(state: &SessionState, args: &[String]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("cat: missing file operand");
    }

    let mut output = String::new();
    let mut errors = Vec::new();
    for file in args {
        let path = state.resolve_path(file);
        if path.is_dir() {
            errors.push(format!("cat: {file}: Is a directory"));
            continue;
        }
        match fs::read(&path) {
            Ok(bytes) => output.push_str(&String::from_utf8_lossy(&bytes)),
            Err(e) => errors.push(format!("cat: {file}: {}", describe_io(&e))),
        }
    }
    CommandResult::strict(output, errors)
}

// -- touch ----------------------------------------------------------------

fn builtin_touch(state: &SessionState, args: &[String]) -> CommandResult {
    if args.is_empty() {
        return CommandResult::error("touch: missing file operand");
    }

    let mut errors = Vec::new();
    for file in args {
        let path = state.resolve_path(file);
        let opened = if path.is_dir() {
            File::open(&path)
        } else {
            File::options().create(true).append(true).open(&path)
        };
        let touched = opened.and_then(|f| f.set_modified(SystemTime::now()));
        if let Err(e) = touched {
            errors.push(format!("touch: {file}: {}", describe_io(&e)));
        }
    }
    CommandResult::strict(String::new(), errors)
}

// -- echo -----------------------------------------------------------------

fn builtin_echo(args: &[String]) -> CommandResult {
    CommandResult::success(args.join(" "))
}

// -- history --------------------------------------------------------------

fn builtin_history(state: &SessionState) -> CommandResult {
    let output = state
        .history
        .recent(HISTORY_DISPLAY_LIMIT)
        .enumerate()
        .map(|(i, entry)| format!("{:>4}  {entry}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    CommandResult::success(output)
}

// -- sysinfo --------------------------------------------------------------

fn builtin_sysinfo(state: &SessionState) -> CommandResult {
    let output = format!(
        "System Information (Web Environment):
================================================
Platform: {os} ({family})
Architecture: {arch}

Workspace: {workspace} (ephemeral)
Interpreter: codepod-terminal {version}

Boot Time: {now}

Note: This is a sandboxed web terminal. File operations are
restricted to the workspace directory for security.
",
        os = std::env::consts::OS,
        family = std::env::consts::FAMILY,
        arch = std::env::consts::ARCH,
        workspace = state.workspace_root().display(),
        version = env!("CARGO_PKG_VERSION"),
        now = Local::now().format("%Y-%m-%d %H:%M:%S"),
    );
    CommandResult::success(output)
}

// -- ps -------------------------------------------------------------------

fn builtin_ps() -> CommandResult {
    CommandResult::success("Process listing restricted in web environment for security.")
}

// -- help -----------------------------------------------------------------

const HELP_TEXT: &str = "Available Commands (Web Terminal):
================================================

File Operations:
  ls [options] [path]    List directory contents (-l for long format, -a for hidden files)
  cd [path]              Change directory (within workspace)
  pwd                    Print working directory
  mkdir [-p] <dirs>      Create directories (-p for recursive)
  rm [-rf] <files>       Remove files/directories (-r recursive, -f force)
  rmdir <dirs>           Remove empty directories
  cp [-r] <src> <dest>   Copy files/directories (-r for recursive)
  mv <src> <dest>        Move/rename files/directories
  cat <files>            Display file contents
  touch <files>          Create empty files or update timestamps
  echo <text>            Display text

System Operations:
  sysinfo / system       Show system information
  ps                     Show processes (restricted)
  history                Show command history
  clear                  Clear screen
  help                   Show this help message

Natural Language:
  nl: <command>          Execute natural language command
  natural: <command>     Execute natural language command

Examples of natural language commands:
  nl: create a folder called test
  nl: move file.txt to the documents folder
  nl: show me all files in this directory
  nl: delete temp.txt

Aliases:
  ll                     ls -la
  la                     ls -a

Note: This is a sandboxed web terminal. System commands and file
operations outside the workspace are restricted for security.
";

fn builtin_help() -> CommandResult {
    CommandResult::success(HELP_TEXT)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
