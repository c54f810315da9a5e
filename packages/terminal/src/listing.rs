//! `ls` rendering: short multi-column listings and long rows.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::control::{describe_io, CommandResult, TerminalError};
use crate::state::SessionState;

/// Width the short listing packs its columns into.
pub const LINE_WIDTH: usize = 80;

/// Row printed for an entry whose metadata cannot be read.
const UNREADABLE_ROW: &str = "?????????? ? ?    ?    ?            ?";

#[derive(Debug, Default, Clone, Copy)]
struct Options {
    long: bool,
    all: bool,
}

fn parse_flags(args: &[String]) -> Options {
    let mut opts = Options::default();
    for arg in args {
        match arg.as_str() {
            "-l" => opts.long = true,
            "-a" => opts.all = true,
            "-la" | "-al" => {
                opts.long = true;
                opts.all = true;
            }
            _ => {}
        }
    }
    opts
}

pub fn ls(state: &SessionState, args: &[String]) -> Result<CommandResult, TerminalError> {
    let opts = parse_flags(args);
    let operand = args.iter().find(|a| !a.starts_with('-'));
    let target = match operand {
        Some(arg) => state.resolve_path(arg),
        None => state.current_dir().to_path_buf(),
    };
    let shown = operand.map(String::as_str).unwrap_or(".");

    if !target.exists() {
        return Ok(CommandResult::error(format!(
            "ls: {shown}: No such file or directory"
        )));
    }

    if target.is_file() {
        let name = file_name(&target);
        if !opts.long {
            return Ok(CommandResult::success(name));
        }
        let row = match fs::metadata(&target) {
            Ok(meta) => long_row(false, meta.len(), meta.modified().ok(), &name),
            Err(e) => return Ok(CommandResult::error(format!("ls: {}", describe_io(&e)))),
        };
        return Ok(CommandResult::success(row));
    }

    let entries = match fs::read_dir(&target) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Ok(CommandResult::error("ls: Permission denied"));
        }
        Err(e) => return Ok(CommandResult::error(format!("ls: {}", describe_io(&e)))),
    };

    let mut items = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TerminalError::io("ls: reading directory entry", e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !opts.all && name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if opts.long {
            items.push(match fs::metadata(&path) {
                Ok(meta) => long_row(meta.is_dir(), meta.len(), meta.modified().ok(), &name),
                Err(_) => format!("{UNREADABLE_ROW} {name}"),
            });
        } else if path.is_dir() {
            items.push(format!("{name}/"));
        } else {
            items.push(name);
        }
    }

    items.sort();
    let output = if opts.long {
        items.join("\n")
    } else {
        pack_columns(&items, LINE_WIDTH)
    };
    Ok(CommandResult::success(output))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One `ls -l` row. Ownership and permission bits are fixed placeholders.
fn long_row(is_dir: bool, size: u64, modified: Option<SystemTime>, name: &str) -> String {
    let perms = if is_dir { "drwxr-xr-x" } else { "-rw-r--r--" };
    format!(
        "{perms} 1 user user {size:>8} {} {name}",
        format_mtime(modified)
    )
}

fn format_mtime(modified: Option<SystemTime>) -> String {
    match modified {
        Some(time) => DateTime::<Local>::from(time).format("%b %d %H:%M").to_string(),
        None => "            ".to_string(),
    }
}

/// Pack already-sorted names into left-justified columns, as many per row as
/// fit in `width`.
pub fn pack_columns(items: &[String], width: usize) -> String {
    let max_len = items.iter().map(|s| s.chars().count()).max().unwrap_or(0);
    if items.is_empty() {
        return String::new();
    }
    let cols = (width / (max_len + 2)).max(1);
    items
        .chunks(cols)
        .map(|row| {
            row.iter()
                .map(|item| format!("{item:<max_len$}"))
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{make_args, TempWorkspace};

    fn run(state: &SessionState, args: &[&str]) -> CommandResult {
        ls(state, &make_args(args)).expect("ls fault")
    }

    #[test]
    fn short_listing_sorts_and_marks_dirs() {
        let ws = TempWorkspace::new()
            .with_file("b.txt", b"")
            .with_file("a.txt", b"")
            .with_dir("docs");
        let state = ws.session();
        let r = run(&state, &[]);
        assert!(r.success);
        assert_eq!(r.output, "a.txt  b.txt  docs/");
    }

    #[test]
    fn hidden_entries_need_dash_a() {
        let ws = TempWorkspace::new().with_file(".secret", b"").with_file("shown", b"");
        let state = ws.session();
        assert_eq!(run(&state, &[]).output, "shown");
        assert_eq!(run(&state, &["-a"]).output, ".secret  shown  ");
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let ws = TempWorkspace::new();
        let state = ws.session();
        let r = run(&state, &["-la"]);
        assert!(r.success);
        assert_eq!(r.output, "");
    }

    #[test]
    fn missing_target_is_an_error() {
        let ws = TempWorkspace::new();
        let state = ws.session();
        let r = run(&state, &["-l", "ghost"]);
        assert!(!r.success);
        assert_eq!(r.error, "ls: ghost: No such file or directory");
    }

    #[test]
    fn file_target_prints_basename() {
        let ws = TempWorkspace::new().with_file("sub/notes.md", b"hello");
        let state = ws.session();
        assert_eq!(run(&state, &["sub/notes.md"]).output, "notes.md");

        let long = run(&state, &["-l", "sub/notes.md"]).output;
        assert!(long.starts_with("-rw-r--r-- 1 user user        5 "), "{long}");
        assert!(long.ends_with(" notes.md"));
    }

    #[test]
    fn long_rows_flag_directories() {
        let ws = TempWorkspace::new().with_dir("dir").with_file("file", b"abc");
        let state = ws.session();
        let r = run(&state, &["-l"]);
        let lines: Vec<&str> = r.output.lines().collect();
        assert_eq!(lines.len(), 2);
        // Sorted by the whole row, so "-rw..." precedes "drwx...".
        assert!(lines[0].starts_with("-rw-r--r-- 1 user user        3 "));
        assert!(lines[0].ends_with(" file"));
        assert!(lines[1].starts_with("drwxr-xr-x 1 user user "));
        assert!(lines[1].ends_with(" dir"));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_renders_placeholder_row() {
        let ws = TempWorkspace::new();
        std::os::unix::fs::symlink(ws.path("nowhere"), ws.path("broken")).unwrap();
        let state = ws.session();
        let r = run(&state, &["-l"]);
        assert!(r.success);
        assert_eq!(r.output, "?????????? ? ?    ?    ?            ? broken");
    }

    #[test]
    fn pack_columns_wraps_rows() {
        let items: Vec<String> = (0..5).map(|i| format!("{i:0>30}")).collect();
        let packed = pack_columns(&items, 80);
        let rows: Vec<&str> = packed.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 30 + 2 + 30);
    }

    #[test]
    fn pack_columns_pads_to_longest() {
        let items = vec!["a".to_string(), "bbb".to_string()];
        assert_eq!(pack_columns(&items, 80), "a    bbb");
    }
}
