//! End-to-end checks through the public `execute` / `complete` API.

use codepod_terminal::{complete, execute, SessionState, TerminalConfig, CLEAR_SCREEN};
use tempfile::TempDir;

fn open() -> (TempDir, SessionState) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = TerminalConfig::default().with_workspace_root(dir.path());
    let state = SessionState::new(&config).expect("session");
    (dir, state)
}

fn run(state: &mut SessionState, line: &str) -> codepod_terminal::CommandResult {
    execute(state, line)
}

#[test]
fn nested_mkdir_cd_pwd() {
    let (_dir, mut state) = open();
    assert!(run(&mut state, "mkdir -p a/b/c").success);
    assert!(run(&mut state, "cd a/b/c").success);
    assert_eq!(run(&mut state, "pwd").output, "/workspace/a/b/c");
    assert!(run(&mut state, "cd ../..").success);
    assert_eq!(run(&mut state, "pwd").output, "/workspace/a");
}

#[test]
fn touch_then_cat_is_empty() {
    let (_dir, mut state) = open();
    assert!(run(&mut state, "touch f.txt").success);
    let r = run(&mut state, "cat f.txt");
    assert!(r.success);
    assert_eq!(r.output, "");
}

#[test]
fn rm_missing_with_and_without_force() {
    let (_dir, mut state) = open();
    let r = run(&mut state, "rm nofile.txt");
    assert!(!r.success);
    assert!(r.error.contains("No such file or directory"));
    assert!(run(&mut state, "rm -f nofile.txt").success);
}

#[test]
fn duplicate_mkdir_reports_file_exists() {
    let (_dir, mut state) = open();
    assert!(run(&mut state, "mkdir dup").success);
    let r = run(&mut state, "mkdir dup");
    assert!(!r.success);
    assert!(r.error.contains("File exists"));
}

#[test]
fn intent_matches_plain_mkdir() {
    let (dir, mut state) = open();
    let r = run(&mut state, "nl: create a folder called demo");
    assert!(r.success, "{}", r.error);
    assert!(dir.path().join("demo").is_dir());
    assert_eq!(run(&mut state, "ls").output, "demo/");
}

#[test]
fn history_is_bounded_and_collapses_repeats() {
    let (_dir, mut state) = open();
    for i in 0..1005 {
        run(&mut state, &format!("echo {i}"));
        run(&mut state, &format!("echo {i}"));
    }
    let history = state.history_snapshot();
    assert_eq!(history.len(), 1000);
    assert_eq!(history.first().map(String::as_str), Some("echo 5"));
    assert_eq!(history.last().map(String::as_str), Some("echo 1004"));

    let r = run(&mut state, "history");
    let lines: Vec<&str> = r.output.lines().collect();
    assert_eq!(lines.len(), 50);
    assert_eq!(lines[0], "   1  echo 956");
    assert_eq!(lines[49], "  50  history");
}

#[test]
fn failed_cd_leaves_directory_unchanged() {
    let (_dir, mut state) = open();
    run(&mut state, "mkdir here");
    run(&mut state, "cd here");
    let before = state.current_dir().to_path_buf();
    assert!(!run(&mut state, "cd missing").success);
    assert_eq!(state.current_dir(), before);
}

#[test]
fn completion_suggests_commands_and_caps_paths() {
    let (_dir, mut state) = open();
    assert!(complete(&state, "m").contains(&"mkdir".to_string()));
    for i in 0..12 {
        run(&mut state, &format!("touch item{i}"));
    }
    assert_eq!(complete(&state, "cat item").len(), 10);
}

#[test]
fn escaping_paths_stay_inside_workspace() {
    let (dir, mut state) = open();
    assert!(run(&mut state, "touch /etc/escape.txt").success);
    assert!(dir.path().join("escape.txt").is_file());

    assert!(run(&mut state, "cd ../../..").success);
    assert_eq!(run(&mut state, "pwd").output, "/workspace");
}

#[test]
fn clear_is_a_sentinel() {
    let (_dir, mut state) = open();
    assert_eq!(run(&mut state, "clear").output, CLEAR_SCREEN);
}

#[test]
fn aliases_expand_to_listings() {
    let (_dir, mut state) = open();
    run(&mut state, "touch .hidden");
    run(&mut state, "touch visible");
    let r = run(&mut state, "la");
    assert_eq!(r.output, ".hidden  visible");
    let r = run(&mut state, "ll");
    assert_eq!(r.output.lines().count(), 2);
}
