//! Stdio front-end: one JSON request per input line, one JSON response per
//! output line. Logs go to stderr.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use codepod_terminal::config::{
    DEFAULT_HISTORY_LIMIT, DEFAULT_WORKSPACE, HISTORY_LIMIT_ENV, WORKSPACE_ENV,
};
use codepod_terminal::{complete, execute, CommandResult, SessionState, TerminalConfig};

#[derive(Debug, Parser)]
#[command(name = "codepod-terminal", about = "Workspace-confined command interpreter over stdio")]
struct Args {
    /// Directory every command is confined to (created if missing).
    #[arg(long, env = WORKSPACE_ENV, default_value = DEFAULT_WORKSPACE)]
    workspace: PathBuf,

    /// Number of commands kept in the session history.
    #[arg(long, env = HISTORY_LIMIT_ENV, default_value_t = DEFAULT_HISTORY_LIMIT)]
    history_limit: usize,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Request {
    Execute { command: String },
    Complete { partial_command: String },
    History,
}

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Response {
    CommandResult {
        #[serde(flatten)]
        result: CommandResult,
        cwd: String,
    },
    CompletionsResult {
        completions: Vec<String>,
    },
    HistoryResult {
        history: Vec<String>,
    },
    Error {
        message: String,
    },
}

fn handle(state: &mut SessionState, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            return Response::Error {
                message: format!("invalid request: {e}"),
            }
        }
    };
    match request {
        Request::Execute { command } => {
            let result = execute(state, &command);
            Response::CommandResult {
                result,
                cwd: state.virtual_cwd(),
            }
        }
        Request::Complete { partial_command } => Response::CompletionsResult {
            completions: complete(state, &partial_command),
        },
        Request::History => Response::HistoryResult {
            history: state.history_snapshot(),
        },
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = TerminalConfig::default()
        .with_workspace_root(&args.workspace)
        .with_history_limit(args.history_limit.max(1));
    let mut state = SessionState::new(&config)
        .with_context(|| format!("opening workspace {}", args.workspace.display()))?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line.context("reading request")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle(&mut state, &line);
        serde_json::to_writer(&mut stdout, &response).context("encoding response")?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }

    tracing::info!("stdin closed, ending session");
    Ok(())
}
