//! Terminal host for the task list.
//!
//! # Responsibility
//! - Parse startup flags and open the SQLite-backed store.
//! - Run a line-oriented event loop: every line is one user action.
//! - Print the full view model after each action.

use clap::Parser;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tasklist_core::db::open_db;
use tasklist_core::{
    default_log_level, init_logging, SqliteKeyValueStore, StoreError, TaskController, TaskStore,
    TaskView, ViewModel,
};

const DEFAULT_DB_FILE_NAME: &str = "tasklist.sqlite3";
const HELP_TEXT: &str = "\
  <text>   add a task
  //text   add a task starting with `/`
  /t N     toggle task N
  /d N     delete task N
  /c       clear completed tasks
  /h       show this help
  /q       quit";

#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "Keep a short list of things to do")]
struct Args {
    /// SQLite database file holding the task list.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,
}

/// Fatal session errors.
#[derive(Debug)]
enum CliError {
    Store(StoreError),
    Input(io::Error),
    Output(io::Error),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "cannot save tasks: {err}"),
            Self::Input(err) => write!(f, "cannot read input: {err}"),
            Self::Output(err) => write!(f, "cannot write output: {err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Input(err) | Self::Output(err) => Some(err),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Submit(String),
    Toggle(usize),
    Delete(usize),
    ClearCompleted,
    Help,
    Quit,
    Invalid(String),
}

fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Submit(line.to_string());
    };
    if rest.starts_with('/') {
        return Command::Submit(rest.to_string());
    }

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let index = parts.next().map(str::parse::<usize>);
    match (name, index) {
        ("t", Some(Ok(n))) if n > 0 => Command::Toggle(n),
        ("d", Some(Ok(n))) if n > 0 => Command::Delete(n),
        ("t" | "d", _) => Command::Invalid(format!("`/{name}` needs a row number, e.g. /{name} 1")),
        ("c", None) => Command::ClearCompleted,
        ("h", None) => Command::Help,
        ("q", None) => Command::Quit,
        _ => Command::Invalid(format!("unknown command `{trimmed}`; type /h for help")),
    }
}

/// Writes each render to stdout and remembers it for row lookups.
///
/// The first write failure is kept until the event loop collects it.
struct TerminalView<W: Write> {
    out: W,
    last: Option<ViewModel>,
    write_error: Option<io::Error>,
}

impl<W: Write> TerminalView<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            last: None,
            write_error: None,
        }
    }

    fn emit(&mut self, text: &str) {
        if self.write_error.is_some() {
            return;
        }
        let written = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            warn!("event=cli_write module=cli status=error error={err}");
            self.write_error = Some(err);
        }
    }

    fn take_write_error(&mut self) -> Option<io::Error> {
        self.write_error.take()
    }

    fn row_id(&self, number: usize) -> Option<tasklist_core::TaskId> {
        self.last
            .as_ref()
            .and_then(|model| model.rows.get(number - 1))
            .map(|row| row.id.clone())
    }

    fn note(&mut self, message: &str) {
        self.emit(&format!("{message}\n"));
    }
}

impl<W: Write> TaskView for TerminalView<W> {
    fn render(&mut self, model: &ViewModel) {
        let mut screen = String::new();
        for (index, row) in model.rows.iter().enumerate() {
            let text = if row.completed {
                format!("~{}~", row.text)
            } else {
                row.text.clone()
            };
            screen.push_str(&format!(
                "{:>3}. [{}] {}  {}\n",
                index + 1,
                row.toggle.glyph,
                text,
                row.delete.glyph
            ));
        }
        screen.push_str(&format!("-- {} --\n", model.count_text));
        self.emit(&screen);
        self.last = Some(model.clone());
    }

    fn clear_input(&mut self) {}

    fn focus_input(&mut self) {
        self.emit("> ");
    }
}

fn run<R: BufRead, W: Write>(
    input: R,
    app: &mut TaskController<SqliteKeyValueStore<'_>, TerminalView<W>>,
) -> Result<(), CliError> {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            // The undecodable line is already consumed; keep reading.
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                warn!("event=cli_read module=cli status=skipped reason=invalid_utf8");
                app.view_mut().note("skipped a line that is not valid UTF-8");
                continue;
            }
            Err(err) => return Err(CliError::Input(err)),
        };
        match parse_command(&line) {
            Command::Submit(text) => app.submit(&text)?,
            Command::Toggle(n) => match app.view().row_id(n) {
                Some(id) => app.toggle(&id)?,
                None => app.view_mut().note(&format!("no task number {n}")),
            },
            Command::Delete(n) => match app.view().row_id(n) {
                Some(id) => app.delete(&id)?,
                None => app.view_mut().note(&format!("no task number {n}")),
            },
            Command::ClearCompleted => app.clear_completed()?,
            Command::Help => app.view_mut().note(HELP_TEXT),
            Command::Quit => break,
            Command::Invalid(message) => app.view_mut().note(&message),
        }
        if let Some(err) = app.view_mut().take_write_error() {
            return Err(CliError::Output(err));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = args.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("tasklist: logging disabled: {err}");
        }
    }

    let db_path = args
        .db
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("tasklist: cannot open `{}`: {err}", db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let store = TaskStore::new(SqliteKeyValueStore::new(&conn));
    let mut app = match TaskController::start(store, TerminalView::new(io::stdout())) {
        Ok(app) => app,
        Err(err) => {
            error!("event=cli_start module=cli status=error error={err}");
            eprintln!("tasklist: cannot load tasks: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!("event=cli_start module=cli status=ok db={}", db_path.display());
    match run(io::stdin().lock(), &mut app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("tasklist: {err}");
            ExitCode::FAILURE
        }
    }
}
