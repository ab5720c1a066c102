//! Interactive note session.
//!
//! # Responsibility
//! - Drive `quicknote_core::NoteStore` from line commands on stdin.
//! - Print notifications and re-render the list when the store reports a change.
//!
//! Usage: `quicknote [--db <path>] [--log-dir <abs dir>] [--log-level <level>]`

use clap::Parser;
use log::debug;
use quicknote_core::db::{open_db, open_db_in_memory};
use quicknote_core::{
    default_log_level, init_logging, KeyValuePersistence, LogNotificationSink, NoteStore,
    PersistenceAdapter, RecordingNotificationSink, SqliteKeyValueStore, StoreEvent, StoreMode,
    PREVIEW_MAX_CHARS,
};
use std::cell::Cell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

const HELP: &str = "commands:
  save <text>    save a new note
  input <text>   set the pending input
  submit         save the pending input as a note
  list           show all notes
  edit <n>       start editing note n
  draft <text>   replace the edit draft
  commit         save the edited note
  status         show session state
  help           show this help
  quit           end the session
use \\n inside <text> for a line break";

/// Logs every notification and keeps it until the session prints it.
type SessionSink = (LogNotificationSink, RecordingNotificationSink);

/// Interactive note session over a SQLite-backed note list.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(name = "quicknote", version)]
struct Options {
    /// Notes database file; an in-memory database is used when omitted.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,
    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Save(String),
    Input(String),
    Submit,
    List,
    Edit(usize),
    Draft(String),
    Commit,
    Status,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn main() -> ExitCode {
    let options = Options::parse();

    if let Some(log_dir) = options.log_dir.as_deref() {
        let level = options
            .log_level
            .as_deref()
            .unwrap_or(default_log_level());
        if let Err(message) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {message}");
        }
    }

    let conn = match &options.db {
        Some(path) => open_db(path),
        None => open_db_in_memory(),
    };
    let conn = match conn {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open notes database: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut store = NoteStore::initialize(
        KeyValuePersistence::new(SqliteKeyValueStore::new(&conn)),
        (LogNotificationSink, RecordingNotificationSink::new()),
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_session(&mut store, stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=session_end module=cli status=error error={err}");
            eprintln!("session aborted: {err}");
            ExitCode::FAILURE
        }
    }
}

fn parse_command(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let (name, rest) = match line.trim_start().split_once(' ') {
        Some((name, rest)) => (name, rest),
        None => (line.trim(), ""),
    };
    match name {
        "" => Command::Empty,
        "save" => Command::Save(unescape(rest)),
        "input" => Command::Input(unescape(rest)),
        "submit" => Command::Submit,
        "list" => Command::List,
        "edit" => match rest.trim().parse::<usize>() {
            Ok(number) if number > 0 => Command::Edit(number - 1),
            _ => Command::Invalid(format!("expected a note number, got `{}`", rest.trim())),
        },
        "draft" => Command::Draft(unescape(rest)),
        "commit" => Command::Commit,
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command `{other}`; try `help`")),
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn run_session<P, R, W>(
    store: &mut NoteStore<P, SessionSink>,
    input: R,
    mut out: W,
) -> io::Result<()>
where
    P: PersistenceAdapter,
    R: BufRead,
    W: Write,
{
    let list_changed = Rc::new(Cell::new(false));
    let flag = Rc::clone(&list_changed);
    let subscription = store.subscribe(move |event: &StoreEvent| {
        if matches!(
            event,
            StoreEvent::NoteCreated { .. } | StoreEvent::NoteUpdated { .. }
        ) {
            flag.set(true);
        }
    });

    writeln!(out, "{} note(s) loaded; type `help` for commands", store.len())?;
    render_list(store, &mut out)?;

    for line in input.lines() {
        let line = line?;
        let command = parse_command(&line);
        if command == Command::Quit {
            break;
        }
        dispatch(store, command, &mut out)?;

        for notification in store.sink_mut().1.drain() {
            let prefix = if notification.is_error() { "error" } else { "ok" };
            writeln!(out, "{prefix}: {}", notification.message())?;
        }
        if list_changed.replace(false) {
            render_list(store, &mut out)?;
        }
    }

    store.unsubscribe(subscription);
    Ok(())
}

fn dispatch<P, W>(
    store: &mut NoteStore<P, SessionSink>,
    command: Command,
    out: &mut W,
) -> io::Result<()>
where
    P: PersistenceAdapter,
    W: Write,
{
    // The user sees store failures through the sink; the log keeps the cause.
    match command {
        Command::Save(text) => {
            if let Err(err) = store.create(text) {
                debug!("event=command module=cli command=save status=error error={err}");
            }
        }
        Command::Input(text) => store.set_input(text),
        Command::Submit => {
            if let Err(err) = store.submit_input() {
                debug!("event=command module=cli command=submit status=error error={err}");
            }
        }
        Command::List => render_list(store, out)?,
        Command::Edit(index) => match store.begin_edit(index) {
            Ok(()) => render_draft(store, out)?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        Command::Draft(text) => {
            if store.mode() == StoreMode::Idle {
                writeln!(out, "error: no note is being edited")?;
            }
            store.update_draft(text);
        }
        Command::Commit => {
            if let Err(err) = store.commit_edit() {
                debug!("event=command module=cli command=commit status=error error={err}");
            }
        }
        Command::Status => {
            let editing = match store.edit_slot() {
                Some(slot) => format!("editing note {}", slot.index + 1),
                None => "idle".to_string(),
            };
            writeln!(
                out,
                "{} note(s), {editing}, pending input: {:?}",
                store.len(),
                store.input()
            )?;
        }
        Command::Help => writeln!(out, "{HELP}")?,
        Command::Invalid(message) => writeln!(out, "error: {message}")?,
        Command::Empty | Command::Quit => {}
    }
    Ok(())
}

fn render_list<P, W>(
    store: &NoteStore<P, SessionSink>,
    out: &mut W,
) -> io::Result<()>
where
    P: PersistenceAdapter,
    W: Write,
{
    for (position, note) in store.notes().iter().enumerate() {
        writeln!(out, "{:>3}. {}", position + 1, note.preview(PREVIEW_MAX_CHARS))?;
    }
    Ok(())
}

fn render_draft<P, W>(
    store: &NoteStore<P, SessionSink>,
    out: &mut W,
) -> io::Result<()>
where
    P: PersistenceAdapter,
    W: Write,
{
    if let Some(slot) = store.edit_slot() {
        writeln!(out, "editing note {}:", slot.index + 1)?;
        for line in slot.draft.lines() {
            writeln!(out, "  | {line}")?;
        }
    }
    Ok(())
}
