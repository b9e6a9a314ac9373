//! Line-driven editor harness.
//!
//! # Responsibility
//! - Drive one `EditorSession` from stdin commands.
//! - Start file logging when `JIUTA_LOG_DIR` is set.
//!
//! Rejected commands print an error and the loop continues.

mod command;
mod render;

use command::{parse_line, Command, CommandError, HELP};
use jiuta_core::{
    core_version, init_logging, DropOutcome, EditError, EditorConfig, EditorSession,
    SymbolModifiers,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::process::ExitCode;

/// Failure of a single command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CliError {
    Command(CommandError),
    Edit(EditError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Command(err) => write!(f, "{err}"),
            Self::Edit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        Self::Command(err)
    }
}

impl From<EditError> for CliError {
    fn from(err: EditError) -> Self {
        Self::Edit(err)
    }
}

fn main() -> ExitCode {
    let config = match EditorConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(log_dir) = config.log_dir.as_deref() {
        if let Err(err) = init_logging(config.log_level, log_dir) {
            eprintln!("file logging disabled: {err}");
        }
    }

    let mut session = EditorSession::from_defaults(&config.score);
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );
    println!("jiuta {} (type `help`)", core_version());

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("read error: {err}");
                return ExitCode::FAILURE;
            }
        };
        match run_line(&mut session, &line) {
            Ok(Some(output)) => println!("{output}"),
            Ok(None) => {}
            Err(err) => {
                warn!("event=command module=cli status=rejected error={err}");
                println!("error: {err}");
            }
        }
    }
    info!("event=cli_exit module=cli status=ok");
    ExitCode::SUCCESS
}

fn run_line(session: &mut EditorSession, line: &str) -> Result<Option<String>, CliError> {
    match parse_line(line)? {
        Some(command) => execute(session, command).map(Some),
        None => Ok(None),
    }
}

fn execute(session: &mut EditorSession, command: Command) -> Result<String, CliError> {
    let output = match command {
        Command::Show => render::render_session(session),
        Command::Help => HELP.to_string(),
        Command::AddColumn => {
            session.add_column();
            format!("columns: {}", session.score().columns().len())
        }
        Command::DeleteColumn(index) => {
            let column_id = index
                .checked_sub(1)
                .and_then(|offset| session.score().columns().get(offset))
                .map(|column| column.id())
                .ok_or(CommandError::UnknownColumn(index))?;
            session.delete_column(column_id)?;
            format!("columns: {}", session.score().columns().len())
        }
        Command::Select(address) => {
            let location = address.resolve(session.score())?;
            session.score().resolve_slot(&location)?;
            session.set_active_cell(location);
            active_line(session)
        }
        Command::Deselect => {
            session.clear_active_cell();
            active_line(session)
        }
        Command::Clear => {
            let removed = session.clear_active_slot()?;
            format!("removed {}", removed.label())
        }
        Command::Palette(base) => {
            match base {
                Some(base) => session.place_at_active_cell(&base)?,
                None => session.place_selected_at_active_cell()?,
            };
            active_line(session)
        }
        Command::SelectSymbol(base) => {
            session.select_symbol(&base)?;
            render::render_palette(session)
        }
        Command::Ornament(mark) => {
            session.select_ornament(mark.as_deref())?;
            render::render_palette(session)
        }
        Command::Accidental(mark) => {
            session.select_accidental(mark.as_deref())?;
            render::render_palette(session)
        }
        Command::Place {
            at,
            base,
            ornament,
            accidental,
        } => {
            let location = at.resolve(session.score())?;
            let modifiers = SymbolModifiers {
                ornament,
                accidental,
            };
            let outcome = session.place_at(&location, &base, modifiers)?;
            placed_line(&base, at, outcome.displaced.len())
        }
        Command::Remove(address) => {
            let location = address.resolve(session.score())?;
            let removed = session.remove_at(&location)?;
            format!("removed {} at {address}", removed.label())
        }
        Command::Split(address) => {
            let location = address.resolve(session.score())?;
            session.split_slot(&location)?;
            format!("split {address}")
        }
        Command::Merge(address) => {
            let location = address.resolve(session.score())?;
            let outcome = session.merge_slot(&location)?;
            match outcome.discarded {
                Some(_) => format!("merged {address}, second sixteenth discarded"),
                None => format!("merged {address}"),
            }
        }
        Command::Move { from, to } => {
            let source = from.resolve(session.score())?;
            let target = to.resolve(session.score())?;
            let symbol_id = session
                .score()
                .symbol_at(&source)
                .map(|symbol| symbol.id())
                .ok_or(CommandError::EmptySlot(from))?;
            let payload = EditorSession::existing_drag_payload(symbol_id);
            let outcome = session.drop(&payload, &target)?;
            drop_line(&outcome, to)
        }
        Command::Drag { base, to } => {
            let target = to.resolve(session.score())?;
            let payload = match base {
                Some(base) => session.palette_drag_payload(&base),
                None => session.selected_drag_payload(),
            };
            let outcome = session.drop(&payload, &target)?;
            drop_line(&outcome, to)
        }
        Command::Instrument(instrument) => {
            session.set_instrument(instrument);
            render::render_palette(session)
        }
        Command::Tempo(tempo) => format!("tempo {}", session.set_tempo(tempo)),
        Command::Title(title) => {
            session.set_title(title);
            format!("title {}", session.score().display_title())
        }
        Command::Sakura => {
            session.load_sakura_opening()?;
            render::render_session(session)
        }
    };
    Ok(output)
}

fn active_line(session: &EditorSession) -> String {
    format!(
        "active: {}",
        session
            .active_cell_label()
            .unwrap_or_else(|| "none".to_string())
    )
}

fn placed_line(base: &str, at: command::Address, displaced: usize) -> String {
    if displaced == 0 {
        format!("placed {base} at {at}")
    } else {
        format!("placed {base} at {at}, replaced {displaced}")
    }
}

fn drop_line(outcome: &DropOutcome, to: command::Address) -> String {
    let verb = match outcome {
        DropOutcome::Placed(_) => "placed",
        DropOutcome::Moved(_) => "moved",
    };
    match outcome.displaced().len() {
        0 => format!("{verb} at {to}"),
        replaced => format!("{verb} at {to}, replaced {replaced}"),
    }
}
