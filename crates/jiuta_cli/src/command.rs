//! Line command grammar.
//!
//! # Responsibility
//! - Parse one stdin line into a `Command`.
//! - Resolve 1-based grid addresses against the current score.
//!
//! # Invariants
//! - Parsing is pure; nothing here touches the session.
//! - Address numbers are 1-based and the measure number counts inside its
//!   column, so `c2.m1` is the fifth measure of the score.

use jiuta_core::{Instrument, Location, Score, MEASURES_PER_COLUMN};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^c([1-9]\d*)\.m([1-9]\d*)\.b([1-9]\d*)\.s([1-9]\d*)(?:\.([1-9]\d*))?$")
        .expect("valid address regex")
});
static COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^c([1-9]\d*)$").expect("valid column regex"));

/// Grid address as typed, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address {
    pub column: usize,
    pub measure: usize,
    pub beat: usize,
    pub slot: usize,
    pub sub: Option<usize>,
}

impl Address {
    /// Maps the address onto stable ids of `score`.
    ///
    /// Beat, slot and sub-slot ranges are left to the core, which rejects
    /// them with its own addressing errors.
    pub fn resolve(&self, score: &Score) -> Result<Location, CommandError> {
        let column = score
            .columns()
            .get(self.zero_based(self.column)?)
            .ok_or(CommandError::UnknownColumn(self.column))?;
        let measure = column
            .measures()
            .get(self.zero_based(self.measure)?)
            .ok_or(CommandError::UnknownMeasure(self.measure))?;
        let location = Location::new(
            column.id(),
            measure.id(),
            self.zero_based(self.beat)?,
            self.zero_based(self.slot)?,
        );
        Ok(match self.sub {
            Some(sub) => location.with_sub(self.zero_based(sub)?),
            None => location,
        })
    }

    fn zero_based(&self, number: usize) -> Result<usize, CommandError> {
        number
            .checked_sub(1)
            .ok_or_else(|| CommandError::InvalidAddress(self.to_string()))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "c{}.m{}.b{}.s{}",
            self.column, self.measure, self.beat, self.slot
        )?;
        if let Some(sub) = self.sub {
            write!(f, ".{sub}")?;
        }
        Ok(())
    }
}

/// One parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Help,
    AddColumn,
    DeleteColumn(usize),
    Select(Address),
    Deselect,
    Clear,
    /// Palette click; `None` places the selected symbol.
    Palette(Option<String>),
    SelectSymbol(String),
    Ornament(Option<String>),
    Accidental(Option<String>),
    Place {
        at: Address,
        base: String,
        ornament: Option<String>,
        accidental: Option<String>,
    },
    Remove(Address),
    Split(Address),
    Merge(Address),
    Move {
        from: Address,
        to: Address,
    },
    /// Palette drag; `None` drags the selected symbol.
    Drag {
        base: Option<String>,
        to: Address,
    },
    Instrument(Instrument),
    Tempo(i64),
    Title(String),
    Sakura,
}

/// Command line parse or resolve failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    UnknownCommand(String),
    MissingArgument {
        command: String,
        argument: &'static str,
    },
    UnexpectedArgument(String),
    InvalidAddress(String),
    InvalidTempo(String),
    UnknownInstrument(String),
    UnknownColumn(usize),
    UnknownMeasure(usize),
    EmptySlot(Address),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(name) => {
                write!(f, "unknown command `{name}`; type `help` for the list")
            }
            Self::MissingArgument { command, argument } => {
                write!(f, "`{command}` needs <{argument}>")
            }
            Self::UnexpectedArgument(value) => write!(f, "unexpected argument `{value}`"),
            Self::InvalidAddress(value) => write!(
                f,
                "invalid address `{value}`; expected c<col>.m<measure>.b<beat>.s<slot>[.<sub>]"
            ),
            Self::InvalidTempo(value) => write!(f, "tempo `{value}` is not an integer"),
            Self::UnknownInstrument(value) => {
                write!(f, "unknown instrument `{value}`; expected koto|shamisen|shakuhachi")
            }
            Self::UnknownColumn(column) => write!(f, "column {column} does not exist"),
            Self::UnknownMeasure(measure) => write!(
                f,
                "measure {measure} does not exist; columns hold {MEASURES_PER_COLUMN}"
            ),
            Self::EmptySlot(address) => write!(f, "nothing to move at {address}"),
        }
    }
}

impl Error for CommandError {}

pub const HELP: &str = "\
commands:
  show                          print the score
  add-column                    append an empty column
  delete-column c<k>            delete column k
  select <addr>                 make <addr> the active cell
  deselect                      clear the active cell
  clear                         remove the symbol at the active cell
  symbol <base>                 select a palette symbol
  palette [base]                place <base> (or the selection) at the active cell
  ornament <mark|none>          select the ornament for palette placements
  accidental <mark|none>        select the accidental for palette placements
  place <addr> <base> [orn] [acc]
                                place a symbol; `-` skips a modifier
  remove <addr>                 remove a symbol
  split <addr>                  split an eighth into two sixteenths
  merge <addr>                  merge a split eighth
  move <addr> <addr>            drag an existing symbol
  drag [base] <addr>            drag a palette symbol (or the selection)
  instrument <name>             koto | shamisen | shakuhachi
  tempo <n>                     set tempo (clamped)
  title <text>                  set the title
  sakura                        load the Sakura opening
  help                          show this text
addresses: c<col>.m<measure>.b<beat>.s<slot>[.<sub>], 1-based";

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, rest)| (name, rest.trim()));
    let mut args = Args {
        command: name,
        tokens: rest.split_whitespace(),
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "add-column" => Command::AddColumn,
        "delete-column" => {
            let raw = args.required("column")?;
            Command::DeleteColumn(parse_column(raw)?)
        }
        "select" => Command::Select(parse_address(args.required("addr")?)?),
        "deselect" => Command::Deselect,
        "clear" => Command::Clear,
        "palette" => Command::Palette(args.optional().map(str::to_string)),
        "symbol" => Command::SelectSymbol(args.required("base")?.to_string()),
        "ornament" => Command::Ornament(parse_marker(args.required("mark")?)),
        "accidental" => Command::Accidental(parse_marker(args.required("mark")?)),
        "place" => Command::Place {
            at: parse_address(args.required("addr")?)?,
            base: args.required("base")?.to_string(),
            ornament: args.optional().and_then(parse_marker),
            accidental: args.optional().and_then(parse_marker),
        },
        "remove" => Command::Remove(parse_address(args.required("addr")?)?),
        "split" => Command::Split(parse_address(args.required("addr")?)?),
        "merge" => Command::Merge(parse_address(args.required("addr")?)?),
        "move" => Command::Move {
            from: parse_address(args.required("from")?)?,
            to: parse_address(args.required("to")?)?,
        },
        "drag" => {
            let first = args.required("addr")?;
            match args.optional() {
                Some(addr) => Command::Drag {
                    base: Some(first.to_string()),
                    to: parse_address(addr)?,
                },
                None => Command::Drag {
                    base: None,
                    to: parse_address(first)?,
                },
            }
        }
        "instrument" => {
            let raw = args.required("name")?;
            Command::Instrument(
                raw.parse::<Instrument>()
                    .map_err(|_| CommandError::UnknownInstrument(raw.to_string()))?,
            )
        }
        "tempo" => {
            let raw = args.required("n")?;
            Command::Tempo(
                raw.parse::<i64>()
                    .map_err(|_| CommandError::InvalidTempo(raw.to_string()))?,
            )
        }
        // Title keeps inner whitespace and may be empty.
        "title" => return Ok(Some(Command::Title(rest.to_string()))),
        "sakura" => Command::Sakura,
        _ => return Err(CommandError::UnknownCommand(name.to_string())),
    };
    args.finish()?;
    Ok(Some(command))
}

/// Parses `c<col>.m<measure>.b<beat>.s<slot>[.<sub>]`.
pub fn parse_address(raw: &str) -> Result<Address, CommandError> {
    let invalid = || CommandError::InvalidAddress(raw.to_string());
    let captures = ADDRESS_RE.captures(raw).ok_or_else(invalid)?;
    let number = |index: usize| -> Result<Option<usize>, CommandError> {
        captures
            .get(index)
            .map(|found| found.as_str().parse::<usize>().map_err(|_| invalid()))
            .transpose()
    };
    Ok(Address {
        column: number(1)?.ok_or_else(invalid)?,
        measure: number(2)?.ok_or_else(invalid)?,
        beat: number(3)?.ok_or_else(invalid)?,
        slot: number(4)?.ok_or_else(invalid)?,
        sub: number(5)?,
    })
}

fn parse_column(raw: &str) -> Result<usize, CommandError> {
    COLUMN_RE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|found| found.as_str().parse::<usize>().ok())
        .ok_or_else(|| CommandError::InvalidAddress(raw.to_string()))
}

/// `none` and `-` mean no marker.
fn parse_marker(raw: &str) -> Option<String> {
    match raw {
        "none" | "-" => None,
        marker => Some(marker.to_string()),
    }
}

struct Args<'a> {
    command: &'a str,
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn required(&mut self, argument: &'static str) -> Result<&'a str, CommandError> {
        self.tokens
            .next()
            .ok_or_else(|| CommandError::MissingArgument {
                command: self.command.to_string(),
                argument,
            })
    }

    fn optional(&mut self) -> Option<&'a str> {
        self.tokens.next()
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.tokens.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(()),
        }
    }
}
