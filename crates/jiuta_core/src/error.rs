//! Edit rejection reasons.
//!
//! # Invariants
//! - An operation that returns `Err(EditError)` has not mutated the score.
//! - No variant is fatal; interactive callers drop the gesture and continue.

use crate::model::grid::{ColumnId, MeasureId};
use crate::model::instrument::Instrument;
use crate::model::symbol::SymbolId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EditResult<T> = Result<T, EditError>;

/// Why an edit left the score unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Location references a column that no longer exists.
    ColumnNotFound(ColumnId),
    /// Location references a measure missing from its column.
    MeasureNotFound(MeasureId),
    BeatOutOfRange(usize),
    SlotOutOfRange(usize),
    SubSlotOutOfRange(usize),
    /// Symbol base is not in the active instrument's palette.
    IncompatibleSymbol {
        instrument: Instrument,
        base: String,
    },
    UnsupportedOrnament(String),
    UnsupportedAccidental(String),
    /// No symbol with this id is present in the score.
    SymbolNotFound(SymbolId),
    /// Addressed position holds no symbol.
    SlotEmpty,
    /// Operation needs a split slot (or a sub-slot address) but the slot is plain.
    NotSplit,
    AlreadySplit,
    /// Slot is split, so the location must name a sub-slot.
    SubSlotRequired,
    /// Selection-based edit issued with no active cell.
    NoActiveCell,
    /// Drag payload could not be decoded.
    MalformedPayload(String),
}

impl EditError {
    /// Short stable code used in structured log lines.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "column_not_found",
            Self::MeasureNotFound(_) => "measure_not_found",
            Self::BeatOutOfRange(_) => "beat_out_of_range",
            Self::SlotOutOfRange(_) => "slot_out_of_range",
            Self::SubSlotOutOfRange(_) => "sub_slot_out_of_range",
            Self::IncompatibleSymbol { .. } => "incompatible_symbol",
            Self::UnsupportedOrnament(_) => "unsupported_ornament",
            Self::UnsupportedAccidental(_) => "unsupported_accidental",
            Self::SymbolNotFound(_) => "symbol_not_found",
            Self::SlotEmpty => "slot_empty",
            Self::NotSplit => "not_split",
            Self::AlreadySplit => "already_split",
            Self::SubSlotRequired => "sub_slot_required",
            Self::NoActiveCell => "no_active_cell",
            Self::MalformedPayload(_) => "malformed_payload",
        }
    }

    /// Whether the failure comes from a stale or out-of-range address.
    pub fn is_addressing(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound(_)
                | Self::MeasureNotFound(_)
                | Self::BeatOutOfRange(_)
                | Self::SlotOutOfRange(_)
                | Self::SubSlotOutOfRange(_)
        )
    }
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnNotFound(id) => write!(f, "column not found: {id}"),
            Self::MeasureNotFound(id) => write!(f, "measure not found: {id}"),
            Self::BeatOutOfRange(index) => write!(f, "beat index out of range: {index}"),
            Self::SlotOutOfRange(index) => write!(f, "slot index out of range: {index}"),
            Self::SubSlotOutOfRange(index) => {
                write!(f, "sub-slot index out of range: {index}")
            }
            Self::IncompatibleSymbol { instrument, base } => {
                write!(f, "symbol `{base}` is not in the {instrument} palette")
            }
            Self::UnsupportedOrnament(value) => write!(f, "ornament is unsupported: {value}"),
            Self::UnsupportedAccidental(value) => {
                write!(f, "accidental is unsupported: {value}")
            }
            Self::SymbolNotFound(id) => write!(f, "symbol not found: {id}"),
            Self::SlotEmpty => write!(f, "addressed slot holds no symbol"),
            Self::NotSplit => write!(f, "slot is not split"),
            Self::AlreadySplit => write!(f, "slot is already split"),
            Self::SubSlotRequired => write!(f, "slot is split; address a sub-slot"),
            Self::NoActiveCell => write!(f, "no active cell selected"),
            Self::MalformedPayload(message) => write!(f, "malformed drag payload: {message}"),
        }
    }
}

impl Error for EditError {}
