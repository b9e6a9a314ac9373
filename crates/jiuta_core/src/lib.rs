//! Core of the Jiuta Studio tablature editor.
//! This crate is the single source of truth for notation grid invariants.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;

pub use config::{ConfigError, EditorConfig, ScoreDefaults};
pub use error::{EditError, EditResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::grid::{
    Beat, Column, ColumnId, Measure, MeasureId, Score, Slot, TimeSignature, BEATS_PER_MEASURE,
    MAX_TEMPO, MEASURES_PER_COLUMN, MIN_TEMPO, SLOTS_PER_BEAT, SUB_SLOTS_PER_SLOT,
};
pub use model::instrument::{Instrument, UnknownInstrument};
pub use model::location::{FoundSymbol, Location};
pub use model::palette::{
    accidentals, default_symbol, is_compatible, ornaments, palette_sections, palette_symbols,
    PaletteSection, REST_SYMBOL,
};
pub use model::symbol::{Symbol, SymbolId, SymbolModifiers};
pub use service::placement::{MergeOutcome, MoveOutcome, PlaceOutcome};
pub use service::transfer::{DragPayload, DropOutcome};
pub use session::EditorSession;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
