//! Grid document: Score → Column → Measure → Beat → Slot.
//!
//! # Responsibility
//! - Own the notation hierarchy and its fixed shape.
//! - Keep column labels and measure indices contiguous across add/delete.
//!
//! # Invariants
//! - A score always holds at least one column.
//! - Every column holds exactly 4 measures, every measure 4 beats, every beat
//!   2 slots. Sizes are array lengths, so no code path can resize them.
//! - Column `k` (1-based) spans measures `4(k-1)+1 ..= 4k`.
//! - Column and measure ids are assigned once and never reused.
//!
//! Structural fields are crate-private: callers read through accessors and
//! mutate through the placement service or the score-level operations below.

use crate::error::{EditError, EditResult};
use crate::model::instrument::Instrument;
use crate::model::symbol::Symbol;
use uuid::Uuid;

pub const MEASURES_PER_COLUMN: usize = 4;
pub const BEATS_PER_MEASURE: usize = 4;
pub const SLOTS_PER_BEAT: usize = 2;
pub const SUB_SLOTS_PER_SLOT: usize = 2;

pub const MIN_TEMPO: u16 = 30;
pub const MAX_TEMPO: u16 = 220;
pub const DEFAULT_TEMPO: u16 = 72;
pub const DEFAULT_TITLE: &str = "Sakura Study";
const UNTITLED: &str = "Untitled";

/// Stable identifier of a column.
pub type ColumnId = Uuid;
/// Stable identifier of a measure.
pub type MeasureId = Uuid;

/// One eighth-note position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Empty,
    Simple(Symbol),
    /// Two sixteenth-note positions, each independently optional.
    Split([Option<Symbol>; SUB_SLOTS_PER_SLOT]),
}

impl Slot {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split(_))
    }

    /// Symbol at `sub_index`: `None` reads a simple slot, `Some(i)` one half
    /// of a split slot. Mismatched shapes read as empty.
    pub fn symbol(&self, sub_index: Option<usize>) -> Option<&Symbol> {
        match (self, sub_index) {
            (Self::Simple(symbol), None) => Some(symbol),
            (Self::Split(parts), Some(sub)) => parts.get(sub).and_then(Option::as_ref),
            _ => None,
        }
    }

    /// Occupied positions with the sub-slot index they live at.
    pub fn occupants(&self) -> Vec<(Option<usize>, &Symbol)> {
        match self {
            Self::Empty => Vec::new(),
            Self::Simple(symbol) => vec![(None, symbol)],
            Self::Split(parts) => parts
                .iter()
                .enumerate()
                .filter_map(|(sub, part)| part.as_ref().map(|symbol| (Some(sub), symbol)))
                .collect(),
        }
    }

    /// Consumes the slot, yielding every symbol it held.
    pub(crate) fn into_symbols(self) -> Vec<Symbol> {
        match self {
            Self::Empty => Vec::new(),
            Self::Simple(symbol) => vec![symbol],
            Self::Split(parts) => parts.into_iter().flatten().collect(),
        }
    }
}

/// Two eighth-note slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Beat {
    pub(crate) slots: [Slot; SLOTS_PER_BEAT],
}

impl Beat {
    pub fn slots(&self) -> &[Slot; SLOTS_PER_BEAT] {
        &self.slots
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measure {
    pub(crate) id: MeasureId,
    pub(crate) index: usize,
    pub(crate) beats: [Beat; BEATS_PER_MEASURE],
}

impl Measure {
    fn new(index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            index,
            beats: Default::default(),
        }
    }

    pub fn id(&self) -> MeasureId {
        self.id
    }

    /// 1-based position of this measure across the whole score.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn beats(&self) -> &[Beat; BEATS_PER_MEASURE] {
        &self.beats
    }
}

/// Fixed block of four measures; the unit of append/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub(crate) id: ColumnId,
    pub(crate) index: usize,
    pub(crate) measures: [Measure; MEASURES_PER_COLUMN],
}

impl Column {
    fn new(index: usize) -> Self {
        let first = first_measure_index(index);
        Self {
            id: Uuid::new_v4(),
            index,
            measures: std::array::from_fn(|offset| Measure::new(first + offset)),
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// 1-based position of this column.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> String {
        format!("Column {}", self.index)
    }

    pub fn measures(&self) -> &[Measure; MEASURES_PER_COLUMN] {
        &self.measures
    }

    pub fn measure(&self, measure_id: MeasureId) -> Option<&Measure> {
        self.measures.iter().find(|measure| measure.id == measure_id)
    }
}

/// Read-only time signature; always 4/4 for this editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub beats_per_measure: u8,
    pub beat_unit: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            beats_per_measure: BEATS_PER_MEASURE as u8,
            beat_unit: 4,
        }
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.beats_per_measure, self.beat_unit)
    }
}

/// The whole notated piece.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    title: String,
    tempo: u16,
    pub(crate) instrument: Instrument,
    time_signature: TimeSignature,
    pub(crate) columns: Vec<Column>,
}

impl Default for Score {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_TEMPO, Instrument::Shamisen)
    }
}

impl Score {
    /// Creates a score with one empty column.
    pub fn new(title: impl Into<String>, tempo: u16, instrument: Instrument) -> Self {
        Self {
            title: title.into(),
            tempo: clamp_tempo(i64::from(tempo)),
            instrument,
            time_signature: TimeSignature::default(),
            columns: vec![Column::new(1)],
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title for the sheet header; blank titles show as "Untitled".
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn tempo(&self) -> u16 {
        self.tempo
    }

    /// Sets tempo clamped to `MIN_TEMPO..=MAX_TEMPO`; returns the applied value.
    pub fn set_tempo(&mut self, tempo: i64) -> u16 {
        self.tempo = clamp_tempo(tempo);
        self.tempo
    }

    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    /// Switches the governing palette. Placed symbols are left untouched.
    pub fn set_instrument(&mut self, instrument: Instrument) {
        self.instrument = instrument;
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, column_id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// Total measure count across all columns.
    pub fn measure_count(&self) -> usize {
        self.columns.len() * MEASURES_PER_COLUMN
    }

    /// Appends an empty column and renumbers; returns its id.
    pub fn add_column(&mut self) -> ColumnId {
        let column = Column::new(self.columns.len() + 1);
        let column_id = column.id;
        self.columns.push(column);
        self.renumber();
        column_id
    }

    /// Removes a column and renumbers.
    ///
    /// Deleting the last column leaves a single fresh empty column behind.
    pub fn delete_column(&mut self, column_id: ColumnId) -> EditResult<()> {
        let position = self
            .columns
            .iter()
            .position(|column| column.id == column_id)
            .ok_or(EditError::ColumnNotFound(column_id))?;
        self.columns.remove(position);
        if self.columns.is_empty() {
            self.columns.push(Column::new(1));
        }
        self.renumber();
        Ok(())
    }

    fn renumber(&mut self) {
        for (offset, column) in self.columns.iter_mut().enumerate() {
            column.index = offset + 1;
            let first = first_measure_index(column.index);
            for (measure_offset, measure) in column.measures.iter_mut().enumerate() {
                measure.index = first + measure_offset;
            }
        }
    }
}

fn first_measure_index(column_index: usize) -> usize {
    (column_index - 1) * MEASURES_PER_COLUMN + 1
}

/// Clamps a requested tempo to `MIN_TEMPO..=MAX_TEMPO`.
pub fn clamp_tempo(tempo: i64) -> u16 {
    // Clamped first, so the narrowing cast is lossless.
    tempo.clamp(i64::from(MIN_TEMPO), i64::from(MAX_TEMPO)) as u16
}
