//! Location addressing and reverse symbol lookup.
//!
//! # Responsibility
//! - Name any slot or sub-slot by stable column/measure ids plus indices.
//! - Resolve a location against the current score, reporting the first
//!   ancestor that no longer exists.
//! - Find the location of a symbol by id.
//!
//! # Invariants
//! - Resolution never mutates and never panics on stale or out-of-range input.
//! - `find_symbol_location` reports `sub_index` iff the slot is split.
//!
//! Reverse lookup is a full scan over the grid; no index is maintained.

use crate::error::{EditError, EditResult};
use crate::model::grid::{
    Beat, ColumnId, MeasureId, Score, Slot, BEATS_PER_MEASURE, SLOTS_PER_BEAT, SUB_SLOTS_PER_SLOT,
};
use crate::model::symbol::{Symbol, SymbolId};
use serde::{Deserialize, Serialize};

/// Address of one slot, or one half of a split slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub column_id: ColumnId,
    pub measure_id: MeasureId,
    pub beat_index: usize,
    pub slot_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_index: Option<usize>,
}

impl Location {
    /// Slot-level address (no sub-slot).
    pub fn new(
        column_id: ColumnId,
        measure_id: MeasureId,
        beat_index: usize,
        slot_index: usize,
    ) -> Self {
        Self {
            column_id,
            measure_id,
            beat_index,
            slot_index,
            sub_index: None,
        }
    }

    /// Same slot, addressing sub-slot `sub_index`.
    pub fn with_sub(self, sub_index: usize) -> Self {
        Self {
            sub_index: Some(sub_index),
            ..self
        }
    }

    /// Same slot without the sub-slot component.
    pub fn slot_address(self) -> Self {
        Self {
            sub_index: None,
            ..self
        }
    }

    pub fn is_sub_slot(&self) -> bool {
        self.sub_index.is_some()
    }

    fn check_indices(&self) -> EditResult<()> {
        if self.beat_index >= BEATS_PER_MEASURE {
            return Err(EditError::BeatOutOfRange(self.beat_index));
        }
        if self.slot_index >= SLOTS_PER_BEAT {
            return Err(EditError::SlotOutOfRange(self.slot_index));
        }
        match self.sub_index {
            Some(sub) if sub >= SUB_SLOTS_PER_SLOT => Err(EditError::SubSlotOutOfRange(sub)),
            _ => Ok(()),
        }
    }
}

/// Result of a reverse lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundSymbol<'a> {
    pub location: Location,
    pub symbol: &'a Symbol,
}

impl Score {
    /// Returns the beat a location points into.
    pub fn resolve_beat(&self, location: &Location) -> EditResult<&Beat> {
        let column = self
            .column(location.column_id)
            .ok_or(EditError::ColumnNotFound(location.column_id))?;
        let measure = column
            .measure(location.measure_id)
            .ok_or(EditError::MeasureNotFound(location.measure_id))?;
        measure
            .beats
            .get(location.beat_index)
            .ok_or(EditError::BeatOutOfRange(location.beat_index))
    }

    /// Returns the slot a location points into, validating every index.
    ///
    /// The slot shape is not compared with `sub_index`; use
    /// [`Score::symbol_at`] to read the addressed symbol.
    pub fn resolve_slot(&self, location: &Location) -> EditResult<&Slot> {
        location.check_indices()?;
        let beat = self.resolve_beat(location)?;
        Ok(&beat.slots[location.slot_index])
    }

    pub(crate) fn resolve_slot_mut(&mut self, location: &Location) -> EditResult<&mut Slot> {
        location.check_indices()?;
        let column = self
            .columns
            .iter_mut()
            .find(|column| column.id == location.column_id)
            .ok_or(EditError::ColumnNotFound(location.column_id))?;
        let measure = column
            .measures
            .iter_mut()
            .find(|measure| measure.id == location.measure_id)
            .ok_or(EditError::MeasureNotFound(location.measure_id))?;
        Ok(&mut measure.beats[location.beat_index].slots[location.slot_index])
    }

    /// Symbol held at exactly this location, if any.
    pub fn symbol_at(&self, location: &Location) -> Option<&Symbol> {
        self.resolve_slot(location)
            .ok()
            .and_then(|slot| slot.symbol(location.sub_index))
    }

    /// Scans the grid for `symbol_id` and returns its first location.
    pub fn find_symbol_location(&self, symbol_id: SymbolId) -> Option<FoundSymbol<'_>> {
        self.symbols().find(|found| found.symbol.id() == symbol_id)
    }

    pub fn contains_symbol(&self, symbol_id: SymbolId) -> bool {
        self.find_symbol_location(symbol_id).is_some()
    }

    /// Every placed symbol in document order with its location.
    pub fn symbols(&self) -> impl Iterator<Item = FoundSymbol<'_>> {
        self.columns.iter().flat_map(|column| {
            column.measures.iter().flat_map(move |measure| {
                measure
                    .beats
                    .iter()
                    .enumerate()
                    .flat_map(move |(beat_index, beat)| {
                        beat.slots
                            .iter()
                            .enumerate()
                            .flat_map(move |(slot_index, slot)| {
                                slot.occupants().into_iter().map(move |(sub_index, symbol)| {
                                    FoundSymbol {
                                        location: Location {
                                            column_id: column.id,
                                            measure_id: measure.id,
                                            beat_index,
                                            slot_index,
                                            sub_index,
                                        },
                                        symbol,
                                    }
                                })
                            })
                    })
            })
        })
    }
}
