//! Placement and transfer engine.
//!
//! # Responsibility
//! - Create, remove, move, split and merge symbols at a `Location`.
//! - Gate every write on the active instrument's palette.
//!
//! # Invariants
//! - Every check runs before the first write: an `Err` means the score is
//!   unchanged.
//! - Writes overwrite. A symbol displaced by a write is dropped from the
//!   score and reported in the outcome.
//! - A sub-slot write into a plain slot splits it first, dropping the plain
//!   content.
//! - Compatibility is judged against the score's current instrument, never
//!   against the instrument a symbol was created under.

use crate::error::{EditError, EditResult};
use crate::model::grid::{Score, Slot};
use crate::model::instrument::Instrument;
use crate::model::location::Location;
use crate::model::palette::{accidentals, is_compatible, is_rest, ornaments};
use crate::model::symbol::{Symbol, SymbolId, SymbolModifiers};
use log::debug;

/// Result of a successful `place_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOutcome {
    pub symbol_id: SymbolId,
    pub location: Location,
    /// Symbols overwritten by the write.
    pub displaced: Vec<SymbolId>,
}

/// Result of a successful `move_symbol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub symbol_id: SymbolId,
    pub from: Location,
    pub to: Location,
    /// Symbols overwritten at the target.
    pub displaced: Vec<SymbolId>,
}

/// Result of a successful `merge_slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub kept: Option<SymbolId>,
    pub discarded: Option<SymbolId>,
}

impl Score {
    /// Places a new symbol built from `base` and `modifiers` at `location`.
    ///
    /// # Errors
    /// - `IncompatibleSymbol` when `base` is not in the active palette.
    /// - `UnsupportedOrnament`/`UnsupportedAccidental` for unknown Shamisen
    ///   markers.
    /// - Addressing errors when `location` does not resolve.
    pub fn place_at(
        &mut self,
        location: &Location,
        base: &str,
        modifiers: SymbolModifiers,
    ) -> EditResult<PlaceOutcome> {
        let instrument = self.instrument;
        ensure_compatible(instrument, base)?;
        check_modifiers(instrument, base, &modifiers)?;

        let slot = self.resolve_slot_mut(location)?;
        let symbol = Symbol::new(instrument, base, modifiers);
        let symbol_id = symbol.id();
        let displaced = write_slot(slot, location.sub_index, symbol);

        debug!(
            "event=place_at module=placement status=ok symbol={} sub_slot={} displaced={}",
            symbol_id,
            location.is_sub_slot(),
            displaced.len()
        );
        Ok(PlaceOutcome {
            symbol_id,
            location: *location,
            displaced,
        })
    }

    /// Removes and returns the symbol addressed by `location`.
    ///
    /// A location without `sub_index` addresses a plain slot; one with
    /// `sub_index` addresses half of a split slot. Any other pairing
    /// addresses nothing.
    pub fn remove_at(&mut self, location: &Location) -> EditResult<Symbol> {
        let slot = self.resolve_slot_mut(location)?;
        let removed = take_from_slot(slot, location.sub_index)?;
        debug!(
            "event=remove_at module=placement status=ok symbol={}",
            removed.id()
        );
        Ok(removed)
    }

    /// Moves an existing symbol to `target`, keeping its id.
    ///
    /// The source is looked up by id at call time. Whatever occupied the
    /// target is overwritten. Moving a symbol onto its own location is
    /// allowed and leaves the score as it was.
    pub fn move_symbol(&mut self, symbol_id: SymbolId, target: &Location) -> EditResult<MoveOutcome> {
        let (source, base) = {
            let found = self
                .find_symbol_location(symbol_id)
                .ok_or(EditError::SymbolNotFound(symbol_id))?;
            (found.location, found.symbol.base().to_string())
        };
        ensure_compatible(self.instrument, &base)?;
        // Target must resolve before the source is emptied.
        self.resolve_slot(target)?;

        let symbol = take_from_slot(self.resolve_slot_mut(&source)?, source.sub_index)?;
        let displaced = write_slot(self.resolve_slot_mut(target)?, target.sub_index, symbol);

        debug!(
            "event=move_symbol module=placement status=ok symbol={} displaced={}",
            symbol_id,
            displaced.len()
        );
        Ok(MoveOutcome {
            symbol_id,
            from: source,
            to: *target,
            displaced,
        })
    }

    /// Splits a plain slot into two sixteenth positions.
    ///
    /// An existing symbol moves to sub-slot 0. The `sub_index` of `location`
    /// is ignored.
    pub fn split_slot(&mut self, location: &Location) -> EditResult<()> {
        let slot = self.resolve_slot_mut(&location.slot_address())?;
        if slot.is_split() {
            return Err(EditError::AlreadySplit);
        }
        let first = match std::mem::take(slot) {
            Slot::Simple(symbol) => Some(symbol),
            _ => None,
        };
        *slot = Slot::Split([first, None]);
        debug!("event=split_slot module=placement status=ok");
        Ok(())
    }

    /// Collapses a split slot back to a plain slot.
    ///
    /// Keeps sub-slot 0 when occupied, otherwise sub-slot 1. When both are
    /// occupied sub-slot 1 is discarded.
    pub fn merge_slot(&mut self, location: &Location) -> EditResult<MergeOutcome> {
        let slot = self.resolve_slot_mut(&location.slot_address())?;
        let Slot::Split(parts) = slot else {
            return Err(EditError::NotSplit);
        };
        let [first, second] = std::mem::take(parts);
        let (kept, discarded) = match first {
            Some(first) => (Some(first), second),
            None => (second, None),
        };
        let outcome = MergeOutcome {
            kept: kept.as_ref().map(Symbol::id),
            discarded: discarded.as_ref().map(Symbol::id),
        };
        *slot = kept.map_or(Slot::Empty, Slot::Simple);

        debug!(
            "event=merge_slot module=placement status=ok discarded={}",
            outcome.discarded.is_some()
        );
        Ok(outcome)
    }

    /// Sets a whole slot to `symbol` (or empty) without any palette check.
    ///
    /// Used by presets that load fixed content.
    pub(crate) fn overwrite_slot(&mut self, location: &Location, symbol: Option<Symbol>) -> EditResult<()> {
        let slot = self.resolve_slot_mut(&location.slot_address())?;
        *slot = symbol.map_or(Slot::Empty, Slot::Simple);
        Ok(())
    }
}

/// Fails with `IncompatibleSymbol` unless `base` is in the palette.
pub fn ensure_compatible(instrument: Instrument, base: &str) -> EditResult<()> {
    if is_compatible(instrument, base) {
        Ok(())
    } else {
        Err(EditError::IncompatibleSymbol {
            instrument,
            base: base.to_string(),
        })
    }
}

/// Rejects non-blank markers outside the instrument's modifier lists.
///
/// Markers on instruments without modifiers, or on rests, are dropped at
/// symbol construction instead of rejected.
pub fn check_modifiers(
    instrument: Instrument,
    base: &str,
    modifiers: &SymbolModifiers,
) -> EditResult<()> {
    if !instrument.supports_modifiers() || is_rest(base) {
        return Ok(());
    }
    if let Some(ornament) = non_blank(modifiers.ornament.as_deref()) {
        if !ornaments(instrument).contains(&ornament) {
            return Err(EditError::UnsupportedOrnament(ornament.to_string()));
        }
    }
    if let Some(accidental) = non_blank(modifiers.accidental.as_deref()) {
        if !accidentals(instrument).contains(&accidental) {
            return Err(EditError::UnsupportedAccidental(accidental.to_string()));
        }
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|marker| !marker.is_empty())
}

/// Writes `symbol` into `slot`; returns ids of the symbols it replaced.
fn write_slot(slot: &mut Slot, sub_index: Option<usize>, symbol: Symbol) -> Vec<SymbolId> {
    let replaced = match sub_index {
        None => std::mem::replace(slot, Slot::Simple(symbol)).into_symbols(),
        Some(sub) => {
            if let Slot::Split(parts) = slot {
                parts[sub].replace(symbol).into_iter().collect()
            } else {
                let mut parts = [None, None];
                parts[sub] = Some(symbol);
                std::mem::replace(slot, Slot::Split(parts)).into_symbols()
            }
        }
    };
    replaced.iter().map(Symbol::id).collect()
}

/// Takes the symbol addressed by `sub_index` out of `slot`.
fn take_from_slot(slot: &mut Slot, sub_index: Option<usize>) -> EditResult<Symbol> {
    match sub_index {
        None => {
            if slot.is_split() {
                return Err(EditError::SubSlotRequired);
            }
            match std::mem::take(slot) {
                Slot::Simple(symbol) => Ok(symbol),
                _ => Err(EditError::SlotEmpty),
            }
        }
        Some(sub) => match slot {
            Slot::Split(parts) => parts
                .get_mut(sub)
                .and_then(Option::take)
                .ok_or(EditError::SlotEmpty),
            _ => Err(EditError::NotSplit),
        },
    }
}
