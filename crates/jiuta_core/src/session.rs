//! Editor session: the document plus transient editing state.
//!
//! # Responsibility
//! - Own one `Score` for the lifetime of an editing session.
//! - Track the active cell and the palette selection.
//! - Turn click and drop gestures into placement-service calls.
//!
//! # Invariants
//! - The active cell never outlives the column it points into: deleting
//!   that column clears it.
//! - The selected symbol always belongs to the current instrument's palette.
//! - A rejected gesture leaves both the score and the session unchanged.

use crate::config::ScoreDefaults;
use crate::error::{EditError, EditResult};
use crate::model::grid::{ColumnId, Score};
use crate::model::instrument::Instrument;
use crate::model::location::Location;
use crate::model::palette::{accidentals, default_symbol, ornaments, REST_SYMBOL};
use crate::model::symbol::{Symbol, SymbolId, SymbolModifiers};
use crate::service::placement::{ensure_compatible, MergeOutcome, MoveOutcome, PlaceOutcome};
use crate::service::transfer::{DragPayload, DropOutcome};
use log::{debug, info};

/// Opening phrase loaded by the Sakura preset, one per beat.
const SAKURA_OPENING: [&str; 4] = ["5", "5", "7", REST_SYMBOL];

/// One interactive editing session.
#[derive(Debug, Clone)]
pub struct EditorSession {
    score: Score,
    active_cell: Option<Location>,
    selected_symbol: String,
    selected_ornament: Option<String>,
    selected_accidental: Option<String>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::from_defaults(&ScoreDefaults::default())
    }
}

impl EditorSession {
    pub fn new(score: Score) -> Self {
        let selected_symbol = default_symbol(score.instrument()).to_string();
        Self {
            score,
            active_cell: None,
            selected_symbol,
            selected_ornament: None,
            selected_accidental: None,
        }
    }

    /// Starts a session on a fresh one-column score.
    pub fn from_defaults(defaults: &ScoreDefaults) -> Self {
        Self::new(Score::new(
            defaults.title.clone(),
            defaults.tempo,
            defaults.instrument,
        ))
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    // -- score settings -------------------------------------------------

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.score.set_title(title);
    }

    /// Sets the clamped tempo; returns the applied value.
    pub fn set_tempo(&mut self, tempo: i64) -> u16 {
        self.score.set_tempo(tempo)
    }

    /// Switches instrument and resets the palette selection.
    pub fn set_instrument(&mut self, instrument: Instrument) {
        self.score.set_instrument(instrument);
        self.selected_symbol = default_symbol(instrument).to_string();
        self.selected_ornament = None;
        self.selected_accidental = None;
        info!("event=instrument_change module=session status=ok instrument={instrument}");
    }

    // -- columns --------------------------------------------------------

    pub fn add_column(&mut self) -> ColumnId {
        let column_id = self.score.add_column();
        info!(
            "event=column_add module=session status=ok columns={}",
            self.score.columns().len()
        );
        column_id
    }

    /// Deletes a column, clearing the active cell if it pointed into it.
    pub fn delete_column(&mut self, column_id: ColumnId) -> EditResult<()> {
        logged("column_delete", self.score.delete_column(column_id))?;
        if self
            .active_cell
            .is_some_and(|active| active.column_id == column_id)
        {
            self.clear_active_cell();
        }
        info!(
            "event=column_delete module=session status=ok columns={}",
            self.score.columns().len()
        );
        Ok(())
    }

    // -- active cell ----------------------------------------------------

    /// Replaces the selection. The location is not validated.
    pub fn set_active_cell(&mut self, location: Location) {
        self.active_cell = Some(location);
    }

    pub fn clear_active_cell(&mut self) {
        self.active_cell = None;
    }

    pub fn active_cell(&self) -> Option<Location> {
        self.active_cell
    }

    /// Exact match against the active cell, `sub_index` included.
    pub fn is_active(&self, location: &Location) -> bool {
        self.active_cell.as_ref() == Some(location)
    }

    /// Human-readable active cell, e.g. `Column 1 - M2 - Beat 3 - 2nd 8th`.
    ///
    /// Returns `None` when nothing is selected or the selection is stale.
    pub fn active_cell_label(&self) -> Option<String> {
        let location = self.active_cell?;
        let column = self.score.column(location.column_id)?;
        let measure = column.measure(location.measure_id)?;
        let mut label = format!(
            "{} - M{} - Beat {} - {} 8th",
            column.label(),
            measure.index(),
            location.beat_index + 1,
            ordinal(location.slot_index)
        );
        if let Some(sub) = location.sub_index {
            label.push_str(&format!(" - {} 16th", ordinal(sub)));
        }
        Some(label)
    }

    // -- palette selection ----------------------------------------------

    pub fn selected_symbol(&self) -> &str {
        &self.selected_symbol
    }

    pub fn selected_ornament(&self) -> Option<&str> {
        self.selected_ornament.as_deref()
    }

    pub fn selected_accidental(&self) -> Option<&str> {
        self.selected_accidental.as_deref()
    }

    pub fn select_symbol(&mut self, base: &str) -> EditResult<()> {
        ensure_compatible(self.score.instrument(), base)?;
        self.selected_symbol = base.to_string();
        Ok(())
    }

    /// Selects an ornament for new placements; `None` or blank clears it.
    pub fn select_ornament(&mut self, ornament: Option<&str>) -> EditResult<()> {
        self.selected_ornament = pick_marker(ornament, ornaments(self.score.instrument()))
            .map_err(EditError::UnsupportedOrnament)?;
        Ok(())
    }

    /// Selects an accidental for new placements; `None` or blank clears it.
    pub fn select_accidental(&mut self, accidental: Option<&str>) -> EditResult<()> {
        self.selected_accidental = pick_marker(accidental, accidentals(self.score.instrument()))
            .map_err(EditError::UnsupportedAccidental)?;
        Ok(())
    }

    fn placement_modifiers(&self) -> SymbolModifiers {
        SymbolModifiers {
            ornament: self.selected_ornament.clone(),
            accidental: self.selected_accidental.clone(),
        }
    }

    // -- direct edits ---------------------------------------------------

    /// Places a symbol and makes `location` the active cell.
    pub fn place_at(
        &mut self,
        location: &Location,
        base: &str,
        modifiers: SymbolModifiers,
    ) -> EditResult<PlaceOutcome> {
        let outcome = logged("place_at", self.score.place_at(location, base, modifiers))?;
        self.active_cell = Some(*location);
        Ok(outcome)
    }

    /// Palette click: selects `base` and places it at the active cell with
    /// the selected modifiers.
    pub fn place_at_active_cell(&mut self, base: &str) -> EditResult<PlaceOutcome> {
        let target = logged(
            "place_at_active_cell",
            self.active_cell.ok_or(EditError::NoActiveCell),
        )?;
        let modifiers = self.placement_modifiers();
        let outcome = logged(
            "place_at_active_cell",
            self.score.place_at(&target, base, modifiers),
        )?;
        self.selected_symbol = base.to_string();
        Ok(outcome)
    }

    /// Places the selected symbol at the active cell.
    pub fn place_selected_at_active_cell(&mut self) -> EditResult<PlaceOutcome> {
        let base = self.selected_symbol.clone();
        self.place_at_active_cell(&base)
    }

    pub fn remove_at(&mut self, location: &Location) -> EditResult<Symbol> {
        logged("remove_at", self.score.remove_at(location))
    }

    /// Removes whatever symbol the active cell addresses.
    pub fn clear_active_slot(&mut self) -> EditResult<Symbol> {
        let target = logged(
            "clear_active_slot",
            self.active_cell.ok_or(EditError::NoActiveCell),
        )?;
        logged("clear_active_slot", self.score.remove_at(&target))
    }

    /// Moves a symbol and makes `target` the active cell.
    pub fn move_symbol(&mut self, symbol_id: SymbolId, target: &Location) -> EditResult<MoveOutcome> {
        let outcome = logged("move_symbol", self.score.move_symbol(symbol_id, target))?;
        self.active_cell = Some(*target);
        Ok(outcome)
    }

    pub fn split_slot(&mut self, location: &Location) -> EditResult<()> {
        logged("split_slot", self.score.split_slot(location))
    }

    pub fn merge_slot(&mut self, location: &Location) -> EditResult<MergeOutcome> {
        logged("merge_slot", self.score.merge_slot(location))
    }

    // -- drag and drop --------------------------------------------------

    /// Payload for dragging `base` out of the palette with the selected
    /// modifiers.
    pub fn palette_drag_payload(&self, base: &str) -> String {
        DragPayload::PaletteSymbol {
            base: base.to_string(),
            accidental: self.selected_accidental.clone(),
            ornament: self.selected_ornament.clone(),
            instrument: Some(self.score.instrument()),
        }
        .to_json()
    }

    /// Payload for dragging the selected palette symbol.
    pub fn selected_drag_payload(&self) -> String {
        self.palette_drag_payload(&self.selected_symbol)
    }

    /// Payload for dragging an already placed symbol.
    pub fn existing_drag_payload(symbol_id: SymbolId) -> String {
        DragPayload::ExistingSymbol { symbol_id }.to_json()
    }

    /// Drag-over query: whether a drop of `raw` on `target` would apply.
    pub fn drag_over(&self, raw: &str, target: &Location) -> bool {
        DragPayload::parse(raw)
            .and_then(|payload| self.score.accepts_drop(&payload, target))
            .is_ok()
    }

    /// Drop commit. On success `target` becomes the active cell.
    pub fn drop(&mut self, raw: &str, target: &Location) -> EditResult<DropOutcome> {
        let payload = logged("drop", DragPayload::parse(raw))?;
        let outcome = logged("drop", self.score.commit_drop(&payload, target))?;
        self.active_cell = Some(*target);
        debug!(
            "event=drop module=session status=ok symbol={} displaced={}",
            outcome.symbol_id(),
            outcome.displaced().len()
        );
        Ok(outcome)
    }

    // -- presets --------------------------------------------------------

    /// Loads `5, 5, 7, ●` on the first eighth of each beat of the first
    /// measure and clears the second eighths. Bypasses the palette check.
    pub fn load_sakura_opening(&mut self) -> EditResult<()> {
        let Some(column) = self.score.columns().first() else {
            return Ok(());
        };
        let column_id = column.id();
        let measure_id = column.measures()[0].id();
        let instrument = self.score.instrument();

        for (beat_index, base) in SAKURA_OPENING.into_iter().enumerate() {
            let first = Location::new(column_id, measure_id, beat_index, 0);
            let second = Location::new(column_id, measure_id, beat_index, 1);
            let symbol = Symbol::new(instrument, base, SymbolModifiers::none());
            self.score.overwrite_slot(&first, Some(symbol))?;
            self.score.overwrite_slot(&second, None)?;
        }
        info!("event=preset_load module=session status=ok preset=sakura_opening");
        Ok(())
    }
}

fn ordinal(index: usize) -> &'static str {
    if index == 0 {
        "1st"
    } else {
        "2nd"
    }
}

/// Normalizes a requested marker against the allowed list.
fn pick_marker(requested: Option<&str>, allowed: &[&str]) -> Result<Option<String>, String> {
    match requested.map(str::trim).filter(|marker| !marker.is_empty()) {
        None => Ok(None),
        Some(marker) if allowed.contains(&marker) => Ok(Some(marker.to_string())),
        Some(marker) => Err(marker.to_string()),
    }
}

fn logged<T>(event: &str, result: EditResult<T>) -> EditResult<T> {
    if let Err(err) = &result {
        debug!(
            "event={event} module=session status=rejected reason={}",
            err.reason()
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::{pick_marker, EditorSession};
    use crate::model::instrument::Instrument;
    use crate::model::location::Location;

    #[test]
    fn pick_marker_trims_and_checks_allowed_list() {
        assert_eq!(pick_marker(None, &["ス"]), Ok(None));
        assert_eq!(pick_marker(Some("  "), &["ス"]), Ok(None));
        assert_eq!(pick_marker(Some(" ス "), &["ス"]), Ok(Some("ス".to_string())));
        assert_eq!(pick_marker(Some("^"), &[]), Err("^".to_string()));
    }

    #[test]
    fn active_cell_label_names_eighth_and_sixteenth() {
        let mut session = EditorSession::default();
        let column = &session.score().columns()[0];
        let location = Location::new(column.id(), column.measures()[1].id(), 2, 1);

        session.set_active_cell(location);
        assert_eq!(
            session.active_cell_label().as_deref(),
            Some("Column 1 - M2 - Beat 3 - 2nd 8th")
        );

        session.set_active_cell(location.with_sub(0));
        assert_eq!(
            session.active_cell_label().as_deref(),
            Some("Column 1 - M2 - Beat 3 - 2nd 8th - 1st 16th")
        );
    }

    #[test]
    fn default_session_selects_first_shamisen_symbol() {
        let mut session = EditorSession::default();
        assert_eq!(session.score().instrument(), Instrument::Shamisen);
        assert_eq!(session.selected_symbol(), "1");

        session.set_instrument(Instrument::Shakuhachi);
        assert_eq!(session.selected_symbol(), "ロ");
    }
}
