//! Drag-and-drop transfer protocol.
//!
//! # Responsibility
//! - Encode/decode the JSON drag payload shared by drag sources and drop
//!   targets.
//! - Split a gesture into a pure acceptance query and a single commit.
//!
//! # Invariants
//! - `accepts_drop` never mutates; any number of calls followed by
//!   `commit_drop` behaves like one validation right before the commit.
//! - Existing-symbol payloads are re-resolved by id at drop time; the drag
//!   source location is never trusted.
//! - The `instrument` carried by a palette payload is informational; the
//!   score's instrument at drop time decides compatibility.

use crate::error::{EditError, EditResult};
use crate::model::grid::Score;
use crate::model::instrument::Instrument;
use crate::model::location::Location;
use crate::model::symbol::{SymbolId, SymbolModifiers};
use crate::service::placement::{check_modifiers, ensure_compatible, MoveOutcome, PlaceOutcome};
use serde::{Deserialize, Deserializer, Serialize};

/// Payload carried from drag start to drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DragPayload {
    /// A new symbol dragged out of the palette.
    PaletteSymbol {
        base: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accidental: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ornament: Option<String>,
        /// Instrument active at drag start. Unknown names decode as `None`.
        #[serde(
            default,
            deserialize_with = "lenient_instrument",
            skip_serializing_if = "Option::is_none"
        )]
        instrument: Option<Instrument>,
    },
    /// A symbol already placed in the grid.
    ExistingSymbol {
        #[serde(rename = "symbolId")]
        symbol_id: SymbolId,
    },
}

impl DragPayload {
    /// Decodes a raw drag payload.
    ///
    /// # Errors
    /// - `MalformedPayload` for empty input, invalid JSON, unknown `type`, or
    ///   missing fields.
    pub fn parse(raw: &str) -> EditResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(EditError::MalformedPayload("empty payload".to_string()));
        }
        serde_json::from_str(trimmed).map_err(|err| EditError::MalformedPayload(err.to_string()))
    }

    /// Encodes the payload as JSON text.
    pub fn to_json(&self) -> String {
        // Serializing plain strings, enums and UUIDs cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    fn modifiers(&self) -> SymbolModifiers {
        match self {
            Self::PaletteSymbol {
                accidental,
                ornament,
                ..
            } => SymbolModifiers {
                ornament: ornament.clone(),
                accidental: accidental.clone(),
            },
            Self::ExistingSymbol { .. } => SymbolModifiers::none(),
        }
    }
}

fn lenient_instrument<'de, D>(deserializer: D) -> Result<Option<Instrument>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|name| name.parse::<Instrument>().ok()))
}

/// What a committed drop did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Placed(PlaceOutcome),
    Moved(MoveOutcome),
}

impl DropOutcome {
    /// Id of the symbol now sitting at the drop target.
    pub fn symbol_id(&self) -> SymbolId {
        match self {
            Self::Placed(outcome) => outcome.symbol_id,
            Self::Moved(outcome) => outcome.symbol_id,
        }
    }

    /// Symbols overwritten at the drop target.
    pub fn displaced(&self) -> &[SymbolId] {
        match self {
            Self::Placed(outcome) => &outcome.displaced,
            Self::Moved(outcome) => &outcome.displaced,
        }
    }
}

impl Score {
    /// Drag-over check: whether dropping `payload` on `target` would commit.
    pub fn accepts_drop(&self, payload: &DragPayload, target: &Location) -> EditResult<()> {
        match payload {
            DragPayload::PaletteSymbol { base, .. } => {
                ensure_compatible(self.instrument, base)?;
                check_modifiers(self.instrument, base, &payload.modifiers())?;
            }
            DragPayload::ExistingSymbol { symbol_id } => {
                let found = self
                    .find_symbol_location(*symbol_id)
                    .ok_or(EditError::SymbolNotFound(*symbol_id))?;
                ensure_compatible(self.instrument, found.symbol.base())?;
            }
        }
        self.resolve_slot(target).map(|_| ())
    }

    /// Drop commit: places a palette symbol or moves an existing one.
    pub fn commit_drop(&mut self, payload: &DragPayload, target: &Location) -> EditResult<DropOutcome> {
        match payload {
            DragPayload::PaletteSymbol { base, .. } => self
                .place_at(target, base, payload.modifiers())
                .map(DropOutcome::Placed),
            DragPayload::ExistingSymbol { symbol_id } => self
                .move_symbol(*symbol_id, target)
                .map(DropOutcome::Moved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DragPayload;
    use crate::error::EditError;
    use crate::model::instrument::Instrument;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn palette_payload_uses_wire_field_names() {
        let payload = DragPayload::PaletteSymbol {
            base: "5".to_string(),
            accidental: None,
            ornament: Some("ス".to_string()),
            instrument: Some(Instrument::Shamisen),
        };
        let value: serde_json::Value = serde_json::from_str(&payload.to_json()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "palette-symbol",
                "base": "5",
                "ornament": "ス",
                "instrument": "Shamisen"
            })
        );
    }

    #[test]
    fn existing_payload_parses_symbol_id() {
        let id = Uuid::new_v4();
        let raw = json!({ "type": "existing-symbol", "symbolId": id }).to_string();
        assert_eq!(
            DragPayload::parse(&raw).unwrap(),
            DragPayload::ExistingSymbol { symbol_id: id }
        );
    }

    #[test]
    fn palette_payload_modifiers_are_optional() {
        let raw = r#"{"type":"palette-symbol","base":"●","instrument":"Koto"}"#;
        let payload = DragPayload::parse(raw).unwrap();
        assert!(matches!(
            payload,
            DragPayload::PaletteSymbol { ornament: None, accidental: None, .. }
        ));
    }

    #[test]
    fn malformed_payloads_are_rejected() {
        for raw in [
            "",
            "not json",
            r#"{"type":"unknown"}"#,
            r#"{"type":"existing-symbol"}"#,
            r#"{"type":"existing-symbol","symbolId":"nope"}"#,
            r#"{"type":"palette-symbol","instrument":"Koto"}"#,
        ] {
            assert!(
                matches!(DragPayload::parse(raw), Err(EditError::MalformedPayload(_))),
                "payload should be rejected: {raw}"
            );
        }
    }

    #[test]
    fn payload_instrument_is_decoded_leniently() {
        let lower = r#"{"type":"palette-symbol","base":"5","instrument":"shamisen"}"#;
        assert!(matches!(
            DragPayload::parse(lower).unwrap(),
            DragPayload::PaletteSymbol { instrument: Some(Instrument::Shamisen), .. }
        ));

        for raw in [
            r#"{"type":"palette-symbol","base":"5","instrument":"Biwa"}"#,
            r#"{"type":"palette-symbol","base":"5"}"#,
        ] {
            assert!(matches!(
                DragPayload::parse(raw).unwrap(),
                DragPayload::PaletteSymbol { instrument: None, .. }
            ));
        }
    }
}
