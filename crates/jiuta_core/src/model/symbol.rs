//! Symbol domain model.
//!
//! # Responsibility
//! - Define the atomic notated unit placed into grid slots.
//! - Normalize ornament/accidental markers at construction time.
//!
//! # Invariants
//! - `id` is stable and never reused for another symbol, including across
//!   moves.
//! - `ornament` and `accidental` are `None` unless the symbol was created for
//!   Shamisen with a non-rest base.
//! - Modifier markers are never empty strings.

use crate::model::instrument::Instrument;
use crate::model::palette::is_rest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a placed symbol.
pub type SymbolId = Uuid;

/// Optional markers requested for a new symbol.
///
/// Blank strings are treated as "no marker" so palette payloads that carry
/// `""` for an unselected ornament round-trip cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolModifiers {
    pub ornament: Option<String>,
    pub accidental: Option<String>,
}

impl SymbolModifiers {
    /// No ornament and no accidental.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_ornament(mut self, ornament: impl Into<String>) -> Self {
        self.ornament = Some(ornament.into());
        self
    }

    pub fn with_accidental(mut self, accidental: impl Into<String>) -> Self {
        self.accidental = Some(accidental.into());
        self
    }

    /// Applies the modifier invariant for `instrument` and `base`.
    pub(crate) fn normalized(self, instrument: Instrument, base: &str) -> Self {
        if !instrument.supports_modifiers() || is_rest(base) {
            return Self::none();
        }
        Self {
            ornament: non_blank(self.ornament),
            accidental: non_blank(self.accidental),
        }
    }
}

/// A placed notation glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    id: SymbolId,
    base: String,
    ornament: Option<String>,
    accidental: Option<String>,
}

impl Symbol {
    /// Creates a symbol with a fresh id.
    ///
    /// Modifiers are dropped when `instrument` has none or `base` is a rest.
    /// Palette membership is not checked here; callers gate on
    /// `is_compatible` first.
    pub fn new(instrument: Instrument, base: impl Into<String>, modifiers: SymbolModifiers) -> Self {
        let base = base.into();
        let modifiers = modifiers.normalized(instrument, &base);
        Self {
            id: Uuid::new_v4(),
            base,
            ornament: modifiers.ornament,
            accidental: modifiers.accidental,
        }
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn ornament(&self) -> Option<&str> {
        self.ornament.as_deref()
    }

    pub fn accidental(&self) -> Option<&str> {
        self.accidental.as_deref()
    }

    /// Text shown in a slot: base, then accidental, then ornament.
    pub fn label(&self) -> String {
        let mut label = self.base.clone();
        if let Some(accidental) = &self.accidental {
            label.push_str(accidental);
        }
        if let Some(ornament) = &self.ornament {
            label.push_str(ornament);
        }
        label
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|marker| !marker.trim().is_empty())
}
