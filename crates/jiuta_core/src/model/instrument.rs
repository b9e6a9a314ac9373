//! Instrument selection for a score.
//!
//! # Invariants
//! - The instrument set is closed; unknown names are rejected, never mapped
//!   to a fallback.
//! - Only Shamisen symbols carry ornament/accidental modifiers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Instrument whose palette governs which symbols may be placed.
///
/// Serialized with the display names used by drag payloads (`"Koto"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Koto,
    Shamisen,
    Shakuhachi,
}

impl Instrument {
    /// All instruments in form-control order.
    pub const ALL: [Instrument; 3] = [Self::Koto, Self::Shamisen, Self::Shakuhachi];

    /// Stable display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Koto => "Koto",
            Self::Shamisen => "Shamisen",
            Self::Shakuhachi => "Shakuhachi",
        }
    }

    /// Whether symbols for this instrument keep ornament/accidental markers.
    pub fn supports_modifiers(self) -> bool {
        matches!(self, Self::Shamisen)
    }
}

impl Display for Instrument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Instrument {
    type Err = UnknownInstrument;

    /// Parses a display name, ignoring surrounding whitespace and case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|instrument| instrument.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| UnknownInstrument(normalized.to_string()))
    }
}

/// Parse failure for an instrument name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownInstrument(pub String);

impl Display for UnknownInstrument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown instrument `{}`; expected Koto|Shamisen|Shakuhachi",
            self.0
        )
    }
}

impl Error for UnknownInstrument {}
