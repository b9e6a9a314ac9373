//! Instrument palettes and the symbol compatibility check.
//!
//! # Responsibility
//! - Own the closed glyph sets each instrument may place.
//! - Answer `is_compatible` for placement, transfer and drag-over checks.
//!
//! # Invariants
//! - Every function here is pure; palettes are built once and never mutated.
//! - Shamisen accepts the union of its string groups plus the rest set.

use crate::model::instrument::Instrument;
use once_cell::sync::Lazy;

/// Glyph used for a rest on every instrument.
pub const REST_SYMBOL: &str = "●";
/// Suffix marking the dotted variant of a Shamisen position.
pub const DOTTED_SUFFIX: &str = "•";

const REST_SYMBOLS: &[&str] = &[REST_SYMBOL];

const KOTO_SYMBOLS: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "スクイ", "押手", REST_SYMBOL,
];

const SHAKUHACHI_SYMBOLS: &[&str] = &[
    "ロ", "ツ", "レ", "チ", "リ", "ロ乙", "メリ", "カリ", "ユリ", REST_SYMBOL,
];

const SAN_NO_ITO: &[&str] = &["1", "2", "3", "4", "5", "6", "7", "8", "9"];
const NI_NO_ITO: &[&str] = &["一", "二", "三", "四", "五", "六", "七", "八", "九"];
const ICHI_NO_ITO: &[&str] = &[
    "イ一", "イ二", "イ三", "イ四", "イ五", "イ六", "イ七", "イ八", "イ九",
];

/// Shamisen ornaments: sukui and hajiki.
const SHAMISEN_ORNAMENTS: &[&str] = &["ス", "^"];
const SHAMISEN_ACCIDENTALS: &[&str] = &["♯", "♭"];

/// One titled group of palette buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteSection {
    pub title: &'static str,
    pub symbols: Vec<String>,
}

impl PaletteSection {
    fn plain(title: &'static str, symbols: &[&str]) -> Self {
        Self {
            title,
            symbols: symbols.iter().map(|symbol| symbol.to_string()).collect(),
        }
    }

    fn dotted(title: &'static str, symbols: &[&str]) -> Self {
        Self {
            title,
            symbols: symbols
                .iter()
                .flat_map(|symbol| [symbol.to_string(), format!("{symbol}{DOTTED_SUFFIX}")])
                .collect(),
        }
    }
}

static KOTO_SECTIONS: Lazy<Vec<PaletteSection>> =
    Lazy::new(|| vec![PaletteSection::plain("Koto symbols", KOTO_SYMBOLS)]);

static SHAKUHACHI_SECTIONS: Lazy<Vec<PaletteSection>> =
    Lazy::new(|| vec![PaletteSection::plain("Shakuhachi symbols", SHAKUHACHI_SYMBOLS)]);

static SHAMISEN_SECTIONS: Lazy<Vec<PaletteSection>> = Lazy::new(|| {
    vec![
        PaletteSection::dotted("San no ito (3rd)", SAN_NO_ITO),
        PaletteSection::dotted("Ni no ito (2nd)", NI_NO_ITO),
        PaletteSection::dotted("Ichi no ito (1st)", ICHI_NO_ITO),
        PaletteSection::plain("Rest", REST_SYMBOLS),
    ]
});

/// Returns the palette sections shown for `instrument`.
pub fn palette_sections(instrument: Instrument) -> &'static [PaletteSection] {
    match instrument {
        Instrument::Koto => &KOTO_SECTIONS,
        Instrument::Shamisen => &SHAMISEN_SECTIONS,
        Instrument::Shakuhachi => &SHAKUHACHI_SECTIONS,
    }
}

/// Iterates every symbol base `instrument` accepts, in palette order.
pub fn palette_symbols(instrument: Instrument) -> impl Iterator<Item = &'static str> {
    palette_sections(instrument)
        .iter()
        .flat_map(|section| section.symbols.iter().map(String::as_str))
}

/// Returns whether `base` may be placed while `instrument` is active.
pub fn is_compatible(instrument: Instrument, base: &str) -> bool {
    palette_symbols(instrument).any(|symbol| symbol == base)
}

/// First palette symbol; selected after an instrument change.
pub fn default_symbol(instrument: Instrument) -> &'static str {
    palette_symbols(instrument).next().unwrap_or(REST_SYMBOL)
}

/// Returns whether `base` is a rest glyph.
pub fn is_rest(base: &str) -> bool {
    REST_SYMBOLS.contains(&base)
}

/// Ornament choices for `instrument` (empty when modifiers are unsupported).
pub fn ornaments(instrument: Instrument) -> &'static [&'static str] {
    if instrument.supports_modifiers() {
        SHAMISEN_ORNAMENTS
    } else {
        &[]
    }
}

/// Accidental choices for `instrument` (empty when modifiers are unsupported).
pub fn accidentals(instrument: Instrument) -> &'static [&'static str] {
    if instrument.supports_modifiers() {
        SHAMISEN_ACCIDENTALS
    } else {
        &[]
    }
}
