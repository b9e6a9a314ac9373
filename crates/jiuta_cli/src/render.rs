//! Plain-text rendering of a session.
//!
//! One line per measure, beats separated by `|`. Empty positions print as
//! `·`, split eighths as `[a/b]`, and the active position is wrapped in
//! `<…>`.

use jiuta_core::{palette_sections, EditorSession, Location, Slot, Symbol};
use std::fmt::Write;

const EMPTY: &str = "·";

pub fn render_session(session: &EditorSession) -> String {
    let score = session.score();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} | {} | tempo {} | {}",
        score.display_title(),
        score.instrument(),
        score.tempo(),
        score.time_signature()
    );
    let active = session
        .active_cell_label()
        .unwrap_or_else(|| "none".to_string());
    let _ = writeln!(out, "active: {active}");

    for column in score.columns() {
        let _ = writeln!(out, "{}", column.label());
        for measure in column.measures() {
            let _ = write!(out, "  M{:<3}|", measure.index());
            for (beat_index, beat) in measure.beats().iter().enumerate() {
                for (slot_index, slot) in beat.slots().iter().enumerate() {
                    let here = Location::new(column.id(), measure.id(), beat_index, slot_index);
                    let _ = write!(out, " {}", render_slot(session, slot, &here));
                }
                out.push_str(" |");
            }
            out.push('\n');
        }
    }
    out
}

/// Lists the palette of the current instrument with the selection state.
pub fn render_palette(session: &EditorSession) -> String {
    let instrument = session.score().instrument();
    let mut out = String::new();
    for section in palette_sections(instrument) {
        let _ = writeln!(out, "{}: {}", section.title, section.symbols.join(" "));
    }
    let _ = write!(
        out,
        "selected: {} ornament: {} accidental: {}",
        session.selected_symbol(),
        session.selected_ornament().unwrap_or("none"),
        session.selected_accidental().unwrap_or("none")
    );
    out
}

fn render_slot(session: &EditorSession, slot: &Slot, here: &Location) -> String {
    match slot {
        Slot::Empty => mark(session, here, EMPTY.to_string()),
        Slot::Simple(symbol) => mark(session, here, symbol.label()),
        Slot::Split(parts) => {
            let halves = parts
                .iter()
                .enumerate()
                .map(|(sub, part)| {
                    mark(session, &here.with_sub(sub), symbol_text(part.as_ref()))
                })
                .collect::<Vec<_>>();
            mark(session, here, format!("[{}]", halves.join("/")))
        }
    }
}

fn symbol_text(symbol: Option<&Symbol>) -> String {
    symbol.map_or_else(|| EMPTY.to_string(), Symbol::label)
}

fn mark(session: &EditorSession, location: &Location, text: String) -> String {
    if session.is_active(location) {
        format!("<{text}>")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::{render_palette, render_session};
    use jiuta_core::{EditorSession, Location, SymbolModifiers};

    #[test]
    fn renders_sakura_opening_with_active_cell() {
        let mut session = EditorSession::default();
        session.load_sakura_opening().unwrap();
        let column = &session.score().columns()[0];
        let first = Location::new(column.id(), column.measures()[0].id(), 0, 0);
        session.set_active_cell(first);

        let text = render_session(&session);
        assert!(text.starts_with("Sakura Study | Shamisen | tempo 72 | 4/4\n"));
        assert!(text.contains("active: Column 1 - M1 - Beat 1 - 1st 8th"));
        assert!(text.contains("M1  | <5> · | 5 · | 7 · | ● · |"));
        assert!(text.contains("M4  | · · | · · | · · | · · |"));
    }

    #[test]
    fn renders_split_slot_and_active_half() {
        let mut session = EditorSession::default();
        let column = &session.score().columns()[0];
        let slot = Location::new(column.id(), column.measures()[1].id(), 0, 1);
        session
            .place_at(&slot.with_sub(1), "3", SymbolModifiers::none().with_ornament("ス"))
            .unwrap();

        let text = render_session(&session);
        assert!(text.contains("M2  | · [·/<3ス>] |"));
        assert!(text.contains("active: Column 1 - M2 - Beat 1 - 2nd 8th - 2nd 16th"));
    }

    #[test]
    fn palette_lists_sections_and_selection() {
        let session = EditorSession::default();
        let text = render_palette(&session);
        assert!(text.contains("San no ito (3rd): 1 1• 2 2•"));
        assert!(text.contains("Rest: ●"));
        assert!(text.ends_with("selected: 1 ornament: none accidental: none"));
    }
}
