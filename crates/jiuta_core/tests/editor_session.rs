use jiuta_core::{
    EditError, EditorSession, Instrument, Location, ScoreDefaults, Slot, SymbolModifiers,
    REST_SYMBOL,
};

fn cell(session: &EditorSession, column: usize, beat: usize, slot: usize) -> Location {
    let column = &session.score().columns()[column];
    Location::new(column.id(), column.measures()[0].id(), beat, slot)
}

#[test]
fn new_session_uses_configured_defaults() {
    let session = EditorSession::from_defaults(&ScoreDefaults {
        title: "Rokudan".to_string(),
        tempo: 60,
        instrument: Instrument::Koto,
    });
    assert_eq!(session.score().title(), "Rokudan");
    assert_eq!(session.score().tempo(), 60);
    assert_eq!(session.score().columns().len(), 1);
    assert_eq!(session.selected_symbol(), "1");
    assert_eq!(session.active_cell(), None);
}

#[test]
fn deleting_column_of_active_cell_clears_it() {
    let mut session = EditorSession::default();
    session.add_column();
    let kept = cell(&session, 0, 0, 0);
    let doomed = cell(&session, 1, 2, 1);

    session.set_active_cell(kept);
    session.delete_column(doomed.column_id).unwrap();
    assert_eq!(session.active_cell(), Some(kept));

    session.add_column();
    let doomed = cell(&session, 1, 2, 1);
    session.set_active_cell(doomed);
    session.delete_column(doomed.column_id).unwrap();
    assert_eq!(session.active_cell(), None);
    assert_eq!(session.active_cell_label(), None);
}

#[test]
fn sub_slot_and_plain_slot_are_distinct_selections() {
    let mut session = EditorSession::default();
    let slot = cell(&session, 0, 1, 0);

    session.set_active_cell(slot.with_sub(0));
    assert!(session.is_active(&slot.with_sub(0)));
    assert!(!session.is_active(&slot));
    assert!(!session.is_active(&slot.with_sub(1)));

    session.set_active_cell(slot);
    assert!(session.is_active(&slot));
    assert!(!session.is_active(&slot.with_sub(0)));
}

#[test]
fn default_active_label_matches_first_cell() {
    let mut session = EditorSession::default();
    let first = cell(&session, 0, 0, 0);
    session.set_active_cell(first);
    assert_eq!(
        session.active_cell_label().as_deref(),
        Some("Column 1 - M1 - Beat 1 - 1st 8th")
    );
}

#[test]
fn instrument_change_resets_palette_selection() {
    let mut session = EditorSession::default();
    session.select_symbol("三").unwrap();
    session.select_ornament(Some("^")).unwrap();
    session.select_accidental(Some("♯")).unwrap();

    session.set_instrument(Instrument::Koto);

    assert_eq!(session.selected_symbol(), "1");
    assert_eq!(session.selected_ornament(), None);
    assert_eq!(session.selected_accidental(), None);
    assert_eq!(
        session.select_ornament(Some("^")).unwrap_err(),
        EditError::UnsupportedOrnament("^".to_string())
    );
    assert!(session.select_symbol("三").is_err());
    assert_eq!(session.selected_symbol(), "1");
}

#[test]
fn instrument_change_keeps_placed_symbols() {
    let mut session = EditorSession::default();
    let location = cell(&session, 0, 0, 0);
    let id = session
        .place_at(&location, "イ五", SymbolModifiers::none())
        .unwrap()
        .symbol_id;

    session.set_instrument(Instrument::Shakuhachi);

    assert_eq!(session.score().symbol_at(&location).unwrap().id(), id);
}

#[test]
fn palette_click_places_at_active_cell_with_selected_modifiers() {
    let mut session = EditorSession::default();
    let target = cell(&session, 0, 3, 1).with_sub(1);

    assert_eq!(
        session.place_at_active_cell("5").unwrap_err(),
        EditError::NoActiveCell
    );

    session.set_active_cell(target);
    session.select_accidental(Some("♯")).unwrap();
    session.select_ornament(Some("ス")).unwrap();
    let outcome = session.place_at_active_cell("五•").unwrap();

    assert_eq!(outcome.location, target);
    assert_eq!(session.selected_symbol(), "五•");
    let symbol = session.score().symbol_at(&target).unwrap();
    assert_eq!(symbol.label(), "五•♯ス");
    assert!(session.score().resolve_slot(&target).unwrap().is_split());
}

#[test]
fn rejected_palette_click_leaves_session_unchanged() {
    let mut session = EditorSession::default();
    let target = cell(&session, 0, 0, 0);
    session.set_active_cell(target);
    let before = session.score().clone();

    assert!(matches!(
        session.place_at_active_cell("メリ").unwrap_err(),
        EditError::IncompatibleSymbol { .. }
    ));
    assert_eq!(session.score(), &before);
    assert_eq!(session.selected_symbol(), "1");
    assert_eq!(session.active_cell(), Some(target));
}

#[test]
fn clearing_active_slot_removes_its_symbol() {
    let mut session = EditorSession::default();
    let target = cell(&session, 0, 2, 0);
    let id = session
        .place_at(&target, "8", SymbolModifiers::none())
        .unwrap()
        .symbol_id;
    assert_eq!(session.active_cell(), Some(target));

    assert_eq!(session.clear_active_slot().unwrap().id(), id);
    assert_eq!(
        session.clear_active_slot().unwrap_err(),
        EditError::SlotEmpty
    );

    session.clear_active_cell();
    assert_eq!(
        session.clear_active_slot().unwrap_err(),
        EditError::NoActiveCell
    );
}

#[test]
fn sakura_preset_fills_first_measure() {
    let mut session = EditorSession::default();
    let stray = cell(&session, 0, 1, 1);
    session
        .place_at(&stray, "9", SymbolModifiers::none())
        .unwrap();

    session.load_sakura_opening().unwrap();

    let measure = &session.score().columns()[0].measures()[0];
    let firsts = measure
        .beats()
        .iter()
        .map(|beat| match &beat.slots()[0] {
            Slot::Simple(symbol) => symbol.base().to_string(),
            other => panic!("expected a plain symbol, got {other:?}"),
        })
        .collect::<Vec<_>>();
    assert_eq!(firsts, vec!["5", "5", "7", REST_SYMBOL]);
    assert!(measure.beats().iter().all(|beat| beat.slots()[1].is_empty()));
}

#[test]
fn sakura_preset_loads_even_on_koto() {
    let mut session = EditorSession::default();
    session.set_instrument(Instrument::Koto);

    session.load_sakura_opening().unwrap();

    assert_eq!(session.score().symbols().count(), 4);
}

#[test]
fn tempo_and_title_edits_apply_to_score() {
    let mut session = EditorSession::default();
    assert_eq!(session.set_tempo(10), 30);
    assert_eq!(session.set_tempo(96), 96);
    assert_eq!(session.score().tempo(), 96);

    session.set_title("   ");
    assert_eq!(session.score().display_title(), "Untitled");
    session.set_title("Kurokami");
    assert_eq!(session.score().display_title(), "Kurokami");
}

#[test]
fn palette_click_can_place_current_selection() {
    let mut session = EditorSession::default();
    let target = cell(&session, 0, 0, 1);
    session.select_symbol("八").unwrap();

    assert_eq!(
        session.place_selected_at_active_cell().unwrap_err(),
        EditError::NoActiveCell
    );

    session.set_active_cell(target);
    let outcome = session.place_selected_at_active_cell().unwrap();
    assert_eq!(outcome.location, target);
    assert_eq!(session.score().symbol_at(&target).unwrap().base(), "八");
}
