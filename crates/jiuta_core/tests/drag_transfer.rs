use jiuta_core::{
    DragPayload, DropOutcome, EditError, EditorSession, Instrument, Location, SymbolModifiers,
};
use uuid::Uuid;

fn beat_slot(session: &EditorSession, beat: usize, slot: usize) -> Location {
    let column = &session.score().columns()[0];
    Location::new(column.id(), column.measures()[0].id(), beat, slot)
}

#[test]
fn palette_drop_places_symbol_and_activates_target() {
    let mut session = EditorSession::default();
    session.select_ornament(Some("ス")).unwrap();
    let target = beat_slot(&session, 2, 1);
    let payload = session.palette_drag_payload("8•");

    assert!(session.drag_over(&payload, &target));
    let outcome = session.drop(&payload, &target).unwrap();

    assert!(matches!(outcome, DropOutcome::Placed(_)));
    let symbol = session.score().symbol_at(&target).unwrap();
    assert_eq!(symbol.id(), outcome.symbol_id());
    assert_eq!(symbol.label(), "8•ス");
    assert_eq!(session.active_cell(), Some(target));
}

#[test]
fn moving_onto_occupied_slot_overwrites_it() {
    let mut session = EditorSession::default();
    let a = beat_slot(&session, 0, 0);
    let b = beat_slot(&session, 0, 1);
    let moving = session
        .place_at(&a, "3", SymbolModifiers::none())
        .unwrap()
        .symbol_id;
    let occupant = session
        .place_at(&b, "4", SymbolModifiers::none())
        .unwrap()
        .symbol_id;

    let payload = EditorSession::existing_drag_payload(moving);
    let outcome = session.drop(&payload, &b).unwrap();

    assert_eq!(outcome.displaced(), &[occupant]);
    assert!(session.score().resolve_slot(&a).unwrap().is_empty());
    let moved = session.score().symbol_at(&b).unwrap();
    assert_eq!(moved.id(), moving);
    assert_eq!(moved.base(), "3");
    assert!(!session.score().contains_symbol(occupant));
}

#[test]
fn drag_over_never_mutates() {
    let mut session = EditorSession::default();
    let source = beat_slot(&session, 1, 0);
    let target = beat_slot(&session, 3, 1);
    let id = session
        .place_at(&source, "9", SymbolModifiers::none())
        .unwrap()
        .symbol_id;
    session.clear_active_cell();
    let before = session.score().clone();

    let payloads = [
        EditorSession::existing_drag_payload(id),
        session.palette_drag_payload("5"),
        session.palette_drag_payload("ロ"),
        "garbage".to_string(),
    ];
    for payload in &payloads {
        for _ in 0..3 {
            session.drag_over(payload, &target);
        }
    }

    assert_eq!(session.score(), &before);
    assert_eq!(session.active_cell(), None);
    assert!(session.drag_over(&payloads[0], &target));
    assert!(session.drag_over(&payloads[1], &target));
    assert!(!session.drag_over(&payloads[2], &target));
    assert!(!session.drag_over(&payloads[3], &target));
}

#[test]
fn malformed_drop_is_a_no_op() {
    let mut session = EditorSession::default();
    let target = beat_slot(&session, 0, 0);
    let before = session.score().clone();

    for raw in ["", "{", r#"{"type":"palette-symbol"}"#, r#"{"type":"teleport"}"#] {
        let err = session.drop(raw, &target).unwrap_err();
        assert!(matches!(err, EditError::MalformedPayload(_)));
    }
    assert_eq!(session.score(), &before);
    assert_eq!(session.active_cell(), None);
}

#[test]
fn existing_symbol_is_followed_after_it_moved() {
    let mut session = EditorSession::default();
    let start = beat_slot(&session, 0, 0);
    let middle = beat_slot(&session, 1, 1);
    let end = beat_slot(&session, 2, 0).with_sub(1);
    let id = session
        .place_at(&start, "七", SymbolModifiers::none())
        .unwrap()
        .symbol_id;

    // Payload built before the symbol moved.
    let payload = EditorSession::existing_drag_payload(id);
    session.move_symbol(id, &middle).unwrap();

    let outcome = session.drop(&payload, &end).unwrap();
    match outcome {
        DropOutcome::Moved(moved) => {
            assert_eq!(moved.from, middle);
            assert_eq!(moved.to, end);
        }
        other => panic!("expected a move, got {other:?}"),
    }
    assert!(session.score().resolve_slot(&middle).unwrap().is_empty());
    assert_eq!(
        session.score().find_symbol_location(id).unwrap().location,
        end
    );
}

#[test]
fn removed_symbol_payload_is_rejected() {
    let mut session = EditorSession::default();
    let source = beat_slot(&session, 0, 0);
    let target = beat_slot(&session, 0, 1);
    let id = session
        .place_at(&source, "1", SymbolModifiers::none())
        .unwrap()
        .symbol_id;
    session.remove_at(&source).unwrap();
    let payload = EditorSession::existing_drag_payload(id);
    let before = session.score().clone();

    assert!(!session.drag_over(&payload, &target));
    assert_eq!(
        session.drop(&payload, &target).unwrap_err(),
        EditError::SymbolNotFound(id)
    );
    assert_eq!(session.score(), &before);

    let unknown = EditorSession::existing_drag_payload(Uuid::new_v4());
    assert!(!session.drag_over(&unknown, &target));
}

#[test]
fn palette_payload_is_checked_against_instrument_at_drop_time() {
    let mut session = EditorSession::default();
    let target = beat_slot(&session, 0, 0);
    let payload = session.palette_drag_payload("5•");

    session.set_instrument(Instrument::Koto);

    assert!(!session.drag_over(&payload, &target));
    assert!(matches!(
        session.drop(&payload, &target).unwrap_err(),
        EditError::IncompatibleSymbol { .. }
    ));
    assert!(session.score().symbol_at(&target).is_none());
}

#[test]
fn moved_symbol_must_suit_current_instrument() {
    let mut session = EditorSession::default();
    let source = beat_slot(&session, 0, 0);
    let target = beat_slot(&session, 1, 0);
    let id = session
        .place_at(&source, "一", SymbolModifiers::none())
        .unwrap()
        .symbol_id;
    session.set_instrument(Instrument::Shakuhachi);

    let payload = EditorSession::existing_drag_payload(id);
    assert!(!session.drag_over(&payload, &target));
    assert!(session.drop(&payload, &target).is_err());
    assert_eq!(
        session.score().find_symbol_location(id).unwrap().location,
        source
    );
}

#[test]
fn payload_wire_text_round_trips_through_parse() {
    let session = EditorSession::default();
    let raw = session.palette_drag_payload("●");
    assert!(raw.contains(r#""type":"palette-symbol""#));
    let parsed = DragPayload::parse(&raw).unwrap();
    assert_eq!(parsed.to_json(), raw);
}

#[test]
fn moving_symbol_onto_its_own_location_changes_nothing() {
    let mut session = EditorSession::default();
    let plain = beat_slot(&session, 0, 0);
    let half = beat_slot(&session, 1, 1).with_sub(1);
    let plain_id = session
        .place_at(&plain, "5", SymbolModifiers::none())
        .unwrap()
        .symbol_id;
    let half_id = session
        .place_at(&half, "6", SymbolModifiers::none())
        .unwrap()
        .symbol_id;
    let before = session.score().clone();

    for (id, location) in [(plain_id, plain), (half_id, half)] {
        let outcome = session.move_symbol(id, &location).unwrap();
        assert!(outcome.displaced.is_empty());
        assert_eq!(outcome.from, location);
        assert_eq!(outcome.to, location);
        assert_eq!(session.score(), &before);
    }

    let outcome = session
        .drop(&EditorSession::existing_drag_payload(half_id), &half)
        .unwrap();
    assert!(outcome.displaced().is_empty());
    assert_eq!(session.score(), &before);
}

#[test]
fn selected_symbol_drags_with_selected_modifiers() {
    let mut session = EditorSession::default();
    let target = beat_slot(&session, 3, 0);
    session.select_symbol("イ二•").unwrap();
    session.select_accidental(Some("♭")).unwrap();

    let payload = session.selected_drag_payload();
    assert!(session.drag_over(&payload, &target));
    session.drop(&payload, &target).unwrap();

    assert_eq!(session.score().symbol_at(&target).unwrap().label(), "イ二•♭");
}

#[test]
fn lowercase_payload_instrument_is_still_accepted() {
    let mut session = EditorSession::default();
    let target = beat_slot(&session, 0, 0);
    let raw = r#"{"type":"palette-symbol","base":"5","instrument":"shamisen"}"#;

    assert!(session.drag_over(raw, &target));
    assert!(session.drop(raw, &target).is_ok());
    assert_eq!(session.score().symbol_at(&target).unwrap().base(), "5");
}
