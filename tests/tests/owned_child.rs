use automap::{AdapterId, Oid, ResolveState, Session};
use automap_core::stmt::Value;
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{self, LINE, NOTE, ORDER},
    DbTest,
};

fn line(session: &mut Session, product: &str, quantity: i64, notes: &[&str]) -> AdapterId {
    let line = session.create_instance(LINE);
    session.set_value(line, "product", product);
    session.set_value(line, "quantity", quantity);
    for text in notes {
        let note = session.create_instance(NOTE);
        session.set_value(note, "text", *text);
        session.add_element(line, "notes", note).unwrap();
    }
    line
}

/// Saves an order with two lines; the first line carries two notes.
fn saved_order(test: &mut DbTest, session: &mut Session) -> Oid {
    let order = session.create_instance(ORDER);
    session.set_value(order, "number", "A-1");

    let first = line(session, "bolt", 10, &["zinc", "M6"]);
    let second = line(session, "nut", 20, &[]);
    session.add_element(order, "lineItems", first).unwrap();
    session.add_element(order, "lineItems", second).unwrap();

    test.store.save(&mut test.conn, session, order).unwrap();
    session.adapter(order).oid().cloned().unwrap()
}

/// `(product, quantity)` of every line, in collection order.
fn line_values(session: &Session, order: AdapterId) -> Vec<(Value, Value)> {
    session
        .elements(order, "lineItems")
        .iter()
        .map(|line| {
            (
                session.value(*line, "product").clone(),
                session.value(*line, "quantity").clone(),
            )
        })
        .collect()
}

fn load_lines(test: &mut DbTest, session: &mut Session, oid: &Oid) -> AdapterId {
    let order = test.store.load(&mut test.conn, session, oid).unwrap();
    test.store
        .resolve_collection(&mut test.conn, session, order, "lineItems")
        .unwrap();
    order
}

#[test]
fn children_round_trip() {
    let mut test = DbTest::setup(&fixtures::shop(), &fixtures::owned_lines());
    let mut session = Session::new();
    let oid = saved_order(&mut test, &mut session);
    let order = session.lookup(&oid).unwrap();

    for line in session.elements(order, "lineItems") {
        let adapter = session.adapter(*line);
        assert_eq!(adapter.state(), ResolveState::Resolved);
        assert_eq!(adapter.version().unwrap().serial, 0);
        assert!(!adapter.is_dirty());
    }

    let mut fresh = Session::new();
    let loaded = load_lines(&mut test, &mut fresh, &oid);
    assert_eq!(line_values(&fresh, loaded), line_values(&session, order));

    // Children are read with their rows, not as ghosts.
    for line in fresh.elements(loaded, "lineItems") {
        assert_eq!(fresh.adapter(*line).state(), ResolveState::Resolved);
    }
}

#[test]
fn nested_children_are_loaded_through_their_owner() {
    let mut test = DbTest::setup(&fixtures::shop(), &fixtures::owned_lines());
    let mut session = Session::new();
    let oid = saved_order(&mut test, &mut session);

    let mut fresh = Session::new();
    let order = load_lines(&mut test, &mut fresh, &oid);
    let bolt = fresh.elements(order, "lineItems")[0];
    assert_eq!(fresh.value(bolt, "product"), &Value::from("bolt"));

    test.store
        .resolve_collection(&mut test.conn, &mut fresh, bolt, "notes")
        .unwrap();

    let mut texts: Vec<_> = fresh
        .elements(bolt, "notes")
        .iter()
        .map(|note| fresh.value(*note, "text").clone())
        .collect();
    texts.sort_by_key(|text| text.as_str().unwrap_or_default().to_string());
    assert_eq!(texts, [Value::from("M6"), Value::from("zinc")]);
}

#[test]
fn resave_stamps_fresh_versions() {
    let mut test = DbTest::setup(&fixtures::shop(), &fixtures::owned_lines());
    let mut session = Session::new();
    let oid = saved_order(&mut test, &mut session);
    let order = session.lookup(&oid).unwrap();

    let first = session.elements(order, "lineItems")[0];
    let before = *session.adapter(first).version().unwrap();

    session.set_value(first, "quantity", 11_i64);
    test.store.save(&mut test.conn, &mut session, order).unwrap();

    let after = *session.adapter(first).version().unwrap();
    assert_ne!(after, before);
    assert!(after.time > before.time);

    let mut fresh = Session::new();
    let loaded = load_lines(&mut test, &mut fresh, &oid);
    assert_eq!(line_values(&fresh, loaded), line_values(&session, order));

    // Notes of a kept line stay attached.
    let bolt = fresh.elements(loaded, "lineItems")[0];
    test.store
        .resolve_collection(&mut test.conn, &mut fresh, bolt, "notes")
        .unwrap();
    assert_eq!(fresh.elements(bolt, "notes").len(), 2);
}

#[test]
fn removed_child_takes_its_rows_along() {
    let mut test = DbTest::setup(&fixtures::shop(), &fixtures::owned_lines());
    let mut session = Session::new();
    let oid = saved_order(&mut test, &mut session);
    assert_eq!(test.count_rows("LINE"), 2);
    assert_eq!(test.count_rows("NOTE"), 2);

    let mut fresh = Session::new();
    let order = load_lines(&mut test, &mut fresh, &oid);
    let bolt = fresh.elements(order, "lineItems")[0];
    assert!(fresh.remove_element(order, "lineItems", bolt).unwrap());
    test.store.save(&mut test.conn, &mut fresh, order).unwrap();

    assert_eq!(test.count_rows("LINE"), 1);
    assert_eq!(test.count_rows("NOTE"), 0);
}

#[test]
fn destroying_the_owner_removes_all_children() {
    let mut test = DbTest::setup(&fixtures::shop(), &fixtures::owned_lines());
    let mut session = Session::new();
    let oid = saved_order(&mut test, &mut session);
    let order = session.lookup(&oid).unwrap();

    test.store.destroy(&mut test.conn, &mut session, order).unwrap();

    assert_eq!(test.count_rows("ORDER"), 0);
    assert_eq!(test.count_rows("LINE"), 0);
    assert_eq!(test.count_rows("NOTE"), 0);
}

#[test]
fn owned_class_is_only_reachable_through_its_owner() {
    let mut test = DbTest::setup(&fixtures::shop(), &fixtures::owned_lines());
    let mut session = Session::new();

    let err = test
        .store
        .count_instances(&mut test.conn, &LINE.into())
        .unwrap_err();
    assert!(err.is_invalid_state());

    let line = line(&mut session, "bolt", 1, &[]);
    let err = test
        .store
        .save(&mut test.conn, &mut session, line)
        .unwrap_err();
    assert!(err.is_invalid_state());
    assert_eq!(session.adapter(line).state(), ResolveState::Transient);
}
