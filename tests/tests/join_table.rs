use automap::{AdapterId, Configuration, Oid, ResolveState, Session};
use automap_core::stmt::Statement;
use std::collections::HashSet;
use tests::{
    fixtures::{self, ORDER, TAG},
    ConnectorOp, DbTest,
};

fn config() -> Configuration {
    Configuration::new().set("automap.shop.Order.mapper.tags", "join-table")
}

fn saved_tag(test: &mut DbTest, session: &mut Session, label: &str) -> AdapterId {
    let tag = session.create_instance(TAG);
    session.set_value(tag, "label", label);
    test.store.save(&mut test.conn, session, tag).unwrap();
    tag
}

fn oids(session: &Session, objects: &[AdapterId]) -> HashSet<Oid> {
    objects
        .iter()
        .map(|object| session.adapter(*object).oid().cloned().unwrap())
        .collect()
}

/// Saves an order tagged with `labels`; returns the order and its tags.
fn tagged_order(
    test: &mut DbTest,
    session: &mut Session,
    labels: &[&str],
) -> (AdapterId, Vec<AdapterId>) {
    let tags: Vec<_> = labels
        .iter()
        .map(|label| saved_tag(test, session, label))
        .collect();

    let order = session.create_instance(ORDER);
    session.set_value(order, "number", "A-1");
    for tag in &tags {
        session.add_element(order, "tags", *tag).unwrap();
    }
    test.store.save(&mut test.conn, session, order).unwrap();
    (order, tags)
}

#[test]
fn collection_round_trip() {
    let mut test = DbTest::setup(&fixtures::shop(), &config());
    let mut session = Session::new();
    let (order, tags) = tagged_order(&mut test, &mut session, &["red", "green", "blue"]);
    let order_oid = session.adapter(order).oid().cloned().unwrap();

    let mut fresh = Session::new();
    let loaded = test.store.load(&mut test.conn, &mut fresh, &order_oid).unwrap();
    let collection = fresh.adapter(loaded).collection("tags");
    assert!(collection.map_or(true, |c| c.state() == ResolveState::Ghost));

    test.store
        .resolve_collection(&mut test.conn, &mut fresh, loaded, "tags")
        .unwrap();

    let elements = fresh.elements(loaded, "tags").to_vec();
    assert_eq!(oids(&fresh, &elements), oids(&session, &tags));
    for element in &elements {
        assert_eq!(fresh.adapter(*element).state(), ResolveState::Ghost);
    }
    assert!(!fresh.adapter(loaded).is_dirty());
}

#[test]
fn loaded_collection_is_not_read_again() {
    let mut test = DbTest::setup(&fixtures::shop(), &config());
    let mut session = Session::new();
    let (order, _) = tagged_order(&mut test, &mut session, &["red"]);
    let order_oid = session.adapter(order).oid().cloned().unwrap();

    let mut fresh = Session::new();
    let loaded = test.store.load(&mut test.conn, &mut fresh, &order_oid).unwrap();
    test.store
        .resolve_collection(&mut test.conn, &mut fresh, loaded, "tags")
        .unwrap();

    test.log().clear();
    test.store
        .resolve_collection(&mut test.conn, &mut fresh, loaded, "tags")
        .unwrap();
    assert!(test.log().is_empty());
}

#[test]
fn removed_element_is_unlinked() {
    let mut test = DbTest::setup(&fixtures::shop(), &config());
    let mut session = Session::new();
    let (order, tags) = tagged_order(&mut test, &mut session, &["red", "green"]);
    let order_oid = session.adapter(order).oid().cloned().unwrap();

    let mut second = Session::new();
    let loaded = test.store.load(&mut test.conn, &mut second, &order_oid).unwrap();
    test.store
        .resolve_collection(&mut test.conn, &mut second, loaded, "tags")
        .unwrap();

    let red = second
        .lookup(session.adapter(tags[0]).oid().unwrap())
        .unwrap();
    assert!(second.remove_element(loaded, "tags", red).unwrap());

    test.log().clear();
    test.store.save(&mut test.conn, &mut second, loaded).unwrap();

    // Row update, then the links are replaced wholesale.
    assert!(matches!(test.log().pop(), ConnectorOp::Update(Statement::Update(_))));
    assert!(matches!(test.log().pop(), ConnectorOp::Update(Statement::Delete(_))));
    assert!(matches!(test.log().pop(), ConnectorOp::Update(Statement::Insert(_))));
    assert!(test.log().is_empty());

    let mut third = Session::new();
    let reloaded = test.store.load(&mut test.conn, &mut third, &order_oid).unwrap();
    test.store
        .resolve_collection(&mut test.conn, &mut third, reloaded, "tags")
        .unwrap();

    let elements = third.elements(reloaded, "tags").to_vec();
    assert_eq!(oids(&third, &elements), oids(&session, &tags[1..]));
}

#[test]
fn unsaved_element_fails_the_save() {
    let mut test = DbTest::setup(&fixtures::shop(), &config());
    let mut session = Session::new();

    let tag = session.create_instance(TAG);
    let order = session.create_instance(ORDER);
    session.add_element(order, "tags", tag).unwrap();

    let err = test
        .store
        .save(&mut test.conn, &mut session, order)
        .unwrap_err();
    assert!(err.root().is_invalid_state());
}

#[test]
fn destroying_the_owner_removes_links() {
    let mut test = DbTest::setup(&fixtures::shop(), &config());
    let mut session = Session::new();
    let (order, tags) = tagged_order(&mut test, &mut session, &["red", "green"]);

    test.store.destroy(&mut test.conn, &mut session, order).unwrap();
    assert_eq!(session.adapter(order).state(), ResolveState::Destroyed);

    // Tags are shared; only the links go away.
    let count = test
        .store
        .count_instances(&mut test.conn, &TAG.into())
        .unwrap();
    assert_eq!(count, tags.len() as u64);

    assert_eq!(test.count_rows("ORDER_TAGS"), 0);
}
