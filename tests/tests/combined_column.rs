use automap::{AdapterId, Configuration, Oid, Session};
use automap_core::stmt::Value;
use std::collections::HashSet;
use tests::{
    fixtures::{self, LINE, ORDER},
    DbTest,
};

fn saved_line(test: &mut DbTest, session: &mut Session, product: &str) -> AdapterId {
    let line = session.create_instance(LINE);
    session.set_value(line, "product", product);
    test.store.save(&mut test.conn, session, line).unwrap();
    line
}

fn saved_order(test: &mut DbTest, session: &mut Session, lines: &[AdapterId]) -> Oid {
    let order = session.create_instance(ORDER);
    for line in lines {
        session.add_element(order, "lineItems", *line).unwrap();
    }
    test.store.save(&mut test.conn, session, order).unwrap();
    session.adapter(order).oid().cloned().unwrap()
}

fn stored_products(test: &mut DbTest, oid: &Oid) -> HashSet<String> {
    let mut session = Session::new();
    let order = test.store.load(&mut test.conn, &mut session, oid).unwrap();
    test.store
        .resolve_collection(&mut test.conn, &mut session, order, "lineItems")
        .unwrap();

    let lines = session.elements(order, "lineItems").to_vec();
    lines
        .into_iter()
        .map(|line| {
            test.store.resolve(&mut test.conn, &mut session, line).unwrap();
            session.value(line, "product").as_str().unwrap().to_string()
        })
        .collect()
}

fn products(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn collection_round_trip() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();

    let bolt = saved_line(&mut test, &mut session, "bolt");
    let nut = saved_line(&mut test, &mut session, "nut");
    let oid = saved_order(&mut test, &mut session, &[bolt, nut]);

    assert_eq!(stored_products(&mut test, &oid), products(&["bolt", "nut"]));
}

#[test]
fn element_moves_to_its_new_owner() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();

    let bolt = saved_line(&mut test, &mut session, "bolt");
    let nut = saved_line(&mut test, &mut session, "nut");
    let first = saved_order(&mut test, &mut session, &[bolt, nut]);
    let second = saved_order(&mut test, &mut session, &[nut]);

    assert_eq!(stored_products(&mut test, &first), products(&["bolt"]));
    assert_eq!(stored_products(&mut test, &second), products(&["nut"]));
}

#[test]
fn element_save_keeps_its_owner() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();

    let bolt = saved_line(&mut test, &mut session, "bolt");
    let oid = saved_order(&mut test, &mut session, &[bolt]);

    session.set_value(bolt, "product", "hex bolt");
    test.store.save(&mut test.conn, &mut session, bolt).unwrap();

    assert_eq!(stored_products(&mut test, &oid), products(&["hex bolt"]));
}

#[test]
fn removed_element_is_detached_not_deleted() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();

    let bolt = saved_line(&mut test, &mut session, "bolt");
    let nut = saved_line(&mut test, &mut session, "nut");
    let oid = saved_order(&mut test, &mut session, &[bolt, nut]);
    let order = session.lookup(&oid).unwrap();

    session.remove_element(order, "lineItems", bolt).unwrap();
    test.store.save(&mut test.conn, &mut session, order).unwrap();

    assert_eq!(stored_products(&mut test, &oid), products(&["nut"]));
    assert_eq!(test.count_rows("LINE"), 2);

    let mut fresh = Session::new();
    let bolt_oid = session.adapter(bolt).oid().cloned().unwrap();
    let loaded = test.store.load(&mut test.conn, &mut fresh, &bolt_oid).unwrap();
    assert_eq!(fresh.value(loaded, "product"), &Value::from("bolt"));
}
