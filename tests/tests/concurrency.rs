use automap::{Configuration, Oid, ResolveState, Session};
use automap_core::stmt::Value;
use tests::{
    fixtures::{self, CUSTOMER},
    DbTest,
};

fn saved_customer(test: &mut DbTest) -> Oid {
    let mut session = Session::new();
    let customer = session.create_instance(CUSTOMER);
    session.set_value(customer, "name", "Ada");
    test.store.save(&mut test.conn, &mut session, customer).unwrap();
    session.adapter(customer).oid().cloned().unwrap()
}

#[test]
fn stale_update_is_rejected() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let oid = saved_customer(&mut test);

    let mut first = Session::new();
    let mut second = Session::new();
    let a = test.store.load(&mut test.conn, &mut first, &oid).unwrap();
    let b = test.store.load(&mut test.conn, &mut second, &oid).unwrap();

    first.set_value(a, "name", "first");
    test.store.save(&mut test.conn, &mut first, a).unwrap();

    second.set_value(b, "name", "second");
    let err = test
        .store
        .save(&mut test.conn, &mut second, b)
        .unwrap_err();
    assert!(err.is_concurrent_modification());
    assert!(second.adapter(b).is_dirty());

    let mut third = Session::new();
    let stored = test.store.load(&mut test.conn, &mut third, &oid).unwrap();
    assert_eq!(third.value(stored, "name"), &Value::from("first"));
}

#[test]
fn stale_destroy_is_rejected() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let oid = saved_customer(&mut test);

    let mut first = Session::new();
    let mut second = Session::new();
    let a = test.store.load(&mut test.conn, &mut first, &oid).unwrap();
    let b = test.store.load(&mut test.conn, &mut second, &oid).unwrap();

    first.set_value(a, "vip", true);
    test.store.save(&mut test.conn, &mut first, a).unwrap();

    let err = test
        .store
        .destroy(&mut test.conn, &mut second, b)
        .unwrap_err();
    assert!(err.is_concurrent_modification());
    assert_eq!(second.adapter(b).state(), ResolveState::Resolved);
    assert_eq!(test.count_rows("CUSTOMER"), 1);
}

#[test]
fn destroyed_row_cannot_be_updated() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let oid = saved_customer(&mut test);

    let mut first = Session::new();
    let mut second = Session::new();
    let a = test.store.load(&mut test.conn, &mut first, &oid).unwrap();
    let b = test.store.load(&mut test.conn, &mut second, &oid).unwrap();

    test.store.destroy(&mut test.conn, &mut first, a).unwrap();

    second.set_value(b, "name", "late");
    let err = test
        .store
        .save(&mut test.conn, &mut second, b)
        .unwrap_err();
    assert!(err.is_concurrent_modification());
}

#[test]
fn rolled_back_save_leaves_no_row() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());

    test.conn.execute_batch("BEGIN").unwrap();
    saved_customer(&mut test);
    assert_eq!(test.count_rows("CUSTOMER"), 1);
    test.conn.execute_batch("ROLLBACK").unwrap();

    let count = test
        .store
        .count_instances(&mut test.conn, &CUSTOMER.into())
        .unwrap();
    assert_eq!(count, 0);
}
