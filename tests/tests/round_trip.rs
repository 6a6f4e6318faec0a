use automap::{Configuration, Key, Oid, ResolveState, Session};
use automap_core::stmt::Value;
use tests::{
    fixtures::{self, CUSTOMER, ORDER},
    DbTest,
};

fn saved_customer(test: &mut DbTest, session: &mut Session, name: &str) -> Oid {
    let customer = session.create_instance(CUSTOMER);
    session.set_value(customer, "name", name);
    session.set_value(customer, "vip", true);
    session.set_value(customer, "since", "2024-05-01T10:00:00+00:00");
    test.store.save(&mut test.conn, session, customer).unwrap();

    session.adapter(customer).oid().cloned().unwrap()
}

#[test]
fn primitive_fields_round_trip() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();
    let oid = saved_customer(&mut test, &mut session, "Ada");
    let customer = session.lookup(&oid).unwrap();

    let mut fresh = Session::new();
    let loaded = test.store.load(&mut test.conn, &mut fresh, &oid).unwrap();

    let adapter = fresh.adapter(loaded);
    assert_eq!(adapter.state(), ResolveState::Resolved);
    assert!(!adapter.is_dirty());
    assert_eq!(adapter.version(), session.adapter(customer).version());

    for field in ["name", "vip", "since"] {
        assert_eq!(fresh.value(loaded, field), session.value(customer, field));
    }
    assert_eq!(fresh.value(loaded, "vip"), &Value::Bool(true));
}

#[test]
fn unset_fields_load_as_null() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();

    let customer = session.create_instance(CUSTOMER);
    session.set_value(customer, "name", "Bo");
    test.store.save(&mut test.conn, &mut session, customer).unwrap();
    let oid = session.adapter(customer).oid().cloned().unwrap();

    let mut fresh = Session::new();
    let loaded = test.store.load(&mut test.conn, &mut fresh, &oid).unwrap();
    assert_eq!(fresh.value(loaded, "name"), &Value::from("Bo"));
    assert!(fresh.value(loaded, "vip").is_null());
    assert!(fresh.value(loaded, "since").is_null());
}

#[test]
fn references_load_as_ghosts() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();
    let customer_oid = saved_customer(&mut test, &mut session, "Ada");

    let order = session.create_instance(ORDER);
    session.set_value(order, "number", "A-1");
    session.set_value(order, "total", 12.5);
    session.set_reference(order, "customer", session.lookup(&customer_oid));
    test.store.save(&mut test.conn, &mut session, order).unwrap();
    let order_oid = session.adapter(order).oid().cloned().unwrap();

    let mut fresh = Session::new();
    let loaded = test.store.load(&mut test.conn, &mut fresh, &order_oid).unwrap();
    assert_eq!(fresh.value(loaded, "total"), &Value::F64(12.5));

    let customer = fresh.reference(loaded, "customer").unwrap();
    assert_eq!(fresh.adapter(customer).state(), ResolveState::Ghost);
    assert_eq!(fresh.adapter(customer).oid(), Some(&customer_oid));

    test.store.resolve(&mut test.conn, &mut fresh, customer).unwrap();
    assert_eq!(fresh.value(customer, "name"), &Value::from("Ada"));
}

#[test]
fn reference_to_unsaved_object_is_rejected() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();

    let customer = session.create_instance(CUSTOMER);
    let order = session.create_instance(ORDER);
    session.set_reference(order, "customer", Some(customer));

    let err = test
        .store
        .save(&mut test.conn, &mut session, order)
        .unwrap_err();
    assert!(err.root().is_invalid_state());
    assert_eq!(session.adapter(order).state(), ResolveState::Transient);
}

#[test]
fn database_assigned_keys() {
    let config = Configuration::new().set("automap.shop.Customer.db-ids", "true");
    let mut test = DbTest::setup(&fixtures::shop(), &config);
    let mut session = Session::new();

    let first = saved_customer(&mut test, &mut session, "Ada");
    let second = saved_customer(&mut test, &mut session, "Bo");
    assert_eq!(first.key, Key::Int(1));
    assert_eq!(second.key, Key::Int(2));

    let mut fresh = Session::new();
    let loaded = test.store.load(&mut test.conn, &mut fresh, &second).unwrap();
    assert_eq!(fresh.value(loaded, "name"), &Value::from("Bo"));
}

#[test]
fn changed_object_is_updated() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();
    let oid = saved_customer(&mut test, &mut session, "Ada");

    let mut second = Session::new();
    let customer = test.store.load(&mut test.conn, &mut second, &oid).unwrap();
    let before = *second.adapter(customer).version().unwrap();

    second.set_value(customer, "name", "Ada L.");
    assert!(second.adapter(customer).is_dirty());
    test.store.save(&mut test.conn, &mut second, customer).unwrap();

    let after = *second.adapter(customer).version().unwrap();
    assert_eq!(after.serial, before.serial + 1);
    assert!(after.time > before.time);

    let mut third = Session::new();
    let reloaded = test.store.load(&mut test.conn, &mut third, &oid).unwrap();
    assert_eq!(third.value(reloaded, "name"), &Value::from("Ada L."));
    assert_eq!(third.adapter(reloaded).version(), Some(&after));
}

#[test]
fn unchanged_object_is_not_written() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();
    let oid = saved_customer(&mut test, &mut session, "Ada");
    let customer = session.lookup(&oid).unwrap();

    test.log().clear();
    test.store.save(&mut test.conn, &mut session, customer).unwrap();
    assert!(test.log().is_empty());
}

#[test]
fn loading_twice_reads_once() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();
    let oid = saved_customer(&mut test, &mut session, "Ada");

    let mut fresh = Session::new();
    test.log().clear();
    let first = test.store.load(&mut test.conn, &mut fresh, &oid).unwrap();
    let second = test.store.load(&mut test.conn, &mut fresh, &oid).unwrap();

    assert_eq!(first, second);
    assert_eq!(test.log().selects(), 1);
}

#[test]
fn missing_row_is_not_found() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();
    let oid = Oid::new(CUSTOMER, Key::generate());

    let err = test
        .store
        .load(&mut test.conn, &mut session, &oid)
        .unwrap_err();
    assert!(err.is_object_not_found());

    let ghost = session.lookup(&oid).unwrap();
    assert_eq!(session.adapter(ghost).state(), ResolveState::Ghost);
}

#[test]
fn changing_an_unloaded_object_fails_the_save() {
    let mut test = DbTest::setup(&fixtures::shop(), &Configuration::new());
    let mut session = Session::new();
    let oid = saved_customer(&mut test, &mut session, "Ada");

    let mut other = Session::new();
    let ghost = other.adapter_for(oid.clone());
    other.set_value(ghost, "name", "Bob");
    assert!(other.adapter(ghost).is_dirty());

    test.log().clear();
    let err = test
        .store
        .save(&mut test.conn, &mut other, ghost)
        .unwrap_err();
    assert!(err.is_invalid_state());
    assert!(test.log().is_empty());
    assert!(other.adapter(ghost).is_dirty());

    let mut fresh = Session::new();
    let stored = test.store.load(&mut test.conn, &mut fresh, &oid).unwrap();
    assert_eq!(fresh.value(stored, "name"), &Value::from("Ada"));
}
