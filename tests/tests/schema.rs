use automap::{
    ClassName, CollectionMapper, Configuration, ObjectStore, Primitive, Specification,
    Specifications,
};
use automap_core::stmt::{Statement, Value};
use automap_sql::Serializer;
use pretty_assertions::assert_eq;
use tests::{
    fixtures::{self, CUSTOMER, ORDER},
    DbTest,
};

fn ddl(stmt: impl Into<Statement>) -> String {
    let mut params: Vec<Value> = vec![];
    let sql = Serializer::sqlite().serialize(&stmt.into(), &mut params);
    assert!(params.is_empty());
    sql
}

#[test]
fn table_names() {
    let specs = Specifications::new()
        .with(Specification::new("my.pkg.CustomerOrder").value("number", Primitive::Text));
    let store = ObjectStore::new(&specs, &Configuration::new()).unwrap();
    let mapper = store
        .mapper(&ClassName::from("my.pkg.CustomerOrder"))
        .unwrap();
    assert_eq!(mapper.table().to_string(), "\"CUSTOMERORDER\"");

    let config = Configuration::new().set("automap.shop.Customer.table", "CLIENTS");
    let store = ObjectStore::new(&fixtures::shop(), &config).unwrap();
    let mapper = store.mapper(&CUSTOMER.into()).unwrap();
    assert_eq!(mapper.table().as_str(), "CLIENTS");
}

#[test]
fn create_tables_once() {
    let mut test = DbTest::setup_without_tables(&fixtures::shop(), &fixtures::owned_lines());
    assert!(test.store.needs_tables(&mut test.conn).unwrap());

    test.store.create_tables(&mut test.conn).unwrap();
    // CUSTOMER, ORDER, LINE, NOTE, TAG and ORDER_TAGS
    assert_eq!(test.log().creates(), 6);
    assert!(!test.store.needs_tables(&mut test.conn).unwrap());

    test.log().clear();
    test.store.create_tables(&mut test.conn).unwrap();
    assert_eq!(test.log().creates(), 0);
}

#[test]
fn missing_table_is_recreated() {
    let mut test = DbTest::setup(&fixtures::shop(), &fixtures::owned_lines());
    test.conn.execute_batch("DROP TABLE \"ORDER_TAGS\"").unwrap();
    assert!(test.store.needs_tables(&mut test.conn).unwrap());

    test.log().clear();
    test.store.create_tables(&mut test.conn).unwrap();
    assert_eq!(test.log().creates(), 1);
}

#[test]
fn owned_child_table() {
    let store = ObjectStore::new(&fixtures::shop(), &fixtures::owned_lines()).unwrap();
    let order = store.mapper(&ORDER.into()).unwrap();
    let Some(CollectionMapper::OwnedChild(lines)) = order.collection("lineItems") else {
        panic!("line items are not owned");
    };

    assert_eq!(
        ddl(lines.table_def()),
        "CREATE TABLE \"LINE\" (\"ID\" TEXT NOT NULL, \"PARENT\" TEXT NOT NULL, \
         \"PRODUCT\" TEXT, \"QUANTITY\" INTEGER, \"VERSION\" INTEGER NOT NULL, \
         \"MODIFIED\" INTEGER NOT NULL, PRIMARY KEY (\"ID\"));"
    );
}

#[test]
fn database_assigned_key_column() {
    let config = Configuration::new().set("automap.shop.Tag.db-ids", "true");
    let store = ObjectStore::new(&fixtures::shop(), &config).unwrap();
    let tag = store.mapper(&"shop.Tag".into()).unwrap();

    assert_eq!(
        ddl(tag.table_def(None)),
        "CREATE TABLE \"TAG\" (\"ID\" INTEGER PRIMARY KEY AUTOINCREMENT, \"LABEL\" TEXT, \
         \"VERSION\" INTEGER NOT NULL, \"MODIFIED\" INTEGER NOT NULL, \
         \"Order_tags\" TEXT);"
    );
}
