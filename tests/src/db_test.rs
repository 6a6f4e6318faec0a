use crate::{ExecLog, LoggingConnector};
use automap::{Configuration, DatabaseConnector, ObjectStore, Specifications};
use automap_core::stmt::Select;
use automap_driver_sqlite::Sqlite;

/// An object store wired to a fresh in-memory SQLite database.
///
/// Every connector call is logged; the log starts out empty once the tables
/// exist.
pub struct DbTest {
    pub store: ObjectStore,
    pub conn: LoggingConnector,
    log: ExecLog,
}

impl DbTest {
    /// Builds the store and creates its tables.
    pub fn setup(specs: &Specifications, config: &Configuration) -> DbTest {
        let mut test = DbTest::setup_without_tables(specs, config);
        test.store.create_tables(&mut test.conn).unwrap();
        test.log.clear();
        test
    }

    /// Builds the store on an empty database.
    pub fn setup_without_tables(specs: &Specifications, config: &Configuration) -> DbTest {
        let _ = env_logger::builder().is_test(true).try_init();

        let store = ObjectStore::new(specs, config).unwrap();
        let conn = LoggingConnector::new(Sqlite::in_memory().connect().unwrap());
        let log = ExecLog::new(conn.ops_log_handle());

        DbTest { store, conn, log }
    }

    pub fn log(&mut self) -> &mut ExecLog {
        &mut self.log
    }

    /// Number of rows in `table`, read past the store.
    pub fn count_rows(&mut self, table: &str) -> i64 {
        let mut rows = self.conn.select(&Select::count(table).into()).unwrap();
        rows.next().unwrap().reader().next_value().unwrap().to_i64().unwrap()
    }
}
