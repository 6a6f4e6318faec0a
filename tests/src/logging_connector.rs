use automap_core::{
    driver::{DatabaseConnector, Results},
    stmt::{Ident, Statement},
    Result,
};
use automap_driver_sqlite::Connection;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectorOp {
    HasTable(Ident),
    Update(Statement),
    Select(Statement),
    LastInsertId,
}

/// A connector wrapper that logs every call for testing purposes
#[derive(Debug)]
pub struct LoggingConnector {
    /// The underlying connection that actually executes statements
    inner: Connection,

    /// Log of all calls made through this connector
    ops_log: Arc<Mutex<Vec<ConnectorOp>>>,
}

impl LoggingConnector {
    pub fn new(inner: Connection) -> Self {
        Self {
            inner,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<ConnectorOp>>> {
        self.ops_log.clone()
    }

    /// Raw SQL passthrough, for transaction control. Not logged.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        self.inner.execute_batch(sql)
    }

    fn log(&self, op: ConnectorOp) {
        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(op);
    }
}

impl DatabaseConnector for LoggingConnector {
    fn has_table(&mut self, name: &Ident) -> Result<bool> {
        self.log(ConnectorOp::HasTable(name.clone()));
        self.inner.has_table(name)
    }

    fn update(&mut self, stmt: &Statement) -> Result<u64> {
        self.log(ConnectorOp::Update(stmt.clone()));
        self.inner.update(stmt)
    }

    fn select(&mut self, stmt: &Statement) -> Result<Results> {
        self.log(ConnectorOp::Select(stmt.clone()));
        self.inner.select(stmt)
    }

    fn last_insert_id(&mut self) -> Result<i64> {
        self.log(ConnectorOp::LastInsertId);
        self.inner.last_insert_id()
    }
}
