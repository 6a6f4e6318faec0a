mod results;
pub use results::{Results, Row, RowReader};

use crate::{
    stmt::{Ident, Statement},
    Result,
};

use std::fmt::Debug;

/// Low-level SQL execution facility.
///
/// Every mapper operation receives the connector explicitly; the mapper never
/// pools, retries, or opens transactions on its own. Calls block until the
/// database answers.
pub trait DatabaseConnector: Debug {
    /// Returns `true` if a table with the given name exists.
    fn has_table(&mut self, name: &Ident) -> Result<bool>;

    /// Executes a statement that returns no rows (DDL or DML), returning the
    /// number of rows affected.
    fn update(&mut self, stmt: &Statement) -> Result<u64>;

    /// Executes a query and returns its rows.
    fn select(&mut self, stmt: &Statement) -> Result<Results>;

    /// Key assigned by the database to the most recent insert on this
    /// connection.
    fn last_insert_id(&mut self) -> Result<i64>;
}

impl<T: DatabaseConnector + ?Sized> DatabaseConnector for &mut T {
    fn has_table(&mut self, name: &Ident) -> Result<bool> {
        (**self).has_table(name)
    }

    fn update(&mut self, stmt: &Statement) -> Result<u64> {
        (**self).update(stmt)
    }

    fn select(&mut self, stmt: &Statement) -> Result<Results> {
        (**self).select(stmt)
    }

    fn last_insert_id(&mut self) -> Result<i64> {
        (**self).last_insert_id()
    }
}
