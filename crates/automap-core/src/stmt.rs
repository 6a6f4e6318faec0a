mod column_def;
pub use column_def::ColumnDef;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod filter;
pub use filter::{Condition, Filter};

mod ident;
pub use ident::Ident;

mod insert;
pub use insert::Insert;

mod select;
pub use select::{Projection, Select};

mod ty;
pub use ty::Type;

mod update;
pub use update::Update;

mod value;
pub use value::Value;

/// A complete SQL statement, ready to be serialized by a driver.
///
/// Statements are assembled through consuming builders and are immutable once
/// handed to a [`DatabaseConnector`](crate::driver::DatabaseConnector).
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    Delete(Delete),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl Statement {
    pub fn is_select(&self) -> bool {
        matches!(self, Statement::Select(_))
    }

    pub fn is_create_table(&self) -> bool {
        matches!(self, Statement::CreateTable(_))
    }

    /// Name of the table the statement targets.
    pub fn table(&self) -> &Ident {
        match self {
            Statement::CreateTable(stmt) => &stmt.name,
            Statement::Delete(stmt) => &stmt.from,
            Statement::Insert(stmt) => &stmt.table,
            Statement::Select(stmt) => &stmt.from,
            Statement::Update(stmt) => &stmt.table,
        }
    }

    /// Number of values each returned row carries, or `None` if the statement
    /// does not return rows.
    pub fn returning_len(&self) -> Option<usize> {
        match self {
            Statement::Select(select) => Some(select.projection.len()),
            _ => None,
        }
    }
}
