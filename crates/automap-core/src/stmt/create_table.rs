use super::{ColumnDef, Ident, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    /// Name of the table
    pub name: Ident,

    /// Column definitions
    pub columns: Vec<ColumnDef>,

    /// Primary key columns. Empty when the key is an auto-increment column,
    /// which declares itself inline.
    pub primary_key: Vec<Ident>,
}

impl CreateTable {
    pub fn new(name: impl Into<Ident>) -> CreateTable {
        CreateTable {
            name: name.into(),
            columns: vec![],
            primary_key: vec![],
        }
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDef>) -> CreateTable {
        self.columns.extend(columns);
        self
    }

    pub fn primary_key(mut self, columns: impl IntoIterator<Item = Ident>) -> CreateTable {
        self.primary_key.extend(columns);
        self
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
