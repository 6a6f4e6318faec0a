use super::{Ident, Statement, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Target table
    pub table: Ident,

    /// Columns receiving values
    pub columns: Vec<Ident>,

    /// One value per column, in the same order
    pub values: Vec<Value>,
}

impl Insert {
    pub fn new(table: impl Into<Ident>) -> Insert {
        Insert {
            table: table.into(),
            columns: vec![],
            values: vec![],
        }
    }

    pub fn value(mut self, column: impl Into<Ident>, value: impl Into<Value>) -> Insert {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn values(mut self, pairs: impl IntoIterator<Item = (Ident, Value)>) -> Insert {
        for (column, value) in pairs {
            self.columns.push(column);
            self.values.push(value);
        }
        self
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
