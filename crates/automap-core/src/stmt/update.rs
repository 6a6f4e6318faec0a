use super::{Filter, Ident, Statement, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    /// Target table
    pub table: Ident,

    /// `SET column = value` pairs
    pub assignments: Vec<(Ident, Value)>,

    /// Rows to update
    pub filter: Filter,
}

impl Update {
    pub fn new(table: impl Into<Ident>) -> Update {
        Update {
            table: table.into(),
            assignments: vec![],
            filter: Filter::default(),
        }
    }

    pub fn set(mut self, column: impl Into<Ident>, value: impl Into<Value>) -> Update {
        self.assignments.push((column.into(), value.into()));
        self
    }

    pub fn set_all(mut self, pairs: impl IntoIterator<Item = (Ident, Value)>) -> Update {
        self.assignments.extend(pairs);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Update {
        self.filter = filter;
        self
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
