use super::{Filter, Ident, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    /// Table to delete from
    pub from: Ident,

    /// Rows to delete
    pub filter: Filter,
}

impl Delete {
    pub fn new(from: impl Into<Ident>) -> Delete {
        Delete {
            from: from.into(),
            filter: Filter::default(),
        }
    }

    pub fn filter(mut self, filter: Filter) -> Delete {
        self.filter = filter;
        self
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
