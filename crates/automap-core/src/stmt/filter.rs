use super::{Ident, Value};

/// A conjunction of column conditions, rendered as a `WHERE` clause.
///
/// An empty filter matches every row.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column = value`
    Eq(Ident, Value),
}

impl Filter {
    pub fn new() -> Filter {
        Filter::default()
    }

    /// Adds `column = value` to the conjunction.
    pub fn eq(mut self, column: impl Into<Ident>, value: impl Into<Value>) -> Filter {
        self.conditions
            .push(Condition::Eq(column.into(), value.into()));
        self
    }

    /// Adds one equality per `(column, value)` pair.
    pub fn eq_all(mut self, pairs: impl IntoIterator<Item = (Ident, Value)>) -> Filter {
        self.conditions
            .extend(pairs.into_iter().map(|(column, value)| Condition::Eq(column, value)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
