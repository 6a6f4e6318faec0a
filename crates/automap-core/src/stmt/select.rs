use super::{Filter, Ident, Statement};

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// What each returned row contains
    pub projection: Projection,

    /// Source table
    pub from: Ident,

    /// Row filter
    pub filter: Filter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// The listed columns, in order
    Columns(Vec<Ident>),

    /// A single `COUNT(*)` value
    Count,
}

impl Projection {
    pub fn len(&self) -> usize {
        match self {
            Projection::Columns(columns) => columns.len(),
            Projection::Count => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Select {
    pub fn new(from: impl Into<Ident>) -> Select {
        Select {
            projection: Projection::Columns(vec![]),
            from: from.into(),
            filter: Filter::default(),
        }
    }

    /// `SELECT COUNT(*) FROM <from>`
    pub fn count(from: impl Into<Ident>) -> Select {
        Select {
            projection: Projection::Count,
            ..Select::new(from)
        }
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Ident>) -> Select {
        match &mut self.projection {
            Projection::Columns(existing) => existing.extend(columns),
            Projection::Count => self.projection = Projection::Columns(columns.into_iter().collect()),
        }
        self
    }

    pub fn filter(mut self, filter: Filter) -> Select {
        self.filter = filter;
        self
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
