use crate::{err, stmt::Value, Result};

use std::collections::VecDeque;

/// Cursor over the rows returned by [`DatabaseConnector::select`].
///
/// [`DatabaseConnector::select`]: super::DatabaseConnector::select
#[derive(Debug, Default)]
pub struct Results {
    rows: VecDeque<Row>,
}

/// One returned row. Values are read positionally through a [`RowReader`].
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

/// Reads a row's values left to right, the way mappings consume columns.
#[derive(Debug)]
pub struct RowReader<'a> {
    row: &'a Row,
    pos: usize,
}

impl Results {
    pub fn from_vec(rows: Vec<Row>) -> Results {
        Results { rows: rows.into() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Releases the cursor. Any unread rows are discarded.
    pub fn close(self) {}
}

impl Iterator for Results {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }
}

impl Row {
    pub fn from_vec(values: Vec<Value>) -> Row {
        Row { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn reader(&self) -> RowReader<'_> {
        RowReader { row: self, pos: 0 }
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl RowReader<'_> {
    /// Returns the next column value.
    pub fn next_value(&mut self) -> Result<&Value> {
        let value = self
            .row
            .values
            .get(self.pos)
            .ok_or_else(|| err!("row has only {} columns", self.row.values.len()))?;
        self.pos += 1;
        Ok(value)
    }

    /// Number of values consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }
}
