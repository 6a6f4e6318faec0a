use automap_core::{
    driver::RowReader,
    session::{Key, KeyKind},
    stmt::{ColumnDef, Filter, Ident, Type, Value},
    Result,
};

/// Maps an object's identity to its key column.
///
/// The same mapping type is used for a table's own primary key and for
/// columns that refer to another object's key (owner, parent, element).
#[derive(Debug, Clone, PartialEq)]
pub struct IdMapping {
    column: Ident,
    kind: KeyKind,
}

impl IdMapping {
    pub fn new(column: impl Into<Ident>, kind: KeyKind) -> IdMapping {
        IdMapping {
            column: column.into(),
            kind,
        }
    }

    pub fn column(&self) -> &Ident {
        &self.column
    }

    pub fn kind(&self) -> KeyKind {
        self.kind
    }

    /// Database-assigned keys are left out of `INSERT`s.
    pub fn db_creates_id(&self) -> bool {
        matches!(self.kind, KeyKind::Database)
    }

    /// Definition of the table's own primary key column.
    pub fn primary_key_def(&self) -> ColumnDef {
        match self.kind {
            KeyKind::Database => ColumnDef::new(&self.column, Type::Integer).auto_increment(),
            KeyKind::Generated => ColumnDef::new(&self.column, Type::Text).not_null(),
        }
    }

    /// Definition of a column referring to a key of this kind.
    pub fn reference_def(&self) -> ColumnDef {
        ColumnDef::new(&self.column, self.storage_type())
    }

    pub fn storage_type(&self) -> Type {
        match self.kind {
            KeyKind::Database => Type::Integer,
            KeyKind::Generated => Type::Text,
        }
    }

    /// `WHERE <column> = <key>`
    pub fn filter(&self, key: Key) -> Filter {
        Filter::new().eq(&self.column, key.to_value())
    }

    pub fn insert_value(&self, key: Key) -> (Ident, Value) {
        (self.column.clone(), key.to_value())
    }

    /// Recreates a key from the next column of a result row.
    pub fn recreate_key(&self, row: &mut RowReader<'_>) -> Result<Key> {
        Key::from_value(self.kind, row.next_value()?)
    }

    /// Like [`recreate_key`](Self::recreate_key), but `NULL` yields `None`.
    pub fn recreate_optional_key(&self, row: &mut RowReader<'_>) -> Result<Option<Key>> {
        let value = row.next_value()?;
        if value.is_null() {
            Ok(None)
        } else {
            Key::from_value(self.kind, value).map(Some)
        }
    }
}
