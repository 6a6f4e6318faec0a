use super::{Ident, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Name of the column
    pub name: Ident,

    /// Storage type
    pub ty: Type,

    /// Whether the column accepts `NULL`
    pub nullable: bool,

    /// True if the database assigns the column's value on insert. Such a
    /// column is always the table's sole primary key.
    pub auto_increment: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<Ident>, ty: Type) -> ColumnDef {
        ColumnDef {
            name: name.into(),
            ty,
            nullable: true,
            auto_increment: false,
        }
    }

    pub fn not_null(mut self) -> ColumnDef {
        self.nullable = false;
        self
    }

    pub fn auto_increment(mut self) -> ColumnDef {
        self.nullable = false;
        self.auto_increment = true;
        self
    }
}
