mod primitive;
pub use primitive::PrimitiveMapping;

mod reference;
pub use reference::ReferenceMapping;

use automap_core::{
    driver::RowReader,
    session::{AdapterId, Session},
    stmt::{ColumnDef, Ident, Value},
    Result,
};

use std::fmt::Debug;

/// Maps one one-to-one association to its column(s).
///
/// Every method appends, so a class mapper can collect the columns of all its
/// fields into one list in declaration order. Column names, definitions and
/// values of a mapping always line up one to one.
pub trait FieldMapping: Debug + Send + Sync {
    /// Id of the mapped association.
    fn association(&self) -> &str;

    fn append_columns(&self, columns: &mut Vec<Ident>);

    fn append_column_defs(&self, defs: &mut Vec<ColumnDef>);

    /// Appends the object's current value(s) for this field.
    fn append_values(
        &self,
        session: &Session,
        object: AdapterId,
        values: &mut Vec<Value>,
    ) -> Result<()>;

    /// Reads this field's column(s) from a result row into the object.
    fn initialize_field(
        &self,
        session: &mut Session,
        object: AdapterId,
        row: &mut RowReader<'_>,
    ) -> Result<()>;
}
