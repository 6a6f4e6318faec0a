use super::FieldMapping;
use automap_core::{
    driver::RowReader,
    err,
    schema::Primitive,
    session::{AdapterId, Session},
    stmt::{ColumnDef, Ident, Type, Value},
    Error, Result,
};
use chrono::DateTime;

/// A primitive property stored in one typed column.
///
/// Timestamps are stored as RFC 3339 text.
#[derive(Debug, Clone)]
pub struct PrimitiveMapping {
    association: String,
    column: Ident,
    primitive: Primitive,
}

impl PrimitiveMapping {
    pub fn new(association: impl Into<String>, column: Ident, primitive: Primitive) -> Self {
        PrimitiveMapping {
            association: association.into(),
            column,
            primitive,
        }
    }

    pub fn column(&self) -> &Ident {
        &self.column
    }

    fn storage_type(&self) -> Type {
        match self.primitive {
            Primitive::Bool => Type::Boolean,
            Primitive::Integer => Type::Integer,
            Primitive::Real => Type::Real,
            Primitive::Text | Primitive::Timestamp => Type::Text,
        }
    }

    /// Normalizes a value to the representation of this field.
    fn convert(&self, value: &Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        Ok(match self.primitive {
            Primitive::Bool => Value::Bool(value.to_bool()?),
            Primitive::Integer => Value::I64(value.to_i64()?),
            Primitive::Real => Value::F64(value.to_f64()?),
            Primitive::Text => Value::String(value.as_str()?.to_string()),
            Primitive::Timestamp => {
                let text = value.as_str()?;
                if DateTime::parse_from_rfc3339(text).is_err() {
                    return Err(Error::type_conversion(value.clone(), "timestamp"));
                }
                Value::String(text.to_string())
            }
        })
    }
}

impl FieldMapping for PrimitiveMapping {
    fn association(&self) -> &str {
        &self.association
    }

    fn append_columns(&self, columns: &mut Vec<Ident>) {
        columns.push(self.column.clone());
    }

    fn append_column_defs(&self, defs: &mut Vec<ColumnDef>) {
        defs.push(ColumnDef::new(&self.column, self.storage_type()));
    }

    fn append_values(
        &self,
        session: &Session,
        object: AdapterId,
        values: &mut Vec<Value>,
    ) -> Result<()> {
        let value = self
            .convert(session.value(object, &self.association))
            .map_err(|error| error.context(err!("field `{}`", self.association)))?;
        values.push(value);
        Ok(())
    }

    fn initialize_field(
        &self,
        session: &mut Session,
        object: AdapterId,
        row: &mut RowReader<'_>,
    ) -> Result<()> {
        let value = self.convert(row.next_value()?)?;
        session.set_value(object, &self.association, value);
        Ok(())
    }
}
