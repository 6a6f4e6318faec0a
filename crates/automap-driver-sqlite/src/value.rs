use automap_core::{err, stmt::Value as CoreValue, Result};
use rusqlite::{
    types::{ToSql, ToSqlOutput, ValueRef},
    Row,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a core value.
    pub fn from_sql(row: &Row, index: usize) -> Result<Self> {
        let value = row
            .get_ref(index)
            .map_err(automap_core::Error::driver_operation_failed)?;

        let core_value = match value {
            ValueRef::Null => CoreValue::Null,
            ValueRef::Integer(value) => CoreValue::I64(value),
            ValueRef::Real(value) => CoreValue::F64(value),
            ValueRef::Text(value) => CoreValue::String(
                String::from_utf8(value.to_vec())
                    .map_err(|_| err!("column {index} holds invalid UTF-8"))?,
            ),
            ValueRef::Blob(_) => return Err(err!("column {index} holds a BLOB")),
        };

        Ok(Self(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match &self.0 {
            CoreValue::Bool(true) => Ok(ToSqlOutput::from(1i64)),
            CoreValue::Bool(false) => Ok(ToSqlOutput::from(0i64)),
            CoreValue::I64(value) => Ok(ToSqlOutput::from(*value)),
            CoreValue::F64(value) => Ok(ToSqlOutput::from(*value)),
            CoreValue::String(value) => Ok(ToSqlOutput::from(value.as_str())),
            CoreValue::Null => Ok(ToSqlOutput::from(rusqlite::types::Null)),
        }
    }
}
