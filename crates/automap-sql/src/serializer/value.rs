use super::{Formatter, Params, ToSql};

use crate::stmt::Value;

/// Values inside statements are always bound as parameters.
impl ToSql for &Value {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let placeholder = f.params.push(self);
        placeholder.to_sql(f);
    }
}

/// ANSI literal syntax, accepted by every supported flavor.
pub(super) fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::I64(v) => v.to_string(),
        Value::F64(v) => format!("{v:?}"),
        Value::String(v) => format!("'{}'", v.replace('\'', "''")),
    }
}
