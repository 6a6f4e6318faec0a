use super::{Formatter, Params, ToSql};

use crate::stmt::{Condition, Filter};

impl ToSql for &Filter {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let mut s = " WHERE ";
        for condition in &self.conditions {
            fmt!(f, s condition);
            s = " AND ";
        }
    }
}

impl ToSql for &Condition {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Condition::Eq(column, value) if value.is_null() => fmt!(f, column " IS NULL"),
            Condition::Eq(column, value) => fmt!(f, column " = " value),
        }
    }
}
