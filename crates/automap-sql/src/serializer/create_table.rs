use super::{Comma, Formatter, Params, ToSql};

use crate::stmt;

struct ColumnsWithConstraints<'a>(&'a stmt::CreateTable);

impl ToSql for &stmt::CreateTable {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let name = &self.name;
        let columns = ColumnsWithConstraints(self);

        fmt!(f, "CREATE TABLE " name " (" columns ")");
    }
}

impl ToSql for ColumnsWithConstraints<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let columns = Comma(&self.0.columns);

        if self.0.primary_key.is_empty() {
            fmt!(f, columns);
        } else {
            let pk = Comma(&self.0.primary_key);
            fmt!(f, columns ", PRIMARY KEY (" pk ")");
        }
    }
}
