use super::{Flavor, Formatter, Params, ToSql};

use crate::stmt::ColumnDef;

impl ToSql for &ColumnDef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let name = &self.name;

        if self.auto_increment {
            match f.serializer.flavor {
                Flavor::Sqlite => fmt!(f, name " INTEGER PRIMARY KEY AUTOINCREMENT"),
                Flavor::Postgresql => fmt!(f, name " BIGSERIAL PRIMARY KEY"),
            }
            return;
        }

        fmt!(f, name " " self.ty);

        if !self.nullable {
            fmt!(f, " NOT NULL");
        }
    }
}
