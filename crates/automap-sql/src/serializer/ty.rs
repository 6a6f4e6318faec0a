use super::{Flavor, Formatter, Params, ToSql};

use crate::stmt::Type;

impl ToSql for Type {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let name = match (f.serializer.flavor, self) {
            (_, Type::Boolean) => "BOOLEAN",
            (Flavor::Sqlite, Type::Integer) => "INTEGER",
            (Flavor::Postgresql, Type::Integer) => "BIGINT",
            (_, Type::Real) => "DOUBLE PRECISION",
            (_, Type::Text) => "TEXT",
        };
        f.dst.push_str(name);
    }
}
