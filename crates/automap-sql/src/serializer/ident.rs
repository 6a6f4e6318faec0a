use super::{Formatter, Params, ToSql};

use crate::stmt::Ident;

impl ToSql for &Ident {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        // Both supported flavors quote with `"`
        let quoted = self.quoted();
        f.dst.push_str(&quoted);
    }
}
