#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod flavor;
use flavor::Flavor;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column_def;
mod create_table;
mod filter;
mod ident;
mod statement;
mod ty;
mod value;

use crate::stmt::{Statement, Value};

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl Serializer {
    /// Serializes `stmt`, pushing every bound value onto `params` and writing a
    /// placeholder in its place.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    /// Renders a value as an inline SQL literal.
    pub fn literal(value: &Value) -> String {
        value::literal(value)
    }
}
