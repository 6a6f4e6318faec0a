use super::{Comma, Formatter, Params, ToSql};

use crate::stmt::{self, Ident, Projection, Statement, Value};

impl ToSql for &Statement {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let from = &self.from;
        let filter = &self.filter;

        match &self.projection {
            Projection::Columns(columns) => {
                fmt!(f, "SELECT " Comma(columns) " FROM " from filter)
            }
            Projection::Count => fmt!(f, "SELECT COUNT(*) FROM " from filter),
        }
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let table = &self.table;
        let columns = Comma(&self.columns);
        let values = Comma(&self.values);

        fmt!(f, "INSERT INTO " table " (" columns ") VALUES (" values ")");
    }
}

struct Assignment<'a>(&'a Ident, &'a Value);

impl ToSql for Assignment<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        fmt!(f, self.0 " = " self.1);
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| Assignment(column, value)),
        );

        let table = &self.table;
        let filter = &self.filter;

        fmt!(f, "UPDATE " table " SET " assignments filter);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        let from = &self.from;
        let filter = &self.filter;

        fmt!(f, "DELETE FROM " from filter);
    }
}
