mod value;
pub(crate) use value::Value;

use automap_core::{
    driver::{DatabaseConnector, Results, Row},
    stmt::{Ident, Statement},
    Error, Result,
};
use automap_sql::Serializer;
use rusqlite::Connection as RusqliteConnection;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a `sqlite:` connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_configuration(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// Opens a connection. Each in-memory connection is a fresh database.
    pub fn connect(&self) -> Result<Connection> {
        match self {
            Sqlite::File(path) => Connection::open(path),
            Sqlite::InMemory => Connection::in_memory(),
        }
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
    serializer: Serializer,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Ok(Self::from_rusqlite(connection))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection =
            RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Ok(Self::from_rusqlite(connection))
    }

    fn from_rusqlite(connection: RusqliteConnection) -> Self {
        Self {
            connection,
            serializer: Serializer::sqlite(),
        }
    }

    /// Runs raw SQL, such as `BEGIN` / `COMMIT` issued by the caller's
    /// transaction management.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        tracing::trace!(sql, "executing batch");
        self.connection
            .execute_batch(sql)
            .map_err(Error::driver_operation_failed)
    }

    fn prepare(&self, stmt: &Statement) -> (String, Vec<Value>) {
        let mut params = Vec::<automap_core::stmt::Value>::new();
        let sql = self.serializer.serialize(stmt, &mut params);
        tracing::trace!(sql = %sql, params = params.len(), "executing statement");

        let params = params.into_iter().map(Value::from).collect();
        (sql, params)
    }
}

impl DatabaseConnector for Connection {
    fn has_table(&mut self, name: &Ident) -> Result<bool> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name.as_str()],
                |row| row.get(0),
            )
            .map_err(Error::driver_operation_failed)?;

        Ok(count > 0)
    }

    fn update(&mut self, stmt: &Statement) -> Result<u64> {
        let (sql, params) = self.prepare(stmt);

        let mut prepared = self
            .connection
            .prepare_cached(&sql)
            .map_err(Error::driver_operation_failed)?;

        let count = prepared
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        Ok(count as u64)
    }

    fn select(&mut self, stmt: &Statement) -> Result<Results> {
        let Some(width) = stmt.returning_len() else {
            return Err(Error::invalid_state(format!(
                "statement does not return rows: {stmt:?}"
            )));
        };

        let (sql, params) = self.prepare(stmt);

        let mut prepared = self
            .connection
            .prepare_cached(&sql)
            .map_err(Error::driver_operation_failed)?;

        let mut rows = prepared
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(width);

                    for index in 0..width {
                        items.push(Value::from_sql(row, index)?.into_inner());
                    }

                    ret.push(Row::from_vec(items));
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver_operation_failed(err)),
            }
        }

        Ok(Results::from_vec(ret))
    }

    fn last_insert_id(&mut self) -> Result<i64> {
        Ok(self.connection.last_insert_rowid())
    }
}
