use automap_core::{
    driver::RowReader,
    err,
    session::Version,
    stmt::{ColumnDef, Filter, Ident, Type, Value},
    Error, Result,
};
use chrono::DateTime;

/// Maps the optimistic-lock token of a row to its `VERSION` (serial) and
/// `MODIFIED` (nanoseconds since the epoch) columns.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionMapping {
    serial: Ident,
    time: Ident,
}

impl Default for VersionMapping {
    fn default() -> VersionMapping {
        VersionMapping::new("VERSION", "MODIFIED")
    }
}

impl VersionMapping {
    pub fn new(serial: impl Into<Ident>, time: impl Into<Ident>) -> VersionMapping {
        VersionMapping {
            serial: serial.into(),
            time: time.into(),
        }
    }

    pub fn columns(&self) -> [Ident; 2] {
        [self.serial.clone(), self.time.clone()]
    }

    pub fn column_defs(&self) -> [ColumnDef; 2] {
        [
            ColumnDef::new(&self.serial, Type::Integer).not_null(),
            ColumnDef::new(&self.time, Type::Integer).not_null(),
        ]
    }

    /// Column/value pairs that store `version`.
    pub fn values(&self, version: &Version) -> Result<[(Ident, Value); 2]> {
        let serial = i64::try_from(version.serial)
            .map_err(|_| err!("version serial {} does not fit a column", version.serial))?;
        let time = version
            .time
            .timestamp_nanos_opt()
            .ok_or_else(|| err!("version time {} is out of range", version.time))?;

        Ok([
            (self.serial.clone(), Value::I64(serial)),
            (self.time.clone(), Value::I64(time)),
        ])
    }

    /// Adds the lock check to a row filter: the row must still carry
    /// `version`.
    pub fn guard(&self, filter: Filter, version: &Version) -> Result<Filter> {
        Ok(filter.eq_all(self.values(version)?))
    }

    /// Reads a token from the next two columns of a result row.
    pub fn recreate(&self, row: &mut RowReader<'_>) -> Result<Version> {
        let serial = row.next_value()?.to_i64()?;
        let serial = u64::try_from(serial)
            .map_err(|_| Error::type_conversion(Value::I64(serial), "u64"))?;
        let time = DateTime::from_timestamp_nanos(row.next_value()?.to_i64()?);
        Ok(Version::new(serial, time))
    }
}
