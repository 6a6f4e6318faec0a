pub mod config;
pub use config::Configuration;

pub mod driver;
pub use driver::DatabaseConnector;

mod error;
pub use error::Error;

pub mod schema;
pub use schema::{Specification, Specifications};

pub mod session;
pub use session::Session;

pub mod stmt;

/// A Result type alias that uses Automap's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
