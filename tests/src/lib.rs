mod db_test;
pub use db_test::DbTest;

pub use exec_log::ExecLog;

pub mod fixtures;

mod logging_connector;
pub use logging_connector::{ConnectorOp, LoggingConnector};
