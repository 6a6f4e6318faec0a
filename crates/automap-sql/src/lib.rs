pub mod serializer;
pub use serializer::{Params, Placeholder, Serializer};

pub use automap_core::stmt::{self, Statement};
