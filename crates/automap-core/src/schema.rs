//! Static class descriptors.
//!
//! A [`Specification`] describes one persistent class: its name and the
//! ordered list of its associations. Descriptors are computed once at startup,
//! collected into a [`Specifications`] arena, and passed by reference into
//! mapper construction.

mod association;
pub use association::{Association, AssociationKind, Peer, Primitive, ValueType};

mod class_name;
pub use class_name::ClassName;

mod specification;
pub use specification::Specification;

mod specifications;
pub use specifications::Specifications;
