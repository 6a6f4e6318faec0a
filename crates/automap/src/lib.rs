//! Derives relational tables and SQL statements from class descriptors.
//!
//! An [`ObjectStore`] is built once from a set of [`Specification`]s and a
//! [`Configuration`]. It holds one [`AutoMapper`] per persistent class; each
//! mapper decides which associations become plain columns and which become
//! collections, and picks a [`CollectionMapper`] strategy per collection.

pub mod mapper;
pub use mapper::{
    AutoMapper, CollectionMapper, CollectionStrategy, DefaultFieldMappings, FieldMapping,
    FieldMappingFactory, FieldRequest, IdMapping, VersionMapping,
};

mod store;
pub use store::{Builder, ObjectStore};

pub use automap_core::{
    driver::DatabaseConnector,
    schema::{Association, AssociationKind, ClassName, Primitive, Specification, Specifications},
    session::{AdapterId, Key, KeyKind, Oid, ResolveState, Session, Version},
    stmt, Configuration, Error, Result,
};
