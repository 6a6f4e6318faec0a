use super::{FieldMapping, IdMapping, PrimitiveMapping, ReferenceMapping};
use automap_core::{
    schema::{Association, ValueType},
    session::KeyKind,
    stmt::Ident,
    Error, Result,
};

use std::fmt::Debug;

/// What a class mapper knows about a field when it asks for its mapping.
#[derive(Debug, Clone)]
pub struct FieldRequest<'a> {
    pub association: &'a Association,

    /// Column name derived from the association id.
    pub column: Ident,

    /// Key kind of the referenced class, when the association refers to a
    /// persistent class.
    pub target_key: Option<KeyKind>,
}

/// Produces the [`FieldMapping`] of each one-to-one association.
pub trait FieldMappingFactory: Debug + Send + Sync {
    fn create(&self, request: FieldRequest<'_>) -> Result<Box<dyn FieldMapping>>;
}

/// One typed column per primitive, one key column per reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFieldMappings;

impl FieldMappingFactory for DefaultFieldMappings {
    fn create(&self, request: FieldRequest<'_>) -> Result<Box<dyn FieldMapping>> {
        let association = request.association;

        match &association.ty {
            ValueType::Primitive(primitive) => Ok(Box::new(PrimitiveMapping::new(
                &association.id,
                request.column,
                *primitive,
            ))),
            ValueType::Object(target) => {
                let Some(kind) = request.target_key else {
                    return Err(Error::invalid_configuration(format!(
                        "`{}` refers to `{target}`, which is not a persistent class",
                        association.id
                    )));
                };
                Ok(Box::new(ReferenceMapping::new(
                    &association.id,
                    target.clone(),
                    IdMapping::new(request.column, kind),
                )))
            }
        }
    }
}
