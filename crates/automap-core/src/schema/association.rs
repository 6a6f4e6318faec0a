use super::ClassName;

/// A persistent property or relationship of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    /// Identifier of the association within its class
    pub id: String,

    /// One-to-one, one-to-many, ...
    pub kind: AssociationKind,

    /// Type of the value held by a one-to-one association. For a one-to-many
    /// association this is the collection's element type.
    pub ty: ValueType,

    /// Declared element type of a one-to-many association.
    pub element_type: Option<ClassName>,

    /// False for associations that must never be written to the database.
    pub persisted: bool,

    /// Typed peer descriptor, stamped when the owning specification is added
    /// to a [`Specifications`](super::Specifications) arena.
    pub peer: Option<Peer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    OneToOne,
    OneToMany,
    /// Neither kind could be determined; mapped like a one-to-one field.
    Unclassified,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    Primitive(Primitive),
    Object(ClassName),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Bool,
    Integer,
    Real,
    Text,
    Timestamp,
}

/// Describes the class that declares an association.
#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    pub owning_class: ClassName,
}

impl Association {
    /// A one-to-one association holding a primitive value.
    pub fn value(id: impl Into<String>, primitive: Primitive) -> Association {
        Association {
            id: id.into(),
            kind: AssociationKind::OneToOne,
            ty: ValueType::Primitive(primitive),
            element_type: None,
            persisted: true,
            peer: None,
        }
    }

    /// A one-to-one association referencing another persistent object.
    pub fn reference(id: impl Into<String>, target: impl Into<ClassName>) -> Association {
        Association {
            id: id.into(),
            kind: AssociationKind::OneToOne,
            ty: ValueType::Object(target.into()),
            element_type: None,
            persisted: true,
            peer: None,
        }
    }

    /// A one-to-many association over elements of `element_type`.
    pub fn collection(id: impl Into<String>, element_type: impl Into<ClassName>) -> Association {
        let element_type = element_type.into();
        Association {
            id: id.into(),
            kind: AssociationKind::OneToMany,
            ty: ValueType::Object(element_type.clone()),
            element_type: Some(element_type),
            persisted: true,
            peer: None,
        }
    }

    pub fn with_kind(mut self, kind: AssociationKind) -> Association {
        self.kind = kind;
        self
    }

    /// Marks the association as not persisted.
    pub fn not_persisted(mut self) -> Association {
        self.persisted = false;
        self
    }

    pub fn is_one_to_many(&self) -> bool {
        matches!(self.kind, AssociationKind::OneToMany)
    }

    /// Class this association references, if it holds objects.
    pub fn target(&self) -> Option<&ClassName> {
        match &self.ty {
            ValueType::Object(class) => Some(class),
            ValueType::Primitive(_) => None,
        }
    }
}
