use super::{Association, ClassName, Primitive};

/// Descriptor of one persistent class.
#[derive(Debug, Clone, PartialEq)]
pub struct Specification {
    /// The class being described
    pub name: ClassName,

    /// Associations in declaration order
    pub associations: Vec<Association>,
}

impl Specification {
    pub fn new(name: impl Into<ClassName>) -> Specification {
        Specification {
            name: name.into(),
            associations: vec![],
        }
    }

    pub fn association(mut self, association: Association) -> Specification {
        self.associations.push(association);
        self
    }

    pub fn value(self, id: &str, primitive: Primitive) -> Specification {
        self.association(Association::value(id, primitive))
    }

    pub fn reference(self, id: &str, target: impl Into<ClassName>) -> Specification {
        self.association(Association::reference(id, target))
    }

    pub fn collection(self, id: &str, element_type: impl Into<ClassName>) -> Specification {
        self.association(Association::collection(id, element_type))
    }

    pub fn find(&self, id: &str) -> Option<&Association> {
        self.associations.iter().find(|association| association.id == id)
    }

    /// Associations that are written to the database.
    pub fn persistent_associations(&self) -> impl Iterator<Item = &Association> + '_ {
        self.associations
            .iter()
            .filter(|association| association.persisted)
    }
}
