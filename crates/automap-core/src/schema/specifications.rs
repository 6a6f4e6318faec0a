use super::{ClassName, Peer, Specification};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Arena of class descriptors, keyed by class name.
#[derive(Debug, Default, Clone)]
pub struct Specifications {
    classes: IndexMap<ClassName, Specification>,
}

impl Specifications {
    pub fn new() -> Specifications {
        Specifications::default()
    }

    /// Adds a descriptor, stamping each association with its owning class.
    pub fn add(&mut self, mut specification: Specification) -> &mut Specifications {
        for association in &mut specification.associations {
            association.peer = Some(Peer {
                owning_class: specification.name.clone(),
            });
        }
        self.classes
            .insert(specification.name.clone(), specification);
        self
    }

    pub fn with(mut self, specification: Specification) -> Specifications {
        self.add(specification);
        self
    }

    /// Looks up a class descriptor.
    pub fn get(&self, name: &ClassName) -> Result<&Specification> {
        self.classes
            .get(name)
            .ok_or_else(|| Error::invalid_configuration(format!("unknown class `{name}`")))
    }

    pub fn contains(&self, name: &ClassName) -> bool {
        self.classes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Specification> + '_ {
        self.classes.values()
    }
}
