//! In-memory side of persistence.
//!
//! A [`Session`] owns every [`Adapter`] (the in-memory stand-in for a
//! persistent object) in an arena addressed by [`AdapterId`], plus an
//! identity map from [`Oid`] to adapter so each stored object is represented
//! at most once.

mod adapter;
pub use adapter::{Adapter, AdapterId, Slot};

mod collection;
pub use collection::Collection;

mod oid;
pub use oid::{Key, KeyKind, Oid};

mod resolve_state;
pub use resolve_state::ResolveState;

mod version;
pub use version::Version;

use crate::{schema::ClassName, stmt::Value, Error, Result};

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Session {
    adapters: Vec<Adapter>,
    identity: HashMap<Oid, AdapterId>,
}

impl Session {
    pub fn new() -> Session {
        Session::default()
    }

    /// Creates a new, not yet stored, object of `class`.
    pub fn create_instance(&mut self, class: impl Into<ClassName>) -> AdapterId {
        self.push(Adapter::transient(class.into()))
    }

    /// Returns the adapter for `oid`, creating a Ghost if it is not yet known.
    pub fn adapter_for(&mut self, oid: Oid) -> AdapterId {
        if let Some(id) = self.identity.get(&oid) {
            return *id;
        }

        let id = self.push(Adapter::ghost(oid.clone()));
        self.identity.insert(oid, id);
        id
    }

    pub fn lookup(&self, oid: &Oid) -> Option<AdapterId> {
        self.identity.get(oid).copied()
    }

    fn push(&mut self, adapter: Adapter) -> AdapterId {
        let id = AdapterId(self.adapters.len());
        self.adapters.push(adapter);
        id
    }

    /// # Panics
    ///
    /// Panics if the adapter ID was not issued by this session.
    pub fn adapter(&self, id: AdapterId) -> &Adapter {
        self.adapters.get(id.0).expect("invalid adapter ID")
    }

    /// # Panics
    ///
    /// Panics if the adapter ID was not issued by this session.
    pub fn adapter_mut(&mut self, id: AdapterId) -> &mut Adapter {
        self.adapters.get_mut(id.0).expect("invalid adapter ID")
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Records the persistent identity of a transient object once its row has
    /// been inserted.
    pub fn make_persistent(&mut self, id: AdapterId, oid: Oid) -> Result<()> {
        if let Some(existing) = self.identity.get(&oid) {
            if *existing != id {
                return Err(Error::invalid_state(format!(
                    "{oid} is already represented by another object"
                )));
            }
        }

        let adapter = self.adapter_mut(id);
        adapter.state_mut().change_to(ResolveState::Resolved)?;
        adapter.set_oid(oid.clone());
        self.identity.insert(oid, id);
        Ok(())
    }

    /// Marks an object as deleted and drops it from the identity map.
    pub fn mark_destroyed(&mut self, id: AdapterId) -> Result<()> {
        let adapter = self.adapter_mut(id);
        adapter.state_mut().change_to(ResolveState::Destroyed)?;
        if let Some(oid) = adapter.oid().cloned() {
            self.identity.remove(&oid);
        }
        Ok(())
    }

    pub fn value(&self, id: AdapterId, field: &str) -> &Value {
        self.adapter(id).value(field)
    }

    pub fn set_value(&mut self, id: AdapterId, field: &str, value: impl Into<Value>) {
        self.adapter_mut(id).set_slot(field, Slot::Value(value.into()));
    }

    pub fn reference(&self, id: AdapterId, field: &str) -> Option<AdapterId> {
        self.adapter(id).reference(field)
    }

    pub fn set_reference(&mut self, id: AdapterId, field: &str, target: Option<AdapterId>) {
        self.adapter_mut(id).set_slot(field, Slot::Reference(target));
    }

    /// Elements of a collection, or an empty slice if it was never touched.
    pub fn elements(&self, id: AdapterId, field: &str) -> &[AdapterId] {
        self.adapter(id)
            .collection(field)
            .map(Collection::elements)
            .unwrap_or(&[])
    }

    /// Adds an element to a collection that is already loaded.
    pub fn add_element(&mut self, id: AdapterId, field: &str, element: AdapterId) -> Result<()> {
        let adapter = self.adapter_mut(id);
        adapter.collection_mut(field).push(element)?;
        adapter.touch_collections();
        Ok(())
    }

    pub fn remove_element(
        &mut self,
        id: AdapterId,
        field: &str,
        element: AdapterId,
    ) -> Result<bool> {
        let adapter = self.adapter_mut(id);
        let removed = adapter.collection_mut(field).remove(element)?;
        if removed {
            adapter.touch_collections();
        }
        Ok(removed)
    }
}
