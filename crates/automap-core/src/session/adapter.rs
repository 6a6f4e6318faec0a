use super::{Collection, Oid, ResolveState, Version};
use crate::{schema::ClassName, stmt::Value};

use indexmap::IndexMap;

/// Index of an [`Adapter`] within its [`Session`](super::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterId(pub(super) usize);

/// Value held by a one-to-one association.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Value(Value),
    Reference(Option<AdapterId>),
}

/// In-memory stand-in for one persistent object.
#[derive(Debug)]
pub struct Adapter {
    class: ClassName,
    oid: Option<Oid>,
    state: ResolveState,
    version: Option<Version>,
    fields: IndexMap<String, Slot>,
    collections: IndexMap<String, Collection>,
    dirty: bool,
    persisting: bool,
}

static NULL: Value = Value::Null;

impl Adapter {
    pub(super) fn transient(class: ClassName) -> Adapter {
        Adapter {
            class,
            oid: None,
            state: ResolveState::Transient,
            version: None,
            fields: IndexMap::new(),
            collections: IndexMap::new(),
            dirty: true,
            persisting: false,
        }
    }

    pub(super) fn ghost(oid: Oid) -> Adapter {
        Adapter {
            class: oid.class.clone(),
            oid: Some(oid),
            state: ResolveState::Ghost,
            version: None,
            fields: IndexMap::new(),
            collections: IndexMap::new(),
            dirty: false,
            persisting: false,
        }
    }

    pub fn class(&self) -> &ClassName {
        &self.class
    }

    pub fn oid(&self) -> Option<&Oid> {
        self.oid.as_ref()
    }

    pub(super) fn set_oid(&mut self, oid: Oid) {
        self.oid = Some(oid);
    }

    pub fn state(&self) -> ResolveState {
        self.state
    }

    pub fn state_mut(&mut self) -> &mut ResolveState {
        &mut self.state
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = Some(version);
    }

    /// True if the object changed since it was last loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub(super) fn touch(&mut self) {
        if !self.persisting {
            self.dirty = true;
        }
    }

    /// Collection edits bump the row of a loaded object. A Ghost's row is
    /// left alone; its collections are written on their own.
    pub(super) fn touch_collections(&mut self) {
        if self.state != ResolveState::Ghost {
            self.touch();
        }
    }

    /// Opens a persistence operation: field writes no longer count as user
    /// changes until [`end_persisting`](Self::end_persisting).
    pub fn start_persisting(&mut self) {
        self.persisting = true;
    }

    pub fn end_persisting(&mut self) {
        self.persisting = false;
    }

    pub fn is_persisting(&self) -> bool {
        self.persisting
    }

    pub fn slot(&self, field: &str) -> Option<&Slot> {
        self.fields.get(field)
    }

    pub fn set_slot(&mut self, field: &str, slot: Slot) {
        self.fields.insert(field.to_string(), slot);
        self.touch();
    }

    /// Primitive value of a field; `Null` when unset or holding a reference.
    pub fn value(&self, field: &str) -> &Value {
        match self.fields.get(field) {
            Some(Slot::Value(value)) => value,
            _ => &NULL,
        }
    }

    pub fn reference(&self, field: &str) -> Option<AdapterId> {
        match self.fields.get(field) {
            Some(Slot::Reference(target)) => *target,
            _ => None,
        }
    }

    pub fn collection(&self, field: &str) -> Option<&Collection> {
        self.collections.get(field)
    }

    /// Returns the collection handle, creating it on first use.
    ///
    /// A collection of a transient object starts out loaded and empty; one of
    /// a stored object starts out as a Ghost.
    pub fn collection_mut(&mut self, field: &str) -> &mut Collection {
        let state = match self.state {
            ResolveState::Transient => ResolveState::Resolved,
            _ => ResolveState::Ghost,
        };
        self.collections
            .entry(field.to_string())
            .or_insert_with(|| Collection::new(state))
    }

    pub fn collections(&self) -> impl Iterator<Item = (&str, &Collection)> + '_ {
        self.collections
            .iter()
            .map(|(name, collection)| (name.as_str(), collection))
    }
}
