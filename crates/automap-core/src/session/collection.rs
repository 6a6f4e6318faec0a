use super::{AdapterId, ResolveState};
use crate::{Error, Result};

/// In-memory handle of a one-to-many association.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    state: ResolveState,
    elements: Vec<AdapterId>,
}

impl Collection {
    pub(super) fn new(state: ResolveState) -> Collection {
        Collection {
            state,
            elements: vec![],
        }
    }

    pub fn state(&self) -> ResolveState {
        self.state
    }

    pub fn can_change_to(&self, next: ResolveState) -> bool {
        self.state.can_change_to(next)
    }

    pub fn change_to(&mut self, next: ResolveState) -> Result<()> {
        self.state.change_to(next)
    }

    pub fn elements(&self) -> &[AdapterId] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, element: AdapterId) -> bool {
        self.elements.contains(&element)
    }

    /// Replaces the whole contents, as a load does.
    pub fn replace_all(&mut self, elements: Vec<AdapterId>) {
        self.elements = elements;
    }

    pub(super) fn push(&mut self, element: AdapterId) -> Result<()> {
        self.ensure_loaded()?;
        if !self.elements.contains(&element) {
            self.elements.push(element);
        }
        Ok(())
    }

    pub(super) fn remove(&mut self, element: AdapterId) -> Result<bool> {
        self.ensure_loaded()?;
        let before = self.elements.len();
        self.elements.retain(|existing| *existing != element);
        Ok(self.elements.len() != before)
    }

    fn ensure_loaded(&self) -> Result<()> {
        if self.state.is_resolved() {
            Ok(())
        } else {
            Err(Error::invalid_state(format!(
                "collection must be resolved before it is modified (state: {})",
                self.state
            )))
        }
    }
}
