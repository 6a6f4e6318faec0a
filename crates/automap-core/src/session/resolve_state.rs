use crate::{Error, Result};

use std::fmt;

/// Lazy-loading lifecycle of an in-memory object or collection.
///
/// ```text
/// Transient ──────────────────────────► Resolved
/// Ghost ──► Resolving ──► Resolved ──► Ghost
///   │           │             │
///   │           └──► Ghost    └──► Destroyed
///   └──► Destroyed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolveState {
    /// Created in memory, never stored
    Transient,

    /// Known to exist in the database, contents not loaded
    Ghost,

    /// A load is in progress
    Resolving,

    /// Contents loaded
    Resolved,

    /// Deleted from the database
    Destroyed,
}

impl ResolveState {
    /// Returns `true` if moving to `next` is a legal transition.
    pub fn can_change_to(self, next: ResolveState) -> bool {
        use ResolveState::*;

        matches!(
            (self, next),
            (Transient, Resolved)
                | (Ghost, Resolving)
                | (Ghost, Destroyed)
                | (Resolving, Resolved)
                | (Resolving, Ghost)
                | (Resolved, Ghost)
                | (Resolved, Destroyed)
        )
    }

    /// Moves to `next`, failing if the transition is not legal.
    pub fn change_to(&mut self, next: ResolveState) -> Result<()> {
        if !self.can_change_to(next) {
            return Err(Error::invalid_state(format!(
                "cannot change from {self} to {next}"
            )));
        }
        *self = next;
        Ok(())
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, ResolveState::Resolved)
    }

    pub fn is_persistent(self) -> bool {
        !matches!(self, ResolveState::Transient | ResolveState::Destroyed)
    }
}

impl fmt::Display for ResolveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResolveState::Transient => "Transient",
            ResolveState::Ghost => "Ghost",
            ResolveState::Resolving => "Resolving",
            ResolveState::Resolved => "Resolved",
            ResolveState::Destroyed => "Destroyed",
        };
        f.write_str(name)
    }
}
