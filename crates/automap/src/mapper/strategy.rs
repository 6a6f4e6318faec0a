use automap_core::{
    schema::{Association, ClassName},
    Configuration, Error, Result,
};

use std::fmt;

/// How a one-to-many association is represented relationally.
///
/// Picked once per association when the class mapper is built, from the
/// `mapper.<association>` key of the class configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStrategy {
    /// An extra owner-key column in the element class's table. The default.
    CombinedColumn,

    /// A separate `(OWNER, ELEMENT)` table.
    JoinTable,

    /// Elements are full rows owned by the parent, in the element class's
    /// table with a `PARENT` column.
    OwnedChild,
}

impl CollectionStrategy {
    /// Reads the strategy of `association` from a class configuration.
    ///
    /// Unknown names are rejected instead of falling back to the default so
    /// that a typo cannot silently change the table layout.
    pub fn from_config(
        class: &ClassName,
        class_config: &Configuration,
        association: &Association,
    ) -> Result<CollectionStrategy> {
        let id = &association.id;

        match class_config.get(&format!("mapper.{id}")) {
            None | Some("association-table") => Ok(CollectionStrategy::CombinedColumn),
            Some("join-table") => Ok(CollectionStrategy::JoinTable),
            Some("owned") => Ok(CollectionStrategy::OwnedChild),
            Some("fk-table") => {
                let Some(element_type) = class_config.get(&format!("{id}.element-type")) else {
                    return Err(Error::invalid_configuration(format!(
                        "`{class}.{id}` uses the fk-table strategy, which requires `{id}.element-type`"
                    )));
                };
                Err(Error::unsupported_feature(format!(
                    "fk-table strategy for `{class}.{id}` (element type `{element_type}`)"
                )))
            }
            Some(other) => Err(Error::invalid_configuration(format!(
                "unsupported collection strategy `{other}` for `{class}.{id}`"
            ))),
        }
    }
}

impl fmt::Display for CollectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollectionStrategy::CombinedColumn => "association-table",
            CollectionStrategy::JoinTable => "join-table",
            CollectionStrategy::OwnedChild => "owned",
        })
    }
}
