mod auto_mapper;
pub(crate) use auto_mapper::mapped_associations;
pub use auto_mapper::AutoMapper;

mod collection;
pub use collection::{CollectionMapper, CombinedColumnMapper, JoinTableMapper, OwnedChildMapper};

mod factory;
pub use factory::{DefaultFieldMappings, FieldMappingFactory, FieldRequest};

mod field;
pub use field::{FieldMapping, PrimitiveMapping, ReferenceMapping};

mod id;
pub use id::IdMapping;

mod naming;
pub(crate) use naming::combined_column_name;

mod strategy;
pub use strategy::CollectionStrategy;

mod version;
pub use version::VersionMapping;

use automap_core::{
    schema::{ClassName, Specifications},
    session::KeyKind,
    stmt::{ColumnDef, Ident},
    Configuration, Result,
};
use indexmap::IndexMap;

/// Prefix of every class-level configuration key.
pub(crate) const CONFIG_PREFIX: &str = "automap";

/// Everything a mapper needs while it is being built.
pub(crate) struct BuildContext<'a> {
    pub(crate) specs: &'a Specifications,
    pub(crate) config: &'a Configuration,
    pub(crate) factory: &'a dyn FieldMappingFactory,

    /// Columns that combined-column collections of other classes add to a
    /// class's table.
    pub(crate) injected: &'a IndexMap<ClassName, Vec<ColumnDef>>,
}

impl BuildContext<'_> {
    /// Configuration keys of `class`, with the class prefix stripped.
    pub(crate) fn class_config(&self, class: &ClassName) -> Configuration {
        self.config.subset(&format!("{CONFIG_PREFIX}.{class}"))
    }

    pub(crate) fn key_kind(&self, class: &ClassName) -> Result<KeyKind> {
        key_kind(&self.class_config(class))
    }

    pub(crate) fn table_name(&self, class: &ClassName) -> Ident {
        naming::table_name(class, &self.class_config(class))
    }

    /// Key kind of `class` if it is a known persistent class.
    pub(crate) fn target_key(&self, class: &ClassName) -> Result<Option<KeyKind>> {
        if self.specs.contains(class) {
            self.key_kind(class).map(Some)
        } else {
            Ok(None)
        }
    }

    pub(crate) fn injected_columns(&self, class: &ClassName) -> Vec<ColumnDef> {
        self.injected.get(class).cloned().unwrap_or_default()
    }
}

/// `db-ids` selects database-assigned integer keys over generated ones.
pub(crate) fn key_kind(class_config: &Configuration) -> Result<KeyKind> {
    Ok(if class_config.get_bool("db-ids", false)? {
        KeyKind::Database
    } else {
        KeyKind::Generated
    })
}
