mod combined;
pub use combined::CombinedColumnMapper;

mod join_table;
pub use join_table::JoinTableMapper;

mod owned;
pub use owned::OwnedChildMapper;

use super::{
    auto_mapper::ID_COLUMN, naming, AutoMapper, BuildContext, CollectionStrategy, IdMapping,
};
use automap_core::{
    driver::DatabaseConnector,
    schema::{Association, ClassName},
    session::{AdapterId, Key, KeyKind, ResolveState, Session},
    stmt::Ident,
    Error, Result,
};

/// Loads and saves one one-to-many association.
///
/// The variant is fixed when the owning class mapper is built. All variants
/// share the lazy-load guard: a load only runs when the in-memory collection
/// can move from Ghost to Resolving, so loading an already loaded collection
/// issues no statements. Saves replace the stored contents wholesale
/// (delete, then insert) and only touch loaded collections; the caller's
/// transaction is what makes that sequence atomic.
#[derive(Debug)]
pub enum CollectionMapper {
    CombinedColumn(CombinedColumnMapper),
    JoinTable(JoinTableMapper),
    OwnedChild(Box<OwnedChildMapper>),
}

impl CollectionMapper {
    pub(crate) fn build(
        cx: &BuildContext<'_>,
        owner: &ClassName,
        owner_table: &Ident,
        owner_key: KeyKind,
        association: &Association,
        strategy: CollectionStrategy,
    ) -> Result<CollectionMapper> {
        let element = element_class(owner, association)?;

        Ok(match strategy {
            CollectionStrategy::CombinedColumn => {
                if !cx.specs.contains(element) {
                    return Err(not_persistent(owner, association, element));
                }
                CollectionMapper::CombinedColumn(CombinedColumnMapper::new(
                    &association.id,
                    element.clone(),
                    cx.table_name(element),
                    IdMapping::new(ID_COLUMN, cx.key_kind(element)?),
                    IdMapping::new(naming::combined_column_name(association), owner_key),
                ))
            }
            CollectionStrategy::JoinTable => {
                let Some(element_key) = cx.target_key(element)? else {
                    return Err(not_persistent(owner, association, element));
                };
                CollectionMapper::JoinTable(JoinTableMapper::new(
                    &association.id,
                    element.clone(),
                    naming::join_table_name(owner_table, &association.id),
                    IdMapping::new(join_table::OWNER_COLUMN, owner_key),
                    IdMapping::new(join_table::ELEMENT_COLUMN, element_key),
                ))
            }
            CollectionStrategy::OwnedChild => {
                let child = AutoMapper::build(cx, element)?;
                CollectionMapper::OwnedChild(Box::new(OwnedChildMapper::new(
                    &association.id,
                    child,
                    IdMapping::new(owned::PARENT_COLUMN, owner_key),
                )))
            }
        })
    }

    /// Id of the mapped association.
    pub fn association(&self) -> &str {
        match self {
            CollectionMapper::CombinedColumn(mapper) => mapper.association(),
            CollectionMapper::JoinTable(mapper) => mapper.association(),
            CollectionMapper::OwnedChild(mapper) => mapper.association(),
        }
    }

    pub fn strategy(&self) -> CollectionStrategy {
        match self {
            CollectionMapper::CombinedColumn(_) => CollectionStrategy::CombinedColumn,
            CollectionMapper::JoinTable(_) => CollectionStrategy::JoinTable,
            CollectionMapper::OwnedChild(_) => CollectionStrategy::OwnedChild,
        }
    }

    /// True if a table this collection stores its rows in is missing.
    pub fn needs_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<bool> {
        match self {
            CollectionMapper::CombinedColumn(_) => Ok(false),
            CollectionMapper::JoinTable(mapper) => mapper.needs_tables(conn),
            CollectionMapper::OwnedChild(mapper) => mapper.needs_tables(conn),
        }
    }

    pub fn create_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<()> {
        match self {
            // The column is part of the element class's own table.
            CollectionMapper::CombinedColumn(_) => Ok(()),
            CollectionMapper::JoinTable(mapper) => mapper.create_tables(conn),
            CollectionMapper::OwnedChild(mapper) => mapper.create_tables(conn),
        }
    }

    /// Loads the collection of `owner` if it has not been loaded yet.
    ///
    /// The stored elements replace the in-memory contents. On failure the
    /// collection goes back to Ghost so a later call can retry.
    pub fn load_collection(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        owner: AdapterId,
    ) -> Result<()> {
        let association = self.association();
        let key = owner_key(session, owner)?;

        if !start_load(session, owner, association)? {
            return Ok(());
        }

        let elements = match self {
            CollectionMapper::CombinedColumn(mapper) => mapper.read_elements(conn, session, key),
            CollectionMapper::JoinTable(mapper) => mapper.read_elements(conn, session, key),
            CollectionMapper::OwnedChild(mapper) => mapper.read_elements(conn, session, key),
        };

        match elements {
            Ok(elements) => {
                tracing::debug!(
                    association,
                    owner = %key,
                    elements = elements.len(),
                    "loaded collection"
                );
                finish_load(session, owner, association, elements)
            }
            Err(err) => {
                abort_load(session, owner, association);
                Err(err)
            }
        }
    }

    /// Writes the collection of `owner` if it is loaded. Collections that
    /// were never loaded are left alone: saving one would erase the stored
    /// rows.
    pub fn save_collection(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        owner: AdapterId,
    ) -> Result<()> {
        let association = self.association();
        let elements = match session.adapter(owner).collection(association) {
            Some(collection) if collection.state().is_resolved() => collection.elements().to_vec(),
            _ => return Ok(()),
        };
        let key = owner_key(session, owner)?;

        tracing::debug!(
            association,
            owner = %key,
            elements = elements.len(),
            strategy = %self.strategy(),
            "saving collection"
        );

        match self {
            CollectionMapper::CombinedColumn(mapper) => {
                mapper.write_elements(conn, session, key, &elements)
            }
            CollectionMapper::JoinTable(mapper) => {
                mapper.write_elements(conn, session, key, &elements)
            }
            CollectionMapper::OwnedChild(mapper) => {
                mapper.write_elements(conn, session, key, &elements)
            }
        }
    }

    /// Removes every stored element link of the owner with key `owner`.
    pub fn delete_all(&self, conn: &mut dyn DatabaseConnector, owner: Key) -> Result<()> {
        match self {
            CollectionMapper::CombinedColumn(mapper) => mapper.delete_all(conn, owner),
            CollectionMapper::JoinTable(mapper) => mapper.delete_all(conn, owner),
            CollectionMapper::OwnedChild(mapper) => mapper.delete_all(conn, owner),
        }
    }
}

fn element_class<'a>(owner: &ClassName, association: &'a Association) -> Result<&'a ClassName> {
    association
        .element_type
        .as_ref()
        .or_else(|| association.target())
        .ok_or_else(|| {
            Error::invalid_configuration(format!(
                "collection `{owner}.{}` has no element type",
                association.id
            ))
        })
}

fn not_persistent(owner: &ClassName, association: &Association, element: &ClassName) -> Error {
    Error::invalid_configuration(format!(
        "element type `{element}` of `{owner}.{}` is not a persistent class",
        association.id
    ))
}

/// Key of a stored owner. Collections of transient objects have no rows.
fn owner_key(session: &Session, owner: AdapterId) -> Result<Key> {
    let adapter = session.adapter(owner);
    adapter.oid().map(|oid| oid.key).ok_or_else(|| {
        Error::invalid_state(format!(
            "{} object of `{}` has no stored collections",
            adapter.state(),
            adapter.class()
        ))
    })
}

/// Key of a stored element of the expected class.
fn element_key(
    session: &Session,
    element: AdapterId,
    class: &ClassName,
    association: &str,
) -> Result<Key> {
    let adapter = session.adapter(element);
    if adapter.class() != class {
        return Err(Error::invalid_state(format!(
            "`{association}` holds a `{}` where `{class}` is expected",
            adapter.class()
        )));
    }
    adapter.oid().map(|oid| oid.key).ok_or_else(|| {
        Error::invalid_state(format!(
            "element of `{association}` must be saved before its collection"
        ))
    })
}

/// Ghost -> Resolving. Returns false, leaving everything as is, if the
/// collection is already being loaded or is loaded.
fn start_load(session: &mut Session, owner: AdapterId, association: &str) -> Result<bool> {
    let adapter = session.adapter_mut(owner);
    let collection = adapter.collection_mut(association);
    if !collection.can_change_to(ResolveState::Resolving) {
        return Ok(false);
    }
    collection.change_to(ResolveState::Resolving)?;
    adapter.start_persisting();
    Ok(true)
}

fn finish_load(
    session: &mut Session,
    owner: AdapterId,
    association: &str,
    elements: Vec<AdapterId>,
) -> Result<()> {
    let adapter = session.adapter_mut(owner);
    let collection = adapter.collection_mut(association);
    collection.replace_all(elements);
    let resolved = collection.change_to(ResolveState::Resolved);
    adapter.end_persisting();
    resolved
}

fn abort_load(session: &mut Session, owner: AdapterId, association: &str) {
    let adapter = session.adapter_mut(owner);
    let collection = adapter.collection_mut(association);
    if collection.can_change_to(ResolveState::Ghost) {
        // Resolving -> Ghost is always allowed
        let _ = collection.change_to(ResolveState::Ghost);
    }
    adapter.end_persisting();
}
