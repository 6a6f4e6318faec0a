use crate::mapper::{AutoMapper, IdMapping};
use automap_core::{
    driver::DatabaseConnector,
    session::{AdapterId, Key, Oid, ResolveState, Session, Version},
    stmt::{CreateTable, Delete, Select},
    Error, Result,
};

pub(crate) const PARENT_COLUMN: &str = "PARENT";

/// Stores a collection as full child rows owned by the parent.
///
/// The child class is mapped by its own [`AutoMapper`]; its table gains a
/// `PARENT` column and every child row carries its own version token. Child
/// classes are only ever written through their parent.
#[derive(Debug)]
pub struct OwnedChildMapper {
    association: String,
    child: AutoMapper,
    parent: IdMapping,
}

impl OwnedChildMapper {
    pub fn new(association: impl Into<String>, child: AutoMapper, parent: IdMapping) -> Self {
        OwnedChildMapper {
            association: association.into(),
            child,
            parent,
        }
    }

    pub fn association(&self) -> &str {
        &self.association
    }

    /// Mapper of the child class.
    pub fn child(&self) -> &AutoMapper {
        &self.child
    }

    pub fn parent(&self) -> &IdMapping {
        &self.parent
    }

    pub fn table_def(&self) -> CreateTable {
        self.child.table_def(Some(&self.parent))
    }

    pub(crate) fn needs_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<bool> {
        self.child.needs_tables(conn)
    }

    pub(crate) fn create_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<()> {
        self.child.create_tables_with(conn, Some(&self.parent))
    }

    /// Reads the child rows of `owner`. Children that are already loaded in
    /// the session keep their in-memory state.
    pub(crate) fn read_elements(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        owner: Key,
    ) -> Result<Vec<AdapterId>> {
        let select = Select::new(self.child.table())
            .columns(self.child.select_columns([
                self.parent.column().clone(),
                self.child.id().column().clone(),
            ]))
            .filter(self.parent.filter(owner));

        let mut elements = vec![];
        for row in conn.select(&select.into())? {
            let mut reader = row.reader();
            self.parent.recreate_key(&mut reader)?;
            let key = self.child.id().recreate_key(&mut reader)?;

            let child = session.adapter_for(Oid::new(self.child.class(), key));
            self.child.resolve_from_row(session, child, &mut reader)?;
            elements.push(child);
        }
        Ok(elements)
    }

    /// Replaces the child rows of `owner`.
    ///
    /// Children keep their keys across saves, so rows of their own nested
    /// collections stay attached; nested rows of children that were removed
    /// are deleted. Every written child gets a fresh version token.
    pub(crate) fn write_elements(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        owner: Key,
        elements: &[AdapterId],
    ) -> Result<()> {
        for element in elements {
            self.check_child(session, *element)?;
        }

        let stored = self.child_keys(conn, owner)?;

        let delete = Delete::new(self.child.table()).filter(self.parent.filter(owner));
        conn.update(&delete.into())?;

        let mut written = Vec::with_capacity(elements.len());
        for element in elements {
            let adapter = session.adapter(*element);
            let transient = adapter.state() == ResolveState::Transient;
            let version = Version::fresh(adapter.version());
            let key = match adapter.oid() {
                Some(oid) => Some(oid.key),
                None if self.child.db_creates_id() => None,
                None => Some(Key::generate()),
            };

            let key = self.child.insert_row(
                conn,
                session,
                *element,
                Some((&self.parent, owner)),
                key,
                &version,
            )?;

            if transient {
                session.make_persistent(*element, Oid::new(self.child.class(), key))?;
            }
            let adapter = session.adapter_mut(*element);
            adapter.set_version(version);
            adapter.mark_clean();
            written.push(key);
        }

        for key in stored.into_iter().filter(|key| !written.contains(key)) {
            self.child.delete_collections(conn, key)?;
        }
        for element in elements {
            self.child.save_collections(conn, session, *element)?;
        }
        Ok(())
    }

    pub(crate) fn delete_all(&self, conn: &mut dyn DatabaseConnector, owner: Key) -> Result<()> {
        for key in self.child_keys(conn, owner)? {
            self.child.delete_collections(conn, key)?;
        }

        let delete = Delete::new(self.child.table()).filter(self.parent.filter(owner));
        conn.update(&delete.into())?;
        Ok(())
    }

    /// Keys of the stored children of `owner`. Only needed when children have
    /// collections of their own.
    fn child_keys(&self, conn: &mut dyn DatabaseConnector, owner: Key) -> Result<Vec<Key>> {
        if self.child.collections().is_empty() {
            return Ok(vec![]);
        }

        let select = Select::new(self.child.table())
            .columns([self.child.id().column().clone()])
            .filter(self.parent.filter(owner));

        conn.select(&select.into())?
            .map(|row| self.child.id().recreate_key(&mut row.reader()))
            .collect()
    }

    fn check_child(&self, session: &Session, element: AdapterId) -> Result<()> {
        let adapter = session.adapter(element);
        if adapter.class() != self.child.class() {
            return Err(Error::invalid_state(format!(
                "`{}` holds a `{}` where `{}` is expected",
                self.association,
                adapter.class(),
                self.child.class()
            )));
        }
        match adapter.state() {
            ResolveState::Transient | ResolveState::Resolved => Ok(()),
            state => Err(Error::invalid_state(format!(
                "{state} child of `{}` cannot be written",
                self.association
            ))),
        }
    }
}
