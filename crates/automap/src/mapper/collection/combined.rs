use super::element_key;
use crate::mapper::IdMapping;
use automap_core::{
    driver::DatabaseConnector,
    schema::ClassName,
    session::{AdapterId, Key, Oid, Session},
    stmt::{Ident, Select, Update, Value},
    Result,
};

/// Stores a collection as an owner-key column in the element class's table.
///
/// The column is named after the owning class and the association
/// (`Order_lineItems`), so one element table can serve several parent
/// collections. Each element belongs to at most one owner per collection.
#[derive(Debug)]
pub struct CombinedColumnMapper {
    association: String,
    element_class: ClassName,

    /// Table of the element class.
    table: Ident,

    /// Primary key of the element table.
    element: IdMapping,

    /// The owner-key column added to the element table.
    owner: IdMapping,
}

impl CombinedColumnMapper {
    pub fn new(
        association: impl Into<String>,
        element_class: ClassName,
        table: Ident,
        element: IdMapping,
        owner: IdMapping,
    ) -> CombinedColumnMapper {
        CombinedColumnMapper {
            association: association.into(),
            element_class,
            table,
            element,
            owner,
        }
    }

    pub fn association(&self) -> &str {
        &self.association
    }

    pub fn table(&self) -> &Ident {
        &self.table
    }

    /// Name of the owner-key column.
    pub fn column(&self) -> &Ident {
        self.owner.column()
    }

    pub(crate) fn read_elements(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        owner: Key,
    ) -> Result<Vec<AdapterId>> {
        let select = Select::new(&self.table)
            .columns([self.element.column().clone()])
            .filter(self.owner.filter(owner));

        let mut elements = vec![];
        for row in conn.select(&select.into())? {
            let key = self.element.recreate_key(&mut row.reader())?;
            elements.push(session.adapter_for(Oid::new(&self.element_class, key)));
        }
        Ok(elements)
    }

    pub(crate) fn write_elements(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        owner: Key,
        elements: &[AdapterId],
    ) -> Result<()> {
        let keys = elements
            .iter()
            .map(|element| element_key(session, *element, &self.element_class, &self.association))
            .collect::<Result<Vec<_>>>()?;

        self.delete_all(conn, owner)?;

        for key in keys {
            let update = Update::new(&self.table)
                .set(self.owner.column(), owner.to_value())
                .filter(self.element.filter(key));
            conn.update(&update.into())?;
        }
        Ok(())
    }

    /// Detaches every element of `owner`; the element rows stay.
    pub(crate) fn delete_all(&self, conn: &mut dyn DatabaseConnector, owner: Key) -> Result<()> {
        let update = Update::new(&self.table)
            .set(self.owner.column(), Value::Null)
            .filter(self.owner.filter(owner));
        conn.update(&update.into())?;
        Ok(())
    }
}
