use super::element_key;
use crate::mapper::IdMapping;
use automap_core::{
    driver::DatabaseConnector,
    schema::ClassName,
    session::{AdapterId, Key, Oid, Session},
    stmt::{CreateTable, Delete, Ident, Insert, Select},
    Result,
};

pub(crate) const OWNER_COLUMN: &str = "OWNER";
pub(crate) const ELEMENT_COLUMN: &str = "ELEMENT";

/// Stores a collection in its own `(OWNER, ELEMENT)` table.
///
/// Rows come back in result-set order; no element order is kept.
#[derive(Debug)]
pub struct JoinTableMapper {
    association: String,
    element_class: ClassName,
    table: Ident,
    owner: IdMapping,
    element: IdMapping,
}

impl JoinTableMapper {
    pub fn new(
        association: impl Into<String>,
        element_class: ClassName,
        table: Ident,
        owner: IdMapping,
        element: IdMapping,
    ) -> JoinTableMapper {
        JoinTableMapper {
            association: association.into(),
            element_class,
            table,
            owner,
            element,
        }
    }

    pub fn association(&self) -> &str {
        &self.association
    }

    pub fn table(&self) -> &Ident {
        &self.table
    }

    pub fn table_def(&self) -> CreateTable {
        CreateTable::new(&self.table)
            .columns([
                self.owner.reference_def().not_null(),
                self.element.reference_def().not_null(),
            ])
            .primary_key([self.owner.column().clone(), self.element.column().clone()])
    }

    pub(crate) fn needs_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<bool> {
        Ok(!conn.has_table(&self.table)?)
    }

    pub(crate) fn create_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<()> {
        if conn.has_table(&self.table)? {
            return Ok(());
        }
        conn.update(&self.table_def().into())?;
        tracing::debug!(
            association = %self.association,
            table = %self.table,
            "created join table"
        );
        Ok(())
    }

    pub(crate) fn read_elements(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        owner: Key,
    ) -> Result<Vec<AdapterId>> {
        let select = Select::new(&self.table)
            .columns([self.owner.column().clone(), self.element.column().clone()])
            .filter(self.owner.filter(owner));

        let mut elements = vec![];
        for row in conn.select(&select.into())? {
            let mut reader = row.reader();
            self.owner.recreate_key(&mut reader)?;
            let key = self.element.recreate_key(&mut reader)?;
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
        // Resolve every element key before touching the table
        let keys = elements
            .iter()
            .map(|element| element_key(session, *element, &self.element_class, &self.association))
            .collect::<Result<Vec<_>>>()?;

        self.delete_all(conn, owner)?;

        for key in keys {
            let insert = Insert::new(&self.table).values([
                self.owner.insert_value(owner),
                self.element.insert_value(key),
            ]);
            conn.update(&insert.into())?;
        }
        Ok(())
    }

    pub(crate) fn delete_all(&self, conn: &mut dyn DatabaseConnector, owner: Key) -> Result<()> {
        let delete = Delete::new(&self.table).filter(self.owner.filter(owner));
        conn.update(&delete.into())?;
        Ok(())
    }
}
