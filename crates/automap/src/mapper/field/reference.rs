use super::FieldMapping;
use crate::mapper::IdMapping;
use automap_core::{
    driver::RowReader,
    schema::ClassName,
    session::{AdapterId, Oid, Session},
    stmt::{ColumnDef, Ident, Value},
    Error, Result,
};

/// A reference to another persistent object, stored as that object's key.
///
/// Loading a reference never reads the target's row: the field is pointed at
/// the target's adapter, which stays a Ghost until it is loaded itself.
#[derive(Debug, Clone)]
pub struct ReferenceMapping {
    association: String,
    target: ClassName,
    key: IdMapping,
}

impl ReferenceMapping {
    pub fn new(association: impl Into<String>, target: ClassName, key: IdMapping) -> Self {
        ReferenceMapping {
            association: association.into(),
            target,
            key,
        }
    }

    pub fn target(&self) -> &ClassName {
        &self.target
    }
}

impl FieldMapping for ReferenceMapping {
    fn association(&self) -> &str {
        &self.association
    }

    fn append_columns(&self, columns: &mut Vec<Ident>) {
        columns.push(self.key.column().clone());
    }

    fn append_column_defs(&self, defs: &mut Vec<ColumnDef>) {
        defs.push(self.key.reference_def());
    }

    fn append_values(
        &self,
        session: &Session,
        object: AdapterId,
        values: &mut Vec<Value>,
    ) -> Result<()> {
        let Some(target) = session.reference(object, &self.association) else {
            values.push(Value::Null);
            return Ok(());
        };

        let Some(oid) = session.adapter(target).oid() else {
            return Err(Error::invalid_state(format!(
                "`{}` refers to an object that has not been saved",
                self.association
            )));
        };

        values.push(oid.key.to_value());
        Ok(())
    }

    fn initialize_field(
        &self,
        session: &mut Session,
        object: AdapterId,
        row: &mut RowReader<'_>,
    ) -> Result<()> {
        let target = self
            .key
            .recreate_optional_key(row)?
            .map(|key| session.adapter_for(Oid::new(&self.target, key)));
        session.set_reference(object, &self.association, target);
        Ok(())
    }
}
