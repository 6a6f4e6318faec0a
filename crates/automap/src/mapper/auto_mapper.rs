use super::{
    naming, BuildContext, CollectionMapper, CollectionStrategy, FieldMapping, FieldRequest,
    IdMapping, VersionMapping,
};
use automap_core::{
    driver::{DatabaseConnector, RowReader},
    schema::{Association, ClassName, Specification},
    session::{AdapterId, Key, Oid, ResolveState, Session, Version},
    stmt::{ColumnDef, CreateTable, Delete, Ident, Insert, Select, Update, Value},
    Configuration, Error, Result,
};
use automap_sql::Serializer;
use indexmap::IndexMap;

/// Name of the primary key column of every mapped table.
pub(crate) const ID_COLUMN: &str = "ID";

/// The complete mapping of one persistent class.
///
/// Built once from the class's specification and configuration and immutable
/// afterwards. One-to-one associations become [`FieldMapping`]s (in
/// declaration order, which fixes the column order of every statement);
/// one-to-many associations each get a [`CollectionMapper`].
#[derive(Debug)]
pub struct AutoMapper {
    class: ClassName,
    table: Ident,
    id: IdMapping,
    version: VersionMapping,
    fields: Vec<Box<dyn FieldMapping>>,
    field_index: IndexMap<String, usize>,
    collections: Vec<CollectionMapper>,

    /// Owner-key columns added by other classes' combined-column collections.
    injected: Vec<ColumnDef>,
}

impl AutoMapper {
    pub(crate) fn build(cx: &BuildContext<'_>, class: &ClassName) -> Result<AutoMapper> {
        let specs = cx.specs;
        let specification = specs.get(class)?;
        let class_config = cx.class_config(class);

        let table = naming::table_name(class, &class_config);
        let id = IdMapping::new(ID_COLUMN, super::key_kind(&class_config)?);

        let associations = mapped_associations(specification, &class_config)?;
        let (collection_associations, field_associations): (Vec<_>, Vec<_>) = associations
            .into_iter()
            .partition(|association| association.is_one_to_many());

        let mut fields = Vec::with_capacity(field_associations.len());
        let mut field_index = IndexMap::new();

        for association in field_associations {
            let target_key = match association.target() {
                Some(target) => cx.target_key(target)?,
                None => None,
            };
            let mapping = cx.factory.create(FieldRequest {
                association,
                column: naming::column_name(&association.id),
                target_key,
            })?;
            field_index.insert(association.id.clone(), fields.len());
            fields.push(mapping);
        }

        let mut collections = Vec::with_capacity(collection_associations.len());
        for association in collection_associations {
            let strategy = CollectionStrategy::from_config(class, &class_config, association)?;
            collections.push(CollectionMapper::build(
                cx,
                class,
                &table,
                id.kind(),
                association,
                strategy,
            )?);
        }

        let mapper = AutoMapper {
            class: class.clone(),
            table,
            id,
            version: VersionMapping::default(),
            fields,
            field_index,
            collections,
            injected: cx.injected_columns(class),
        };
        mapper.check_columns()?;

        let strategies: Vec<_> = mapper
            .collections
            .iter()
            .map(|collection| format!("{}={}", collection.association(), collection.strategy()))
            .collect();
        tracing::debug!(
            class = %mapper.class,
            table = %mapper.table,
            fields = mapper.fields.len(),
            collections = ?strategies,
            "built class mapper"
        );

        Ok(mapper)
    }

    /// Two associations (or an association and a bookkeeping column) must
    /// never land in the same column.
    fn check_columns(&self) -> Result<()> {
        let mut seen = vec![];
        for def in self.table_def(None).columns {
            if seen.contains(&def.name) {
                return Err(Error::invalid_configuration(format!(
                    "column {} of `{}` is mapped more than once",
                    def.name, self.class
                )));
            }
            seen.push(def.name);
        }
        Ok(())
    }

    pub fn class(&self) -> &ClassName {
        &self.class
    }

    pub fn table(&self) -> &Ident {
        &self.table
    }

    pub fn id(&self) -> &IdMapping {
        &self.id
    }

    pub fn version(&self) -> &VersionMapping {
        &self.version
    }

    /// True if the database assigns keys of this class.
    pub fn db_creates_id(&self) -> bool {
        self.id.db_creates_id()
    }

    pub fn fields(&self) -> impl Iterator<Item = &dyn FieldMapping> + '_ {
        self.fields.iter().map(|field| &**field)
    }

    pub fn field_mapping_for(&self, association: &str) -> Option<&dyn FieldMapping> {
        self.field_index
            .get(association)
            .map(|index| &*self.fields[*index])
    }

    pub fn collections(&self) -> &[CollectionMapper] {
        &self.collections
    }

    pub fn collection(&self, association: &str) -> Option<&CollectionMapper> {
        self.collections
            .iter()
            .find(|collection| collection.association() == association)
    }

    /// Field columns in mapping order.
    pub fn columns(&self) -> Vec<Ident> {
        let mut columns = vec![];
        for field in &self.fields {
            field.append_columns(&mut columns);
        }
        columns
    }

    /// Quoted field columns joined with `, `.
    pub fn column_list(&self) -> String {
        self.columns()
            .iter()
            .map(Ident::quoted)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Literal field values of `object`, each followed by a comma so that
    /// key and version values can be appended directly.
    pub fn values(&self, session: &Session, object: AdapterId) -> Result<String> {
        let mut values = String::new();
        for value in self.field_values(session, object)? {
            values.push_str(&Serializer::literal(&value));
            values.push(',');
        }
        Ok(values)
    }

    fn field_values(&self, session: &Session, object: AdapterId) -> Result<Vec<Value>> {
        let mut values = vec![];
        for field in &self.fields {
            field.append_values(session, object, &mut values)?;
        }
        Ok(values)
    }

    fn field_pairs(&self, session: &Session, object: AdapterId) -> Result<Vec<(Ident, Value)>> {
        Ok(self
            .columns()
            .into_iter()
            .zip(self.field_values(session, object)?)
            .collect())
    }

    /// `CREATE TABLE` for this class, with a parent-key column when the
    /// rows are owned by another class.
    pub fn table_def(&self, parent: Option<&IdMapping>) -> CreateTable {
        let mut columns = vec![self.id.primary_key_def()];
        columns.extend(parent.map(|parent| parent.reference_def().not_null()));
        for field in &self.fields {
            field.append_column_defs(&mut columns);
        }
        columns.extend(self.version.column_defs());
        columns.extend(self.injected.iter().cloned());

        let stmt = CreateTable::new(&self.table).columns(columns);
        if self.db_creates_id() {
            stmt
        } else {
            stmt.primary_key([self.id.column().clone()])
        }
    }

    /// True if this class's table, or the table of any of its collections,
    /// does not exist yet.
    pub fn needs_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<bool> {
        if !conn.has_table(&self.table)? {
            return Ok(true);
        }
        for collection in &self.collections {
            if collection.needs_tables(conn)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Creates every missing table of this class and its collections.
    pub fn create_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<()> {
        self.create_tables_with(conn, None)
    }

    pub(crate) fn create_tables_with(
        &self,
        conn: &mut dyn DatabaseConnector,
        parent: Option<&IdMapping>,
    ) -> Result<()> {
        if !conn.has_table(&self.table)? {
            conn.update(&self.table_def(parent).into())?;
            tracing::debug!(class = %self.class, table = %self.table, "created table");
        }
        for collection in &self.collections {
            collection.create_tables(conn)?;
        }
        Ok(())
    }

    /// Columns read when hydrating an object, after `leading`.
    pub(crate) fn select_columns(&self, leading: impl IntoIterator<Item = Ident>) -> Vec<Ident> {
        let mut columns: Vec<_> = leading.into_iter().collect();
        columns.extend(self.columns());
        columns.extend(self.version.columns());
        columns
    }

    /// Inserts the row of `object`.
    ///
    /// With `key == None` the database assigns the key. Returns the key the
    /// row was stored under.
    pub(crate) fn insert_row(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &Session,
        object: AdapterId,
        parent: Option<(&IdMapping, Key)>,
        key: Option<Key>,
        version: &Version,
    ) -> Result<Key> {
        let mut insert = Insert::new(&self.table);
        if let Some(key) = key {
            insert = insert.values([self.id.insert_value(key)]);
        }
        if let Some((parent, parent_key)) = parent {
            insert = insert.values([parent.insert_value(parent_key)]);
        }
        insert = insert
            .values(self.field_pairs(session, object)?)
            .values(self.version.values(version)?);

        conn.update(&insert.into())?;

        match key {
            Some(key) => Ok(key),
            None => Ok(Key::Int(conn.last_insert_id()?)),
        }
    }

    /// Reads field values and the version token of `object` from `row`.
    ///
    /// The object must be Resolving; it ends up Resolved and clean.
    pub(crate) fn hydrate(
        &self,
        session: &mut Session,
        object: AdapterId,
        row: &mut RowReader<'_>,
    ) -> Result<()> {
        for field in &self.fields {
            field.initialize_field(session, object, row)?;
        }
        let version = self.version.recreate(row)?;

        let adapter = session.adapter_mut(object);
        adapter.set_version(version);
        adapter.state_mut().change_to(ResolveState::Resolved)?;
        adapter.mark_clean();
        Ok(())
    }

    /// Hydrates `object` from `row` if it is a Ghost; objects that are
    /// already loaded keep their in-memory state.
    pub(crate) fn resolve_from_row(
        &self,
        session: &mut Session,
        object: AdapterId,
        row: &mut RowReader<'_>,
    ) -> Result<()> {
        if !begin_resolve(session, object)? {
            return Ok(());
        }
        let result = self.hydrate(session, object, row);
        end_resolve(session, object, result.is_ok());
        result
    }

    /// Writes `object`: an `INSERT` for a new object, a version-guarded
    /// `UPDATE` for a changed stored one. Loaded collections are saved
    /// afterwards.
    pub fn save(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
    ) -> Result<()> {
        let (state, dirty) = {
            let adapter = session.adapter(object);
            (adapter.state(), adapter.is_dirty())
        };

        match state {
            ResolveState::Transient => {
                let key = if self.db_creates_id() {
                    None
                } else {
                    Some(Key::generate())
                };
                let version = Version::initial();
                let key = self.insert_row(conn, session, object, None, key, &version)?;

                session.make_persistent(object, Oid::new(&self.class, key))?;
                let adapter = session.adapter_mut(object);
                adapter.set_version(version);
                adapter.mark_clean();
            }
            ResolveState::Resolved if dirty => {
                let (key, current) = stored_identity(session, object)?;
                let next = current.next();

                let update = Update::new(&self.table)
                    .set_all(self.field_pairs(session, object)?)
                    .set_all(self.version.values(&next)?)
                    .filter(self.version.guard(self.id.filter(key), &current)?);

                if conn.update(&update.into())? == 0 {
                    return Err(Error::concurrent_modification(format!(
                        "{} was changed or deleted since it was loaded",
                        Oid::new(&self.class, key)
                    )));
                }

                let adapter = session.adapter_mut(object);
                adapter.set_version(next);
                adapter.mark_clean();
            }
            // The stored row was never read, so there is no version to guard
            // an update with.
            ResolveState::Ghost if dirty => {
                let oid = session.adapter(object).oid().cloned();
                return Err(Error::invalid_state(format!(
                    "{} has field changes but was never loaded; resolve it before changing it",
                    oid.map_or_else(|| self.class.to_string(), |oid| oid.to_string())
                )));
            }
            // Nothing of the row itself is known or changed; collections may
            // still have been loaded and edited.
            ResolveState::Resolved | ResolveState::Ghost => {}
            state => {
                return Err(Error::invalid_state(format!(
                    "cannot save a {state} object of `{}`",
                    self.class
                )))
            }
        }

        self.save_collections(conn, session, object)
    }

    pub(crate) fn save_collections(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
    ) -> Result<()> {
        for collection in &self.collections {
            collection.save_collection(conn, session, object)?;
        }
        Ok(())
    }

    /// Loads the row of a Ghost object. Loaded objects are left untouched.
    pub fn resolve(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
    ) -> Result<()> {
        let Some(oid) = session.adapter(object).oid().cloned() else {
            return Ok(());
        };
        if !begin_resolve(session, object)? {
            return Ok(());
        }

        let result = self.read_row(conn, session, object, &oid);
        end_resolve(session, object, result.is_ok());
        result
    }

    fn read_row(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
        oid: &Oid,
    ) -> Result<()> {
        let select = Select::new(&self.table)
            .columns(self.select_columns([]))
            .filter(self.id.filter(oid.key));

        let mut rows = conn.select(&select.into())?;
        let Some(row) = rows.next() else {
            return Err(Error::object_not_found(oid.to_string()));
        };
        rows.close();

        self.hydrate(session, object, &mut row.reader())
    }

    /// Deletes the row of `object` under the version guard, then the rows
    /// of its collections.
    pub fn destroy(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
    ) -> Result<()> {
        self.resolve(conn, session, object)?;
        let (key, current) = stored_identity(session, object)?;

        let delete = Delete::new(&self.table)
            .filter(self.version.guard(self.id.filter(key), &current)?);
        if conn.update(&delete.into())? == 0 {
            return Err(Error::concurrent_modification(format!(
                "{} was changed or deleted since it was loaded",
                Oid::new(&self.class, key)
            )));
        }

        self.delete_collections(conn, key)?;
        session.mark_destroyed(object)
    }

    pub(crate) fn delete_collections(
        &self,
        conn: &mut dyn DatabaseConnector,
        key: Key,
    ) -> Result<()> {
        for collection in &self.collections {
            collection.delete_all(conn, key)?;
        }
        Ok(())
    }

    /// Every stored object of this class.
    pub fn instances(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
    ) -> Result<Vec<AdapterId>> {
        let select = Select::new(&self.table)
            .columns(self.select_columns([self.id.column().clone()]));

        let mut objects = vec![];
        for row in conn.select(&select.into())? {
            let mut reader = row.reader();
            let key = self.id.recreate_key(&mut reader)?;
            let object = session.adapter_for(Oid::new(&self.class, key));
            self.resolve_from_row(session, object, &mut reader)?;
            objects.push(object);
        }
        Ok(objects)
    }

    pub fn count_instances(&self, conn: &mut dyn DatabaseConnector) -> Result<u64> {
        let mut rows = conn.select(&Select::count(&self.table).into())?;
        let count = match rows.next() {
            Some(row) => row.reader().next_value()?.to_i64()?,
            None => 0,
        };
        u64::try_from(count).map_err(|_| Error::type_conversion(Value::I64(count), "u64"))
    }

    pub fn has_instances(&self, conn: &mut dyn DatabaseConnector) -> Result<bool> {
        Ok(self.count_instances(conn)? > 0)
    }
}

/// Associations of a class that are written to the database, honoring the
/// `all-fields` / `fields` selection.
pub(crate) fn mapped_associations<'a>(
    specification: &'a Specification,
    class_config: &Configuration,
) -> Result<Vec<&'a Association>> {
    let class = &specification.name;

    let associations: Vec<_> = if class_config.get_bool("all-fields", true)? {
        specification.persistent_associations().collect()
    } else {
        let Some(selected) = class_config.get_list("fields") else {
            return Err(Error::invalid_configuration(format!(
                "`{class}` sets all-fields to false but lists no `fields`"
            )));
        };
        for id in &selected {
            if specification.find(id).is_none() {
                return Err(Error::invalid_configuration(format!(
                    "`{class}` has no association `{id}`"
                )));
            }
        }
        specification
            .persistent_associations()
            .filter(|association| selected.contains(&association.id.as_str()))
            .collect()
    };

    if associations.is_empty() {
        return Err(Error::invalid_configuration(format!(
            "`{class}` has no persistent properties"
        )));
    }
    Ok(associations)
}

/// Key and version token of an object that has a stored row.
fn stored_identity(session: &Session, object: AdapterId) -> Result<(Key, Version)> {
    let adapter = session.adapter(object);
    match (adapter.oid(), adapter.version()) {
        (Some(oid), Some(version)) => Ok((oid.key, *version)),
        _ => Err(Error::invalid_state(format!(
            "{} object of `{}` has no stored row",
            adapter.state(),
            adapter.class()
        ))),
    }
}

/// Moves a Ghost object to Resolving. Returns false if it is not a Ghost.
fn begin_resolve(session: &mut Session, object: AdapterId) -> Result<bool> {
    let adapter = session.adapter_mut(object);
    if !adapter.state().can_change_to(ResolveState::Resolving) {
        return Ok(false);
    }
    adapter.state_mut().change_to(ResolveState::Resolving)?;
    adapter.start_persisting();
    Ok(true)
}

fn end_resolve(session: &mut Session, object: AdapterId, resolved: bool) {
    let adapter = session.adapter_mut(object);
    if !resolved && adapter.state() == ResolveState::Resolving {
        *adapter.state_mut() = ResolveState::Ghost;
    }
    adapter.end_persisting();
}
