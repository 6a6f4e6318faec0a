use crate::mapper::{
    self, AutoMapper, BuildContext, CollectionMapper, CollectionStrategy, DefaultFieldMappings,
    FieldMappingFactory, IdMapping,
};
use automap_core::{
    driver::DatabaseConnector,
    schema::{ClassName, Specifications},
    session::{AdapterId, Oid, Session},
    stmt::{ColumnDef, Ident},
    Configuration, Error, Result,
};
use indexmap::IndexMap;

use std::fmt;

/// Maps every persistent class of an application.
///
/// Holds one [`AutoMapper`] per top-level class. Classes owned by another
/// class's collection are mapped inside that collection and are only written
/// through their owner.
#[derive(Debug)]
pub struct ObjectStore {
    mappers: IndexMap<ClassName, AutoMapper>,

    /// Owned class -> the collection that owns it.
    owned: IndexMap<ClassName, Owner>,
}

#[derive(Debug, Clone)]
struct Owner {
    class: ClassName,
    association: String,
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.association)
    }
}

#[derive(Debug)]
pub struct Builder {
    factory: Box<dyn FieldMappingFactory>,
}

impl Default for Builder {
    fn default() -> Builder {
        Builder {
            factory: Box::new(DefaultFieldMappings),
        }
    }
}

impl Builder {
    /// Replaces the factory that maps one-to-one associations to columns.
    pub fn field_mappings(mut self, factory: impl FieldMappingFactory + 'static) -> Builder {
        self.factory = Box::new(factory);
        self
    }

    /// Builds every class mapper, failing on the first configuration error.
    pub fn build(&self, specs: &Specifications, config: &Configuration) -> Result<ObjectStore> {
        let Layout { injected, owned } = Layout::scan(specs, config)?;

        let cx = BuildContext {
            specs,
            config,
            factory: &*self.factory,
            injected: &injected,
        };

        let mut mappers = IndexMap::new();
        for specification in specs.iter() {
            let class = &specification.name;
            if owned.contains_key(class) {
                continue;
            }
            mappers.insert(class.clone(), AutoMapper::build(&cx, class)?);
        }
        check_table_names(&mappers)?;

        Ok(ObjectStore { mappers, owned })
    }
}

/// Relations between classes that have to be known before any class mapper
/// is built.
struct Layout {
    injected: IndexMap<ClassName, Vec<ColumnDef>>,
    owned: IndexMap<ClassName, Owner>,
}

impl Layout {
    fn scan(specs: &Specifications, config: &Configuration) -> Result<Layout> {
        let mut injected: IndexMap<ClassName, Vec<ColumnDef>> = IndexMap::new();
        let mut owned = IndexMap::new();

        for specification in specs.iter() {
            let class = &specification.name;
            let class_config = config.subset(&format!("{}.{class}", mapper::CONFIG_PREFIX));
            let owner_key = mapper::key_kind(&class_config)?;

            for association in mapper::mapped_associations(specification, &class_config)? {
                if !association.is_one_to_many() {
                    continue;
                }
                let Some(element) = association
                    .element_type
                    .as_ref()
                    .or_else(|| association.target())
                else {
                    continue;
                };

                match CollectionStrategy::from_config(class, &class_config, association)? {
                    CollectionStrategy::CombinedColumn => {
                        let column = mapper::combined_column_name(association);
                        injected
                            .entry(element.clone())
                            .or_default()
                            .push(IdMapping::new(column, owner_key).reference_def());
                    }
                    CollectionStrategy::OwnedChild => {
                        let owner = Owner {
                            class: class.clone(),
                            association: association.id.clone(),
                        };
                        if let Some(previous) = owned.insert(element.clone(), owner.clone()) {
                            return Err(Error::invalid_configuration(format!(
                                "`{element}` is owned by both `{previous}` and `{owner}`"
                            )));
                        }
                    }
                    CollectionStrategy::JoinTable => {}
                }
            }
        }

        for element in owned.keys() {
            check_ownership_chain(&owned, element)?;
        }

        for element in injected.keys() {
            if let Some(owner) = owned.get(element) {
                return Err(Error::invalid_configuration(format!(
                    "`{element}` is owned by `{owner}` and cannot hold another collection's column"
                )));
            }
        }

        Ok(Layout { injected, owned })
    }
}

/// Follows the owners of `element` upwards; reaching `element` again is a
/// cycle, which would leave no class to write the rows through.
fn check_ownership_chain(owned: &IndexMap<ClassName, Owner>, element: &ClassName) -> Result<()> {
    let mut path = vec![element];
    let mut current = element;

    while let Some(owner) = owned.get(current) {
        if path.contains(&&owner.class) {
            path.push(&owner.class);
            let path = path
                .iter()
                .rev()
                .map(|class| class.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::invalid_configuration(format!(
                "ownership cycle: {path}"
            )));
        }
        path.push(&owner.class);
        current = &owner.class;
    }
    Ok(())
}

/// Two mappings sharing one table would read and rewrite each other's rows.
/// SQL compares unquoted names case-insensitively, so this does too.
fn check_table_names(mappers: &IndexMap<ClassName, AutoMapper>) -> Result<()> {
    let mut tables = IndexMap::new();
    for mapper in mappers.values() {
        claim_tables(&mut tables, mapper)?;
    }
    Ok(())
}

fn claim_tables(tables: &mut IndexMap<String, String>, mapper: &AutoMapper) -> Result<()> {
    claim(tables, mapper.table(), mapper.class().to_string())?;

    for collection in mapper.collections() {
        match collection {
            CollectionMapper::CombinedColumn(_) => {}
            CollectionMapper::JoinTable(join) => claim(
                tables,
                join.table(),
                format!("{}.{}", mapper.class(), join.association()),
            )?,
            CollectionMapper::OwnedChild(owned) => claim_tables(tables, owned.child())?,
        }
    }
    Ok(())
}

fn claim(tables: &mut IndexMap<String, String>, table: &Ident, user: String) -> Result<()> {
    match tables.get(&table.as_str().to_uppercase()) {
        Some(previous) => Err(Error::invalid_configuration(format!(
            "table {table} is used by both `{previous}` and `{user}`"
        ))),
        None => {
            tables.insert(table.as_str().to_uppercase(), user);
            Ok(())
        }
    }
}

impl ObjectStore {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Builds a store with the default field mappings.
    pub fn new(specs: &Specifications, config: &Configuration) -> Result<ObjectStore> {
        ObjectStore::builder().build(specs, config)
    }

    /// Mapper of a top-level class.
    pub fn mapper(&self, class: &ClassName) -> Result<&AutoMapper> {
        if let Some(mapper) = self.mappers.get(class) {
            return Ok(mapper);
        }
        match self.owned.get(class) {
            Some(owner) => Err(Error::invalid_state(format!(
                "`{class}` is owned by `{owner}`; access it through its owner"
            ))),
            None => Err(Error::invalid_configuration(format!(
                "`{class}` is not a persistent class"
            ))),
        }
    }

    pub fn mappers(&self) -> impl Iterator<Item = &AutoMapper> + '_ {
        self.mappers.values()
    }

    pub fn is_owned(&self, class: &ClassName) -> bool {
        self.owned.contains_key(class)
    }

    pub fn needs_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<bool> {
        for mapper in self.mappers.values() {
            if mapper.needs_tables(conn)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Creates every missing table. Existing tables are left as they are.
    pub fn create_tables(&self, conn: &mut dyn DatabaseConnector) -> Result<()> {
        for mapper in self.mappers.values() {
            mapper.create_tables(conn)?;
        }
        Ok(())
    }

    /// Stores `object` and its loaded collections.
    pub fn save(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
    ) -> Result<()> {
        self.mapper_of(session, object)?.save(conn, session, object)
    }

    /// Returns the object with id `oid`, reading its row unless it is
    /// already loaded in the session.
    pub fn load(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        oid: &Oid,
    ) -> Result<AdapterId> {
        let mapper = self.mapper(&oid.class)?;
        let object = session.adapter_for(oid.clone());
        mapper.resolve(conn, session, object)?;
        Ok(object)
    }

    /// Reads the row of a Ghost object, such as the target of a loaded
    /// reference.
    pub fn resolve(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
    ) -> Result<()> {
        let class = session.adapter(object).class();
        self.class_mapper(class)?.resolve(conn, session, object)
    }

    /// Loads one collection of `object` unless it is already loaded.
    pub fn resolve_collection(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
        association: &str,
    ) -> Result<()> {
        let mapper = self.class_mapper(session.adapter(object).class())?;
        let Some(collection) = mapper.collection(association) else {
            return Err(Error::invalid_configuration(format!(
                "`{}` has no mapped collection `{association}`",
                mapper.class()
            )));
        };
        collection.load_collection(conn, session, object)
    }

    /// Deletes `object` and the rows of its collections.
    pub fn destroy(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        object: AdapterId,
    ) -> Result<()> {
        self.mapper_of(session, object)?.destroy(conn, session, object)
    }

    pub fn instances(
        &self,
        conn: &mut dyn DatabaseConnector,
        session: &mut Session,
        class: &ClassName,
    ) -> Result<Vec<AdapterId>> {
        self.mapper(class)?.instances(conn, session)
    }

    pub fn count_instances(
        &self,
        conn: &mut dyn DatabaseConnector,
        class: &ClassName,
    ) -> Result<u64> {
        self.mapper(class)?.count_instances(conn)
    }

    pub fn has_instances(&self, conn: &mut dyn DatabaseConnector, class: &ClassName) -> Result<bool> {
        self.mapper(class)?.has_instances(conn)
    }

    /// Mapper of any class, including classes owned by a collection.
    fn class_mapper(&self, class: &ClassName) -> Result<&AutoMapper> {
        let Some(owner) = self.owned.get(class) else {
            return self.mapper(class);
        };
        match self.class_mapper(&owner.class)?.collection(&owner.association) {
            Some(CollectionMapper::OwnedChild(owned)) => Ok(owned.child()),
            _ => Err(Error::invalid_state(format!(
                "`{class}` is not mapped by `{owner}`"
            ))),
        }
    }

    fn mapper_of(&self, session: &Session, object: AdapterId) -> Result<&AutoMapper> {
        self.mapper(session.adapter(object).class())
    }
}
