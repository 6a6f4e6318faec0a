use automap_core::{
    schema::{Association, ClassName},
    stmt::Ident,
    Configuration,
};
use heck::ToShoutySnakeCase;

/// Table of a class: the `table` override if configured, otherwise the
/// upper-cased simple class name made SQL-safe.
pub(crate) fn table_name(class: &ClassName, class_config: &Configuration) -> Ident {
    match class_config.get("table") {
        Some(table) => Ident::new(table),
        None => Ident::safe(&class.simple_name().to_uppercase()),
    }
}

/// Column holding a one-to-one association: `unitPrice` -> `UNIT_PRICE`.
pub(crate) fn column_name(association: &str) -> Ident {
    Ident::safe(&association.to_shouty_snake_case())
}

/// Join table of a collection: `<OWNER TABLE>_<ASSOCIATION>`.
pub(crate) fn join_table_name(owner_table: &Ident, association: &str) -> Ident {
    Ident::safe(&format!(
        "{}_{}",
        owner_table.as_str(),
        association.to_shouty_snake_case()
    ))
}

/// Column a combined-column collection adds to its element table.
///
/// Named `<OwningClass>_<association>` when the association knows its owning
/// class, so that several parents can each keep their own column in the same
/// child table. Falls back to the element type's simple name.
pub(crate) fn combined_column_name(association: &Association) -> Ident {
    if let Some(peer) = &association.peer {
        return Ident::safe(&format!(
            "{}_{}",
            peer.owning_class.simple_name(),
            association.id
        ));
    }

    let element = association
        .element_type
        .as_ref()
        .map(ClassName::simple_name)
        .unwrap_or(association.id.as_str());
    Ident::safe(element)
}
