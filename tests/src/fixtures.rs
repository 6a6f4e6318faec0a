//! Class descriptors shared by the integration tests.

use automap::{Configuration, Primitive, Specification, Specifications};

pub const CUSTOMER: &str = "shop.Customer";
pub const ORDER: &str = "shop.Order";
pub const LINE: &str = "shop.Line";
pub const NOTE: &str = "shop.Note";
pub const TAG: &str = "shop.Tag";

/// `Order` has a customer, line items and tags; each line has notes.
pub fn shop() -> Specifications {
    Specifications::new()
        .with(
            Specification::new(CUSTOMER)
                .value("name", Primitive::Text)
                .value("vip", Primitive::Bool)
                .value("since", Primitive::Timestamp),
        )
        .with(
            Specification::new(ORDER)
                .value("number", Primitive::Text)
                .value("total", Primitive::Real)
                .reference("customer", CUSTOMER)
                .collection("lineItems", LINE)
                .collection("tags", TAG),
        )
        .with(
            Specification::new(LINE)
                .value("product", Primitive::Text)
                .value("quantity", Primitive::Integer)
                .collection("notes", NOTE),
        )
        .with(Specification::new(NOTE).value("text", Primitive::Text))
        .with(Specification::new(TAG).value("label", Primitive::Text))
}

/// Tags in a join table, line items and their notes as owned rows.
pub fn owned_lines() -> Configuration {
    Configuration::new()
        .set("automap.shop.Order.mapper.tags", "join-table")
        .set("automap.shop.Order.mapper.lineItems", "owned")
        .set("automap.shop.Line.mapper.notes", "owned")
}
