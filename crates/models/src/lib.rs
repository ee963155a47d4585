//! Generated model types for the OrderApp schema.
//!
//! Every model is an immutable record built through a staged builder: the
//! entry point `Model::builder()` only exposes the first required setter, each
//! required setter hands back the next step, and `build()` only exists once all
//! required fields are set. Updates go through `copy_of_builder()`, and
//! `just_id()` yields a reference that can be deleted but never saved.

pub mod account_representative;
pub mod address;
pub mod blog;
pub mod customer;
pub mod employee;
pub mod inventory;
pub mod order;
pub mod product;
pub mod warehouse;

pub use account_representative::AccountRepresentative;
pub use address::Address;
pub use blog::Blog;
pub use customer::Customer;
pub use employee::Employee;
pub use inventory::Inventory;
pub use order::Order;
pub use product::Product;
pub use warehouse::Warehouse;

use orderapp_core::{Model, ModelSchema};

/// Schemas of every model in this crate, in declaration order.
pub static SCHEMAS: [ModelSchema; 9] = [
    AccountRepresentative::SCHEMA,
    Address::SCHEMA,
    Blog::SCHEMA,
    Customer::SCHEMA,
    Employee::SCHEMA,
    Inventory::SCHEMA,
    Order::SCHEMA,
    Product::SCHEMA,
    Warehouse::SCHEMA,
];

/// Look up a schema by model name.
pub fn schema(name: &str) -> Option<&'static ModelSchema> {
    SCHEMAS.iter().find(|s| s.name == name)
}


#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, Utc};
    use orderapp_core::Model;
    use orderapp_core::model::{from_json, to_json};

    /// `model` the way a store hands it back, with both system timestamps set.
    pub(crate) fn stamped<M: Model>(model: &M, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> M {
        let mut json = to_json(model).unwrap();
        json["createdAt"] = serde_json::json!(created_at);
        json["updatedAt"] = serde_json::json!(updated_at);
        from_json(json).unwrap()
    }

    pub(crate) fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }
}
