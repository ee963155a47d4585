//! `orderapp-core`: model foundation building blocks.
//!
//! This crate contains the pieces every generated model shares: identifiers,
//! the [`Model`] trait and its schema metadata, temporal scalar types and the
//! query vocabulary (fields, predicates, sorting, pagination) used to address
//! records in a data store. It performs no IO.

pub mod error;
pub mod id;
pub mod model;
pub mod query;
pub mod temporal;

pub use error::{ModelError, ModelResult};
pub use id::ModelId;
pub use model::{FieldType, Model, ModelField, ModelRef, ModelSchema};
pub use query::{
    ObserveQueryOptions, Page, QueryField, QueryOptions, QueryPredicate, QuerySortBy, SortOrder,
};
pub use temporal::Time;
