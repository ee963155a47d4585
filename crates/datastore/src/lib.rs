//! Data store boundary: the save / query / delete / observe contract the
//! application talks to, plus an in-memory implementation for tests and
//! local development.

pub mod error;
pub mod store;

pub use error::DataStoreError;
pub use store::{
    Cancelable, DataStore, InMemoryDataStore, InMemoryStoreConfig, QueryResults, QuerySnapshot,
    QuerySubscription,
};
