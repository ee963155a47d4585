//! The data store contract and its in-memory implementation.

pub mod in_memory;
pub mod observe;
pub mod results;
pub mod r#trait;

pub use in_memory::{InMemoryDataStore, InMemoryStoreConfig};
pub use observe::{Cancelable, QuerySnapshot, QuerySubscription};
pub use results::QueryResults;
pub use r#trait::DataStore;
