mod schema;
mod store;
mod types;

pub use schema::Database;
pub use store::{KeyValueStore, MemoryStore};
pub use types::{DatabaseError, StorageError};
