pub mod sqlite_store;
pub mod store;

pub use sqlite_store::SqliteHistoryStore;
pub use store::{Collection, HistoryStore, InMemoryHistoryStore, DEFAULT_HISTORY_LIMIT};
