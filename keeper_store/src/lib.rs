mod bookmark;
mod memory;
mod sqlite;


pub use bookmark::{BookmarkStore, BOOKMARKS_KEY};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
