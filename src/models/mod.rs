//! Data models for the Folio client

pub mod author;
pub mod book;
pub mod kind;
pub mod query;
pub mod record;

// Re-export commonly used types
pub use author::{Author, NewAuthor};
pub use book::{Book, NewBook};
pub use kind::EntityKind;
pub use query::SearchQuery;
pub use record::Record;
