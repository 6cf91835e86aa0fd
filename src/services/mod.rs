//! Client-side data stores

pub mod registry;
pub mod store;

pub use registry::StoreRegistry;
pub use store::{EntityStore, Entry, FetchStatus, SearchOutcome, StoreSnapshot, SyncState};
