// Service exports
pub mod cache;
pub mod connections;
pub mod memory;
pub mod notify;
pub mod postgres;
pub mod store;
pub mod taxonomy;

pub use cache::{CacheManager, CacheKey, CacheError, CacheStats, CachedProfileStore};
pub use connections::{ConnectionService, MatchError};
pub use memory::InMemoryStore;
pub use notify::{LogNotifier, Notification, NotificationSink};
pub use postgres::{PostgresClient, StatusColumn};
pub use store::{ProfileStore, RelationshipGraph, TaxonomySource, StoreError};
pub use taxonomy::TaxonomyCache;
