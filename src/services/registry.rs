//! Store registry: one entity store per kind, built once at startup

use std::sync::Arc;

use crate::{
    client::{CollectionShape, HttpResourceClient, ResourceClient},
    config::AppConfig,
    error::AppResult,
    models::EntityKind,
    services::store::{EntityStore, SearchOutcome},
};

pub struct StoreRegistry {
    books: Arc<EntityStore>,
    authors: Arc<EntityStore>,
}

impl StoreRegistry {
    /// Build every store from configuration, sharing one resource client
    pub fn new(config: &AppConfig, client: Arc<dyn ResourceClient>) -> Self {
        let build = |kind: EntityKind| {
            let shape = CollectionShape::from_envelope(config.entity(kind).envelope.as_deref());
            let store = EntityStore::new(kind, config.endpoint(kind), Arc::clone(&client))
                .with_shape(shape)
                .with_timeout(config.api.timeout());
            tracing::debug!("Registered {} store at {}", kind, store.endpoint());
            Arc::new(store)
        };

        Self {
            books: build(EntityKind::Books),
            authors: build(EntityKind::Authors),
        }
    }

    /// Build with the HTTP client described by `config.api`
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = HttpResourceClient::new(&config.api)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    pub fn get(&self, kind: EntityKind) -> Arc<EntityStore> {
        match kind {
            EntityKind::Books => Arc::clone(&self.books),
            EntityKind::Authors => Arc::clone(&self.authors),
        }
    }

    /// Look a store up by kind name ("books", "authors")
    pub fn lookup(&self, name: &str) -> AppResult<Arc<EntityStore>> {
        Ok(self.get(name.parse()?))
    }

    pub fn books(&self) -> &Arc<EntityStore> {
        &self.books
    }

    pub fn authors(&self) -> &Arc<EntityStore> {
        &self.authors
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &Arc<EntityStore>)> {
        [(EntityKind::Books, &self.books), (EntityKind::Authors, &self.authors)].into_iter()
    }

    /// Search every store concurrently
    pub async fn search_all(&self) -> Vec<(EntityKind, SearchOutcome)> {
        let (books, authors) = tokio::join!(self.books.search(), self.authors.search());
        vec![(EntityKind::Books, books), (EntityKind::Authors, authors)]
    }
}
