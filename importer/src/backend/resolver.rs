//! Relation lookups by natural key.

use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::Backend;
use crate::models::EntryId;

/// Finds the id of an existing entry from a natural key.
///
/// Lookups never fail: anything that prevents a match is logged and comes
/// back as `None`.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, value: &str, content_type: &str, natural_key: &str) -> Option<EntryId>;
}

/// [`Resolve`] over a [`Backend`] list query.
pub struct RelationResolver<'a, B: ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> RelationResolver<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Resolve by `slug`.
    pub async fn resolve_slug(&self, slug: &str, content_type: &str) -> Option<EntryId> {
        self.resolve(slug, content_type, "slug").await
    }
}

#[async_trait]
impl<'a, B: Backend + ?Sized> Resolve for RelationResolver<'a, B> {
    async fn resolve(&self, value: &str, content_type: &str, natural_key: &str) -> Option<EntryId> {
        match self.backend.list_by_field(content_type, natural_key, value).await {
            // First match wins; backend order is not re-sorted.
            Ok(entries) => match entries.into_iter().next() {
                Some(entry) => {
                    debug!(content_type, natural_key, value, id = %entry.id, "relation resolved");
                    Some(entry.id)
                }
                None => {
                    warn!(content_type, natural_key, value, "No {} entry found with {} '{}'", content_type, natural_key, value);
                    None
                }
            },
            Err(e) => {
                error!(content_type, natural_key, value, error = %e, "Error looking up {} '{}'", content_type, value);
                None
            }
        }
    }
}
