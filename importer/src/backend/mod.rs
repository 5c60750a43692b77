//! Strapi REST API access.
//!
//! The importer and the relation resolver only see the [`Backend`] trait, so
//! both can run against an in-memory backend in tests. [`StrapiClient`] is
//! the HTTP implementation.
//!
//! | Method | Path                                        | Used for             |
//! |--------|---------------------------------------------|----------------------|
//! | GET    | `/api/{contentType}?filters[{key}]={value}` | Relation lookups     |
//! | POST   | `/api/{contentType}` with `{ data }`        | Creating entries     |

mod client;
pub mod resolver;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

pub use client::StrapiClient;
pub use resolver::{RelationResolver, Resolve};

use crate::error::BackendResult;
use crate::models::{EntryId, Payload};

/// An entry as returned in a list envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Operations the importer needs from the content backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Entries of `content_type` whose `field` equals `value`, in backend order.
    async fn list_by_field(&self, content_type: &str, field: &str, value: &str) -> BackendResult<Vec<Entry>>;

    /// Create one entry. Returns the new id when the response carries one.
    async fn create(&self, content_type: &str, payload: &Payload) -> BackendResult<Option<EntryId>>;
}
