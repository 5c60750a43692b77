//! In-memory [`Backend`] for tests.
//!
//! Created entries become visible to later lookups, so import order can be
//! exercised end to end.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{Backend, Entry};
use crate::error::{BackendError, BackendResult};
use crate::models::{EntryId, Payload};

#[derive(Default)]
pub(crate) struct FakeBackend {
    entries: Mutex<Vec<(String, Entry)>>,
    created: Mutex<Vec<(String, Payload)>>,
    next_id: AtomicUsize,
    creates: AtomicUsize,
    lookups: AtomicUsize,
    reject_creates: HashSet<usize>,
    fail_lookups: bool,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1000),
            ..Self::default()
        }
    }

    /// Reject the n-th create call (1-based, counted across content types).
    pub(crate) fn rejecting(mut self, call: usize) -> Self {
        self.reject_creates.insert(call);
        self
    }

    pub(crate) fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub(crate) fn seed(&self, content_type: &str, id: u64, fields: Value) {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.entries.lock().unwrap().push((
            content_type.to_string(),
            Entry {
                id: EntryId::Number(id),
                fields,
            },
        ));
    }

    /// Accepted creates, in call order.
    pub(crate) fn created(&self) -> Vec<(String, Payload)> {
        self.created.lock().unwrap().clone()
    }

    pub(crate) fn created_in(&self, content_type: &str) -> Vec<Payload> {
        self.created()
            .into_iter()
            .filter(|(ct, _)| ct == content_type)
            .map(|(_, p)| p)
            .collect()
    }

    pub(crate) fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub(crate) fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list_by_field(&self, content_type: &str, field: &str, value: &str) -> BackendResult<Vec<Entry>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(BackendError::InvalidResponse("lookup failed".into()));
        }

        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(ct, entry)| ct == content_type && entry.fields.get(field).and_then(Value::as_str) == Some(value))
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn create(&self, content_type: &str, payload: &Payload) -> BackendResult<Option<EntryId>> {
        let call = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.reject_creates.contains(&call) {
            return Err(BackendError::Rejected {
                status: 400,
                body: r#"{"error":{"name":"ValidationError"}}"#.into(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u64;
        self.entries.lock().unwrap().push((
            content_type.to_string(),
            Entry {
                id: EntryId::Number(id),
                fields: payload.clone().into_inner(),
            },
        ));
        self.created
            .lock()
            .unwrap()
            .push((content_type.to_string(), payload.clone()));
        Ok(Some(EntryId::Number(id)))
    }
}
