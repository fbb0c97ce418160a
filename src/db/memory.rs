// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process [`DocumentStore`], used as the remote store in tests.

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use crate::db::document::{CollectionPath, DocPath, DocumentStore};
use crate::error::{AppError, Result};

type DelayFn = Box<dyn Fn(&CollectionPath) -> Duration + Send + Sync>;

/// Document store held in memory, keyed by full document path.
#[derive(Default)]
pub struct MemoryDocuments {
    docs: RwLock<BTreeMap<String, Value>>,
    offline: AtomicBool,
    list_delay: Option<DelayFn>,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay each `list` call by a per-collection duration, to make
    /// concurrent reads complete out of order.
    pub fn with_list_delay(
        mut self,
        delay: impl Fn(&CollectionPath) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.list_delay = Some(Box::new(delay));
        self
    }

    /// While offline, every operation fails with `StoreUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(AppError::StoreUnavailable(
                "Memory document store is offline".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn poisoned<T>(_: T) -> AppError {
        AppError::StoreUnavailable("Memory document store lock poisoned".to_string())
    }
}

impl DocumentStore for MemoryDocuments {
    fn get<'a>(&'a self, path: &'a DocPath) -> BoxFuture<'a, Result<Option<Value>>> {
        async move {
            self.check_online()?;
            let docs = self.docs.read().map_err(Self::poisoned)?;
            Ok(docs.get(&path.to_string()).cloned())
        }
        .boxed()
    }

    fn list<'a>(&'a self, collection: &'a CollectionPath) -> BoxFuture<'a, Result<Vec<Value>>> {
        async move {
            if let Some(delay) = &self.list_delay {
                tokio::time::sleep(delay(collection)).await;
            }
            self.check_online()?;

            let prefix = format!("{}/", collection);
            let docs = self.docs.read().map_err(Self::poisoned)?;
            Ok(docs
                .range(prefix.clone()..)
                .take_while(|(key, _)| key.starts_with(&prefix))
                // Direct children only, not documents of nested collections.
                .filter(|(key, _)| !key[prefix.len()..].contains('/'))
                .map(|(_, doc)| doc.clone())
                .collect())
        }
        .boxed()
    }

    fn set<'a>(&'a self, path: &'a DocPath, doc: Value, merge: bool) -> BoxFuture<'a, Result<()>> {
        async move {
            self.check_online()?;
            let mut docs = self.docs.write().map_err(Self::poisoned)?;
            let key = path.to_string();

            if merge {
                if let (Some(Value::Object(existing)), Value::Object(fields)) =
                    (docs.get_mut(&key), &doc)
                {
                    existing.extend(fields.clone());
                    return Ok(());
                }
            }
            docs.insert(key, doc);
            Ok(())
        }
        .boxed()
    }

    fn delete<'a>(&'a self, path: &'a DocPath) -> BoxFuture<'a, Result<()>> {
        async move {
            self.check_online()?;
            let mut docs = self.docs.write().map_err(Self::poisoned)?;
            docs.remove(&path.to_string());
            Ok(())
        }
        .boxed()
    }

    fn server_time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
