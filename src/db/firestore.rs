// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore implementation of [`DocumentStore`].

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;

use crate::db::document::{CollectionPath, DocPath, DocumentStore};
use crate::error::AppError;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDocuments {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDocuments {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // The emulator accepts any token, so skip credential discovery.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id).await.map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore: {}", e))
        })?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::StoreUnavailable(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a disconnected client for testing.
    ///
    /// All operations fail with `StoreUnavailable`.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client.as_ref().ok_or_else(|| {
            AppError::StoreUnavailable("Database not connected (offline mode)".to_string())
        })
    }

    /// Build the parent document path for a nested collection.
    fn parent_path(
        client: &firestore::FirestoreDb,
        parents: &[(String, String)],
    ) -> Result<Option<firestore::ParentPathBuilder>, AppError> {
        let mut iter = parents.iter();
        let Some((collection, id)) = iter.next() else {
            return Ok(None);
        };

        let mut path = client.parent_path(collection, id).map_err(unavailable)?;
        for (collection, id) in iter {
            path = path.at(collection, id).map_err(unavailable)?;
        }
        Ok(Some(path))
    }

    async fn get_doc(&self, path: &DocPath) -> Result<Option<Value>, AppError> {
        let client = self.get_client()?;
        let parent = Self::parent_path(client, &path.collection.parents)?;

        let mut query = client.fluent().select().by_id_in(&path.collection.collection);
        if let Some(parent) = &parent {
            query = query.parent(parent);
        }

        query
            .obj::<Value>()
            .one(&path.id)
            .await
            .map_err(unavailable)
    }

    async fn list_docs(&self, collection: &CollectionPath) -> Result<Vec<Value>, AppError> {
        let client = self.get_client()?;
        let parent = Self::parent_path(client, &collection.parents)?;

        let mut query = client.fluent().select().from(collection.collection.as_str());
        if let Some(parent) = &parent {
            query = query.parent(parent);
        }

        query.obj::<Value>().query().await.map_err(unavailable)
    }

    async fn set_doc(&self, path: &DocPath, doc: Value, merge: bool) -> Result<(), AppError> {
        let client = self.get_client()?;
        let parent = Self::parent_path(client, &path.collection.parents)?;

        let update = if merge {
            let fields: Vec<String> = doc
                .as_object()
                .map(|o| o.keys().cloned().collect())
                .unwrap_or_default();
            client.fluent().update().fields(fields)
        } else {
            client.fluent().update()
        };

        let mut update = update
            .in_col(&path.collection.collection)
            .document_id(&path.id);
        if let Some(parent) = &parent {
            update = update.parent(parent);
        }

        let _: () = update
            .object(&doc)
            .execute()
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn delete_doc(&self, path: &DocPath) -> Result<(), AppError> {
        let client = self.get_client()?;
        let parent = Self::parent_path(client, &path.collection.parents)?;

        let mut delete = client
            .fluent()
            .delete()
            .from(path.collection.collection.as_str())
            .document_id(&path.id);
        if let Some(parent) = &parent {
            delete = delete.parent(parent);
        }

        delete.execute().await.map_err(unavailable)?;
        Ok(())
    }
}

impl DocumentStore for FirestoreDocuments {
    fn get<'a>(&'a self, path: &'a DocPath) -> BoxFuture<'a, Result<Option<Value>, AppError>> {
        self.get_doc(path).boxed()
    }

    fn list<'a>(
        &'a self,
        collection: &'a CollectionPath,
    ) -> BoxFuture<'a, Result<Vec<Value>, AppError>> {
        self.list_docs(collection).boxed()
    }

    fn set<'a>(
        &'a self,
        path: &'a DocPath,
        doc: Value,
        merge: bool,
    ) -> BoxFuture<'a, Result<(), AppError>> {
        self.set_doc(path, doc, merge).boxed()
    }

    fn delete<'a>(&'a self, path: &'a DocPath) -> BoxFuture<'a, Result<(), AppError>> {
        self.delete_doc(path).boxed()
    }

    fn server_time(&self) -> DateTime<Utc> {
        // Documents are written as plain objects, so server-side timestamp
        // transforms are unavailable; the instance clock stands in.
        Utc::now()
    }
}

fn unavailable(e: impl std::fmt::Display) -> AppError {
    AppError::StoreUnavailable(e.to_string())
}
