//! Firestore-backed `InventoryStore`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use stocksync_core::{InventoryRecord, InventoryStore, SyncError};

use crate::auth::TokenProvider;
use crate::document::{quantity_patch_body, ListDocumentsResponse};

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: u32 = 300;

/// Reads and writes one named collection through the Firestore REST API.
pub struct FirestoreStore {
    client: Client,
    tokens: TokenProvider,
    collection: String,
    base_url: String,
}

impl FirestoreStore {
    pub fn new(client: Client, tokens: TokenProvider, collection: impl Into<String>) -> Self {
        Self {
            client,
            tokens,
            collection: collection.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn collection_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url,
            self.tokens.project_id(),
            self.collection
        )
    }
}

fn bad_status(operation: &str, status: StatusCode, body: String) -> anyhow::Error {
    SyncError::StoreError(format!("{operation} returned {status}: {body}")).into()
}

#[async_trait]
impl InventoryStore for FirestoreStore {
    async fn fetch_all(&self) -> Result<Vec<InventoryRecord>> {
        let token = self.tokens.token().await?;
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(self.collection_url())
                .bearer_auth(&token)
                .query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(ref t) = page_token {
                request = request.query(&[("pageToken", t)]);
            }

            let response = request
                .send()
                .await
                .context("Firestore list request failed")?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(bad_status("Firestore list", status, body));
            }

            let page: ListDocumentsResponse = response
                .json()
                .await
                .context("failed to parse Firestore list response")?;

            records.extend(page.documents.into_iter().map(|d| d.into_record()));

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        debug!(collection = %self.collection, count = records.len(), "Fetched inventory records");
        Ok(records)
    }

    async fn update_quantity(&self, id: &str, quantity: i64) -> Result<()> {
        let token = self.tokens.token().await?;
        let url = format!("{}/{}", self.collection_url(), id);

        let response = self
            .client
            .patch(&url)
            .bearer_auth(&token)
            .query(&[("updateMask.fieldPaths", "quantity")])
            .json(&quantity_patch_body(quantity))
            .send()
            .await
            .context("Firestore patch request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(bad_status(&format!("Firestore patch for '{id}'"), status, body));
        }

        debug!(id, quantity, "Updated record quantity");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ServiceAccountKey;

    fn store() -> FirestoreStore {
        let key = ServiceAccountKey {
            project_id: "demo-project".into(),
            private_key: String::new(),
            client_email: "sync@demo-project.iam.gserviceaccount.com".into(),
            token_uri: "https://oauth2.googleapis.com/token".into(),
        };
        let client = Client::new();
        FirestoreStore::new(client.clone(), TokenProvider::new(client, key), "batteries")
    }

    #[test]
    fn collection_url_includes_project_and_collection() {
        let url = store().collection_url();
        assert_eq!(
            url,
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents/batteries"
        );
    }

    #[test]
    fn base_url_override_applies() {
        let url = store().with_base_url("http://localhost:9099/v1").collection_url();
        assert!(url.starts_with("http://localhost:9099/v1/projects/demo-project"));
    }

    #[test]
    fn project_id_override_reaches_collection_url() {
        let key = ServiceAccountKey {
            project_id: "demo-project".into(),
            private_key: String::new(),
            client_email: "sync@demo-project.iam.gserviceaccount.com".into(),
            token_uri: "https://oauth2.googleapis.com/token".into(),
        };
        let client = Client::new();
        let tokens = TokenProvider::new(client.clone(), key).with_project_id("prod-project");
        let url = FirestoreStore::new(client, tokens, "batteries").collection_url();
        assert!(url.contains("/projects/prod-project/"));
    }

    #[test]
    fn failed_requests_surface_as_store_errors() {
        let err = bad_status("Firestore list", StatusCode::FORBIDDEN, "denied".into());
        assert!(matches!(
            err.downcast_ref::<SyncError>(),
            Some(SyncError::StoreError(_))
        ));
        assert!(err.to_string().contains("403"));
        assert!(err.to_string().contains("denied"));
    }
}
