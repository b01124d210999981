//! Thin client for the hosted relational datastore.
//!
//! One configured handle (URL + service key) is created in
//! [`AppState::new`](crate::state::AppState::new) and passed to everything
//! that touches data. The backend owns schema, indices, and durability; this
//! client only runs queries, writes, and remote procedures over its REST
//! surface, and publishes a change event after each successful mutation.
//!
//! No retries and no timeouts beyond the HTTP client defaults: a failed call
//! surfaces the backend's message once and the caller decides what to do.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

mod changes;
mod query;

pub use changes::{Change, ChangeHub, ChangeKind};
pub use query::Select;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Backend { status: u16, message: String },
}

#[derive(Clone)]
pub struct Store {
    http: Client,
    base: String,
    key: String,
    hub: Arc<ChangeHub>,
}

impl Store {
    pub fn new(base_url: &str, key: &str, hub: Arc<ChangeHub>) -> Self {
        Self {
            http: Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            hub,
        }
    }

    pub fn table(&self, name: &str) -> Select<'_> {
        Select::new(self, name)
    }

    /// Insert rows without asking the backend to echo them back.
    pub async fn insert<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), StoreError> {
        let request = self
            .authed(self.http.post(self.endpoint(table)))
            .header("Prefer", "return=minimal")
            .json(rows);

        Self::check(request.send().await?).await?;
        self.hub.publish(table, ChangeKind::Insert);

        Ok(())
    }

    /// Insert rows and return the stored representation, including
    /// backend-assigned identifiers and timestamps.
    pub async fn insert_returning<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        rows: &[T],
    ) -> Result<Vec<R>, StoreError> {
        let request = self
            .authed(self.http.post(self.endpoint(table)))
            .header("Prefer", "return=representation")
            .json(rows);

        let response = Self::check(request.send().await?).await?;
        let stored = response.json().await?;

        self.hub.publish(table, ChangeKind::Insert);

        Ok(stored)
    }

    pub async fn update<P: Serialize>(
        &self,
        table: &str,
        id: &str,
        patch: &P,
    ) -> Result<(), StoreError> {
        let request = self
            .authed(self.http.patch(self.endpoint(table)))
            .query(&[("id", format!("eq.{id}"))])
            .json(patch);

        Self::check(request.send().await?).await?;
        self.hub.publish(table, ChangeKind::Update);

        Ok(())
    }

    pub async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let request = self
            .authed(self.http.delete(self.endpoint(table)))
            .query(&[("id", format!("eq.{id}"))]);

        Self::check(request.send().await?).await?;
        self.hub.publish(table, ChangeKind::Delete);

        Ok(())
    }

    /// Call a remote procedure, e.g. the view-counter increment.
    pub async fn rpc<A: Serialize>(&self, function: &str, args: &A) -> Result<(), StoreError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base, function);
        let request = self.authed(self.http.post(url)).json(args);

        Self::check(request.send().await?).await?;

        Ok(())
    }

    pub fn changes(&self) -> tokio::sync::broadcast::Receiver<Change> {
        self.hub.subscribe()
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base, table)
    }

    fn http(&self) -> &Client {
        &self.http
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("apikey", &self.key).bearer_auth(&self.key)
    }

    async fn check(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or(body);

        let message = if message.trim().is_empty() {
            format!("store returned status {status}")
        } else {
            message
        };

        Err(StoreError::Backend { status, message })
    }
}
