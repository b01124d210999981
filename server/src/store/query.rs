use serde::de::DeserializeOwned;

use super::{Store, StoreError};

/// Builder for a read against one remote table. Filters serialize to the
/// backend's `column=op.value` query-string convention.
pub struct Select<'a> {
    store: &'a Store,
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<usize>,
}

impl<'a> Select<'a> {
    pub(super) fn new(store: &'a Store, table: &str) -> Self {
        Self {
            store,
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive substring match.
    pub fn ilike(mut self, column: &str, needle: &str) -> Self {
        self.filters
            .push((column.to_string(), format!("ilike.*{needle}*")));
        self
    }

    pub fn gte(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("gte.{value}")));
        self
    }

    pub fn lte(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("lte.{value}")));
        self
    }

    pub fn order(mut self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        self.order.push(format!("{column}.{direction}"));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.iter().cloned());

        if !self.order.is_empty() {
            pairs.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(n) = self.limit {
            pairs.push(("limit".to_string(), n.to_string()));
        }

        pairs
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        let request = self
            .store
            .authed(self.store.http().get(self.store.endpoint(&self.table)))
            .query(&self.query_pairs());

        let response = Store::check(request.send().await?).await?;

        Ok(response.json().await?)
    }

    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>, StoreError> {
        let mut rows: Vec<T> = self.limit(1).fetch().await?;

        Ok(rows.pop())
    }
}
