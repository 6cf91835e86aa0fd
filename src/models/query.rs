//! Collection search parameters

use std::collections::BTreeMap;

/// Query string sent with a collection GET.
///
/// The catalog API filters books by `title` and `year` and authors by
/// `name`; every list endpoint accepts `offset` and `limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    filters: BTreeMap<String, String>,
    offset: Option<u32>,
    limit: Option<u32>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.insert(key.into(), value.to_string());
        self
    }

    pub fn title(self, title: impl ToString) -> Self {
        self.filter("title", title)
    }

    pub fn year(self, year: i32) -> Self {
        self.filter("year", year)
    }

    pub fn name(self, name: impl ToString) -> Self {
        self.filter("name", name)
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.offset.is_none() && self.limit.is_none()
    }

    /// Key/value pairs in a stable order
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}
