use serde::{Deserialize, Serialize};

use crate::common::BackendError;

/// Standard `{success, data, message?, pagination?}` response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub pagination: Option<Pagination>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_items: u64,
    #[serde(default)]
    pub items_per_page: u32,
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub has_previous: bool,
}

pub(crate) fn first_page() -> u32 {
    1
}

impl Pagination {
    /// Pagination for an unpaged response holding `len` items.
    pub fn single(len: usize) -> Self {
        Self {
            current_page: 1,
            total_pages: if len == 0 { 0 } else { 1 },
            total_items: len as u64,
            items_per_page: len as u32,
            has_next: false,
            has_previous: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, BackendError> {
        if !self.success {
            return Err(BackendError::Rejected {
                message: self.message,
            });
        }
        self.data.ok_or(BackendError::MissingData)
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn into_page(self) -> Result<Page<T>, BackendError> {
        let pagination = self.pagination.clone();
        let items = self.into_data()?;
        let pagination = pagination.unwrap_or_else(|| Pagination::single(items.len()));
        Ok(Page { items, pagination })
    }
}

/// Query parameters every list endpoint understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            limit: None,
            status: None,
        }
    }
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            ..Default::default()
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.max(1).to_string())];

        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status", status.to_string()));
        }

        pairs
    }
}
