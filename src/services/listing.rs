use futures_util::future::{AbortHandle, AbortRegistration, Abortable, Aborted};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use crate::backend::ListQuery;
use crate::backend::{BackendClient, Page, Pagination, Resource};
use crate::common::BackendError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageControls {
    pub current: u32,
    pub total: u32,
    pub can_prev: bool,
    pub can_next: bool,
}

impl PageControls {
    pub fn new(current: u32, pagination: Option<&Pagination>) -> Self {
        let total = pagination.map_or(0, |p| p.total_pages);
        Self {
            current,
            total,
            can_prev: current > 1,
            can_next: current < total,
        }
    }
}

/// A single fetched page, as handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub controls: PageControls,
    pub search: String,
}

impl<T> ListingView<T> {
    pub fn new(query: &ListQuery, page: Page<T>) -> Self {
        let controls = PageControls::new(query.page.max(1), Some(&page.pagination));
        Self {
            items: page.items,
            pagination: page.pagination,
            controls,
            search: query.search.trim().to_string(),
        }
    }
}

/// Handle for one in-flight list request.
#[derive(Debug)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListQuery,
    registration: AbortRegistration,
}

impl FetchTicket {
    /// Runs the request; resolves to `Err(Aborted)` once a newer fetch or a
    /// cancel has superseded it.
    pub async fn run<T: DeserializeOwned>(
        self,
        client: &BackendClient,
        resource: Resource,
    ) -> Result<Result<Page<T>, BackendError>, Aborted> {
        let FetchTicket {
            query,
            registration,
            ..
        } = self;
        Abortable::new(client.list::<T>(resource, &query), registration).await
    }
}

/// Search/pagination state of one listing screen.
///
/// Each fetch replaces the whole list. A failed fetch keeps the previous items
/// on display and records a toast message instead.
#[derive(Debug)]
pub struct ListingState<T> {
    resource: Resource,
    query: ListQuery,
    items: Vec<T>,
    pagination: Option<Pagination>,
    last_error: Option<String>,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl<T> ListingState<T> {
    pub fn new(resource: Resource) -> Self {
        Self::with_query(resource, ListQuery::default())
    }

    pub fn with_query(resource: Resource, query: ListQuery) -> Self {
        Self {
            resource,
            query,
            items: Vec::new(),
            pagination: None,
            last_error: None,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// A new search always starts from page 1. Returns whether a refetch is due.
    pub fn set_search(&mut self, search: &str) -> bool {
        if self.query.search == search {
            return false;
        }
        self.query.search = search.to_string();
        self.query.page = 1;
        true
    }

    pub fn set_status(&mut self, status: Option<&str>) -> bool {
        let status = status.map(str::to_string).filter(|s| !s.is_empty());
        if self.query.status == status {
            return false;
        }
        self.query.status = status;
        self.query.page = 1;
        true
    }

    /// Clamped to 1 and, once known, to the last page.
    pub fn set_page(&mut self, page: u32) -> bool {
        let mut page = page.max(1);
        if let Some(total) = self.pagination.as_ref().map(|p| p.total_pages) {
            if total > 0 {
                page = page.min(total);
            }
        }
        if self.query.page == page {
            return false;
        }
        self.query.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.controls().can_next && self.set_page(self.query.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.controls().can_prev && self.set_page(self.query.page - 1)
    }

    pub fn controls(&self) -> PageControls {
        PageControls::new(self.query.page, self.pagination.as_ref())
    }

    /// Starts a fetch for the current query, aborting any earlier one.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.cancel();
        let (handle, registration) = AbortHandle::new_pair();
        self.generation += 1;
        self.in_flight = Some(handle);

        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            registration,
        }
    }

    /// Applies a fetch result. Results of superseded fetches are dropped.
    pub fn complete(&mut self, generation: u64, result: Result<Page<T>, BackendError>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.items = page.items;
                self.pagination = Some(page.pagination);
                self.last_error = None;
            }
            Err(e) => {
                log::warn!("Fetching {} page {} failed: {}", self.resource, self.query.page, e);
                self.last_error = Some(e.user_message(&format!("Failed to fetch {}", self.resource)));
            }
        }
        true
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

impl<T: DeserializeOwned> ListingState<T> {
    /// Fetches the current query and applies the result.
    pub async fn refresh(&mut self, client: &BackendClient) -> bool {
        let ticket = self.begin_fetch();
        let generation = ticket.generation;
        match ticket.run::<T>(client, self.resource).await {
            Ok(result) => self.complete(generation, result),
            Err(Aborted) => false,
        }
    }
}

impl<T> Drop for ListingState<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
