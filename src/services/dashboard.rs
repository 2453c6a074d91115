use serde::Serialize;

use crate::backend::{BackendClient, Resource};
use crate::common::BackendError;
use crate::models::ReviewStatus;

/// Admin dashboard counters. A counter whose request failed stays `None`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub lands: Option<u64>,
    pub houses: Option<u64>,
    pub blogs: Option<u64>,
    pub events: Option<u64>,
    pub pending_reviews: Option<u64>,
    pub subscribers: Option<u64>,
}

impl DashboardStats {
    /// Issues all six counts at once; none waits on another.
    pub async fn fetch(client: &BackendClient) -> Self {
        let pending = ReviewStatus::Pending.as_str();
        let (lands, houses, blogs, events, pending_reviews, subscribers) = futures_util::join!(
            client.count(Resource::Lands, None),
            client.count(Resource::Houses, None),
            client.count(Resource::Blogs, None),
            client.count(Resource::Events, None),
            client.count(Resource::Reviews, Some(pending)),
            client.count(Resource::Subscribers, None),
        );

        Self {
            lands: settle("lands", lands),
            houses: settle("houses", houses),
            blogs: settle("blogs", blogs),
            events: settle("events", events),
            pending_reviews: settle("pending reviews", pending_reviews),
            subscribers: settle("subscribers", subscribers),
        }
    }
}

fn settle(label: &str, result: Result<u64, BackendError>) -> Option<u64> {
    match result {
        Ok(count) => Some(count),
        Err(e) => {
            log::warn!("Dashboard counter {} failed: {}", label, e);
            None
        }
    }
}
