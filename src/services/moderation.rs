use serde::Serialize;

use crate::backend::{BackendClient, ListQuery, Resource};
use crate::models::{Review, ReviewStatus};

#[derive(Debug, Clone, Copy)]
enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn status(self) -> ReviewStatus {
        match self {
            Self::Approve => ReviewStatus::Approved,
            Self::Reject => ReviewStatus::Rejected,
        }
    }
}

/// Locally held review rows for the moderation screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewBoard {
    rows: Vec<Review>,
    filter: Option<ReviewStatus>,
}

impl ReviewBoard {
    pub fn new(rows: Vec<Review>) -> Self {
        Self { rows, filter: None }
    }

    pub async fn load(client: &BackendClient, query: &ListQuery) -> Result<Self, String> {
        client
            .list::<Review>(Resource::Reviews, query)
            .await
            .map(|page| Self::new(page.items))
            .map_err(|e| {
                log::warn!("Loading reviews failed: {}", e);
                e.user_message("Failed to fetch reviews")
            })
    }

    pub fn rows(&self) -> &[Review] {
        &self.rows
    }

    pub fn get(&self, id: &str) -> Option<&Review> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn set_filter(&mut self, filter: Option<ReviewStatus>) {
        self.filter = filter;
    }

    pub fn visible(&self) -> impl Iterator<Item = &Review> {
        self.rows
            .iter()
            .filter(move |r| self.filter.map_or(true, |f| r.status == f))
    }

    pub fn count(&self, status: ReviewStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    pub async fn approve(&mut self, client: &BackendClient, id: &str) -> Result<(), String> {
        self.decide(client, id, Decision::Approve).await
    }

    pub async fn reject(&mut self, client: &BackendClient, id: &str) -> Result<(), String> {
        self.decide(client, id, Decision::Reject).await
    }

    /// The row changes only after the backend confirms.
    async fn decide(
        &mut self,
        client: &BackendClient,
        id: &str,
        decision: Decision,
    ) -> Result<(), String> {
        let result = match decision {
            Decision::Approve => client.approve_review(id).await,
            Decision::Reject => client.reject_review(id).await,
        };

        if let Err(e) = result {
            log::warn!("Review {} {:?} failed: {}", id, decision, e);
            let fallback = match decision {
                Decision::Approve => "Failed to approve review",
                Decision::Reject => "Failed to reject review",
            };
            return Err(e.user_message(fallback));
        }

        if let Some(row) = self.rows.iter_mut().find(|r| r.id == id) {
            row.status = decision.status();
        }
        Ok(())
    }

    pub async fn delete(&mut self, client: &BackendClient, id: &str) -> Result<(), String> {
        client.delete_review(id).await.map_err(|e| {
            log::warn!("Deleting review {} failed: {}", id, e);
            e.user_message("Failed to delete review")
        })?;

        self.rows.retain(|r| r.id != id);
        Ok(())
    }
}

/// Per-status totals across every page, as the backend reports them.
/// A count whose request failed stays `None`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCounts {
    pub pending: Option<u64>,
    pub approved: Option<u64>,
    pub rejected: Option<u64>,
}

impl ReviewCounts {
    pub async fn fetch(client: &BackendClient) -> Self {
        let count = move |status: ReviewStatus| async move {
            client
                .count(Resource::Reviews, Some(status.as_str()))
                .await
                .map_err(|e| log::warn!("Counting {} reviews failed: {}", status.as_str(), e))
                .ok()
        };
        let (pending, approved, rejected) = futures_util::join!(
            count(ReviewStatus::Pending),
            count(ReviewStatus::Approved),
            count(ReviewStatus::Rejected),
        );

        Self {
            pending,
            approved,
            rejected,
        }
    }
}
