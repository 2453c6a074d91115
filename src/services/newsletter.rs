use chrono::{DateTime, Utc};
use csv::Writer;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::backend::{BackendClient, ListQuery, Page, Resource};
use crate::common::{BackendError, FormError, SubmitError};
use crate::forms::required;
use crate::models::{Campaign, NewsletterSubscriber, SendAck};

const EXPORT_HEADERS: [&str; 5] = ["email", "name", "source", "status", "subscribed_at"];
const EXPORT_PAGE_SIZE: u32 = 100;
const EXPORT_MAX_PAGES: u32 = 1000;

pub fn export_csv(subscribers: &[NewsletterSubscriber]) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(EXPORT_HEADERS)?;

    for subscriber in subscribers {
        let subscribed_at = subscriber
            .subscribed_at
            .map(|at| at.to_rfc3339())
            .unwrap_or_default();
        wtr.write_record([
            subscriber.email.as_str(),
            subscriber.name.as_deref().unwrap_or(""),
            subscriber.source.as_deref().unwrap_or(""),
            if subscriber.is_active { "active" } else { "unsubscribed" },
            subscribed_at.as_str(),
        ])?;
    }

    wtr.flush()?;
    wtr.into_inner().map_err(|err| err.into_error().into())
}

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("newsletter-subscribers-{}.csv", now.format("%Y-%m-%d"))
}

pub async fn subscribers(
    client: &BackendClient,
    query: &ListQuery,
) -> Result<Page<NewsletterSubscriber>, BackendError> {
    client.list(Resource::Subscribers, query).await
}

/// Walks every page of the subscriber list, for export.
pub async fn all_subscribers(
    client: &BackendClient,
) -> Result<Vec<NewsletterSubscriber>, BackendError> {
    let mut all = Vec::new();
    let mut query = ListQuery {
        limit: Some(EXPORT_PAGE_SIZE),
        ..Default::default()
    };

    loop {
        let page = subscribers(client, &query).await?;
        let fetched = page.items.len();
        all.extend(page.items);

        let last = page.pagination.total_pages.max(1);
        if !page.pagination.has_next || query.page >= last || fetched == 0 {
            break;
        }
        if query.page >= EXPORT_MAX_PAGES {
            log::warn!("Subscriber export stopped after {} pages", EXPORT_MAX_PAGES);
            break;
        }
        query.page += 1;
    }

    Ok(all)
}

pub async fn campaign_history(
    client: &BackendClient,
    query: &ListQuery,
) -> Result<Page<Campaign>, BackendError> {
    client.list(Resource::Campaigns, query).await
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub subject: String,
    /// HTML body.
    pub content: String,
}

impl CampaignDraft {
    pub fn validate(&self) -> Result<(), FormError> {
        required("subject", &self.subject)?;
        required("content", &self.content)?;
        if self.subject.trim().chars().count() > 200 {
            return Err(FormError::Invalid {
                field: "subject",
                reason: "must be at most 200 characters".to_string(),
            });
        }
        Ok(())
    }

    pub fn body(&self) -> serde_json::Value {
        json!({
            "subject": self.subject.trim(),
            "content": self.content,
        })
    }
}

/// Creates the campaign, then asks the backend to send it.
pub async fn send_campaign(
    client: &BackendClient,
    draft: &CampaignDraft,
) -> Result<SendAck, SubmitError> {
    draft.validate()?;

    let campaign: Campaign = client
        .create_json(Resource::Campaigns, &draft.body())
        .await?;
    let mut ack = client.send_campaign(&campaign.id).await?;
    if ack.campaign_id.is_none() {
        ack.campaign_id = Some(campaign.id);
    }

    log::info!(
        "Campaign {:?} queued for {} recipients",
        ack.campaign_id,
        ack.total_recipients
    );
    Ok(ack)
}

/// Operator-facing acknowledgement text.
pub fn ack_summary(ack: &SendAck) -> String {
    match ack.batch_size {
        Some(batch) if batch > 0 => format!(
            "Campaign queued for {} recipients. Emails go out in batches of {}.",
            ack.total_recipients, batch
        ),
        _ => format!("Campaign queued for {} recipients.", ack.total_recipients),
    }
}
