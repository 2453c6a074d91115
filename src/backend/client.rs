use reqwest::header::{HeaderValue, COOKIE, SET_COOKIE};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::{Envelope, ListQuery, Page, ProgressFn, Resource, UploadFile};
use crate::common::BackendError;
use crate::config::SiteConfig;
use crate::models::{MediaItem, NewReview, NewsletterSubscriber, Review, SendAck};
use crate::types::{LoginRequest, SubscribeRequest};

/// Thin client for the jglobalproperties REST backend.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    base: Url,
    cookies: Option<String>,
}

/// A backend response passed back to the browser as-is.
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: u16,
    pub set_cookies: Vec<String>,
    pub body: serde_json::Value,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let base_url = base_url.trim_end_matches('/');
        let base = Url::parse(base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
            .ok_or_else(|| BackendError::InvalidUrl(base_url.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.to_string(),
            base,
            cookies: None,
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, BackendError> {
        Self::new(&config.backend_url, config.backend_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A client that forwards the browser's `Cookie` header, for admin calls.
    pub fn with_cookies(&self, cookie_header: impl Into<String>) -> Self {
        let header = cookie_header.into();
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            base: self.base.clone(),
            cookies: Some(header).filter(|h| !h.trim().is_empty()),
        }
    }

    /// `path` is a fixed route; each of `segments` lands as exactly one
    /// percent-encoded path segment.
    fn url(&self, path: &str, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?;
            parts.pop_if_empty();
            parts.extend(path.split('/').filter(|p| !p.is_empty()));
            for segment in segments {
                if matches!(*segment, "" | "." | "..") {
                    return Err(BackendError::InvalidSegment(segment.to_string()));
                }
                parts.push(segment);
            }
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        segments: &[&str],
    ) -> Result<RequestBuilder, BackendError> {
        let mut builder = self.http.request(method, self.url(path, segments)?);
        if let Some(value) = self
            .cookies
            .as_deref()
            .and_then(|c| HeaderValue::from_str(c).ok())
        {
            builder = builder.header(COOKIE, value);
        }
        Ok(builder)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Envelope<T>, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        if !envelope.success {
            return Err(BackendError::Rejected {
                message: envelope.message,
            });
        }

        Ok(envelope)
    }

    async fn relay(&self, builder: RequestBuilder) -> Result<RelayedResponse, BackendError> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response.bytes().await?;
        let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

        Ok(RelayedResponse {
            status,
            set_cookies,
            body,
        })
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        query: &ListQuery,
    ) -> Result<Page<T>, BackendError> {
        let builder = self
            .request(Method::GET, resource.path(), &[])?
            .query(&query.to_pairs());
        self.send::<Vec<T>>(builder).await?.into_page()
    }

    /// Total item count for a collection, read from a one-item page.
    pub async fn count(
        &self,
        resource: Resource,
        status: Option<&str>,
    ) -> Result<u64, BackendError> {
        let query = ListQuery {
            limit: Some(1),
            status: status.map(str::to_string),
            ..Default::default()
        };
        let page = self.list::<serde_json::Value>(resource, &query).await?;
        Ok(page.pagination.total_items)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::GET, resource.path(), &[id])?;
        self.send(builder).await?.into_data()
    }

    pub async fn get_by_slug<T: DeserializeOwned>(
        &self,
        resource: Resource,
        slug: &str,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::GET, resource.path(), &["slug", slug])?;
        self.send(builder).await?.into_data()
    }

    pub async fn create_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        body: &B,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::POST, resource.path(), &[])?.json(body);
        self.send(builder).await?.into_data()
    }

    pub async fn update_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: Resource,
        id: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let builder = self
            .request(Method::PATCH, resource.path(), &[id])?
            .json(body);
        self.send(builder).await?.into_data()
    }

    pub async fn create_multipart<T: DeserializeOwned>(
        &self,
        resource: Resource,
        form: Form,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::POST, resource.path(), &[])?.multipart(form);
        self.send(builder).await?.into_data()
    }

    pub async fn update_multipart<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &str,
        form: Form,
    ) -> Result<T, BackendError> {
        let builder = self
            .request(Method::PATCH, resource.path(), &[id])?
            .multipart(form);
        self.send(builder).await?.into_data()
    }

    pub async fn delete(&self, resource: Resource, id: &str) -> Result<(), BackendError> {
        let builder = self.request(Method::DELETE, resource.path(), &[id])?;
        self.send::<serde_json::Value>(builder).await?;
        Ok(())
    }

    pub async fn approve_review(&self, id: &str) -> Result<(), BackendError> {
        self.moderate_review(id, "approve").await
    }

    pub async fn reject_review(&self, id: &str) -> Result<(), BackendError> {
        self.moderate_review(id, "reject").await
    }

    async fn moderate_review(&self, id: &str, action: &str) -> Result<(), BackendError> {
        let builder = self.request(Method::PATCH, Resource::Reviews.path(), &[id, action])?;
        self.send::<serde_json::Value>(builder).await?;
        Ok(())
    }

    pub async fn delete_review(&self, id: &str) -> Result<(), BackendError> {
        self.delete(Resource::Reviews, id).await
    }

    pub async fn submit_review(&self, review: &NewReview) -> Result<Review, BackendError> {
        self.create_json(Resource::Reviews, &review.to_json()).await
    }

    pub async fn subscribe(
        &self,
        request: &SubscribeRequest,
    ) -> Result<NewsletterSubscriber, BackendError> {
        let builder = self
            .request(Method::POST, "/newsletter/subscribe", &[])?
            .json(request);
        self.send(builder).await?.into_data()
    }

    pub async fn send_campaign(&self, id: &str) -> Result<SendAck, BackendError> {
        let builder = self.request(Method::POST, Resource::Campaigns.path(), &[id, "send"])?;
        let envelope = self.send::<SendAck>(builder).await?;
        let message = envelope.message.clone();
        let mut ack = envelope.into_data()?;
        if ack.message.is_none() {
            ack.message = message;
        }
        Ok(ack)
    }

    pub async fn upload_media(
        &self,
        file: &UploadFile,
        on_progress: Option<ProgressFn>,
    ) -> Result<MediaItem, BackendError> {
        let part = match on_progress {
            Some(cb) => file.part_with_progress(cb)?,
            None => file.part()?,
        };
        let form = Form::new().part("file", part);
        self.create_multipart(Resource::Media, form).await
    }

    pub async fn signin(&self, credentials: &LoginRequest) -> Result<RelayedResponse, BackendError> {
        let builder = self
            .request(Method::POST, "/auth/signin", &[])?
            .json(credentials);
        self.relay(builder).await
    }

    pub async fn logout(&self) -> Result<RelayedResponse, BackendError> {
        let builder = self.request(Method::POST, "/auth/logout", &[])?;
        self.relay(builder).await
    }
}

fn extract_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| value.get("error").and_then(|m| m.as_str()))
        .map(str::to_string)
}
