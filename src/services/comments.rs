use serde::{Deserialize, Serialize};

use crate::common::CommentsError;
use crate::config::WordpressConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Pass-through client for the WordPress comments REST endpoint.
#[derive(Debug, Clone)]
pub struct CommentsClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
}

impl CommentsClient {
    pub fn new(http: reqwest::Client, config: &WordpressConfig) -> Self {
        Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/comments", self.base_url)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, Some(password)),
            None => builder,
        }
    }

    pub async fn list(&self, query: &CommentsQuery) -> Result<serde_json::Value, CommentsError> {
        let builder = self.authorize(self.http.get(self.endpoint()).query(query));
        Self::read(builder.send().await?).await
    }

    pub async fn create(
        &self,
        comment: &serde_json::Value,
    ) -> Result<serde_json::Value, CommentsError> {
        let builder = self.authorize(self.http.post(self.endpoint()).json(comment));
        Self::read(builder.send().await?).await
    }

    async fn read(response: reqwest::Response) -> Result<serde_json::Value, CommentsError> {
        let status = response.status();
        let body = response.bytes().await?;
        let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

        if !status.is_success() {
            return Err(CommentsError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
