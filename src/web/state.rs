use std::sync::Arc;

use jglobal_site::backend::BackendClient;
use jglobal_site::common::BackendError;
use jglobal_site::config::SiteConfig;
use jglobal_site::services::{CommentsClient, Mailer};

use crate::web::security::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub backend: BackendClient,
    pub mailer: Option<Mailer>,
    pub comments: Option<CommentsClient>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn from_config(config: SiteConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::from_config(&config)?;
        let http = reqwest::Client::builder().build()?;

        let mailer = Mailer::from_config(&config, http.clone());
        if mailer.is_none() {
            log::warn!("RESEND_API_KEY is not set; contact form delivery is disabled");
        }

        let comments = config
            .wordpress
            .as_ref()
            .map(|wp| CommentsClient::new(http.clone(), wp));

        Ok(Self {
            config: Arc::new(config),
            backend,
            mailer,
            comments,
            rate_limiter: Arc::new(RateLimiter::new()),
        })
    }
}
