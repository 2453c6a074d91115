use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSubscriber {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Where the signup came from, e.g. "footer" or "blog".
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub subscribed_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}
