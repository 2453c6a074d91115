use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Image;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub slug: String,
    pub title: String,
    /// HTML body.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub is_past: bool,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Event {
    pub fn has_passed(&self, now: DateTime<Utc>) -> bool {
        self.is_past || self.date < now
    }
}
