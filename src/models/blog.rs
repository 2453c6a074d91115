use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BlogStatus, BlogTag, Category, Image};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMeta {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub meta_keywords: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: BlogStatus,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<BlogTag>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(flatten)]
    pub seo: SeoMeta,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Blog {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.tag.name.as_str()).collect()
    }

    /// Published posts, plus scheduled ones whose time has come.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            BlogStatus::Published => true,
            BlogStatus::Scheduled => self.scheduled_at.is_some_and(|at| at <= now),
            BlogStatus::Draft | BlogStatus::Archived => false,
        }
    }
}
