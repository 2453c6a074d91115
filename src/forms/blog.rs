use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{required, resolve_slug, FormBody, IndexedFields};
use crate::backend::UploadFile;
use crate::common::{BackendError, FormError};
use crate::models::{BlogStatus, SeoMeta};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogForm {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub status: BlogStatus,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(flatten)]
    pub seo: SeoMeta,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub cover: Option<UploadFile>,
}

impl BlogForm {
    pub fn validate(&self) -> Result<(), FormError> {
        required("title", &self.title)?;
        required("content", &self.content)?;
        resolve_slug(self.slug.as_deref(), &self.title)?;

        if self.status == BlogStatus::Scheduled && self.scheduled_at.is_none() {
            return Err(FormError::Required("scheduledAt"));
        }

        Ok(())
    }

    fn tag_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.tag_ids.len());
        for id in self.tag_ids.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn body(&self) -> Result<FormBody, BackendError> {
        let slug = resolve_slug(self.slug.as_deref(), &self.title).ok();
        let scheduled_at = match self.status {
            BlogStatus::Scheduled => self.scheduled_at.map(|at| at.to_rfc3339()),
            _ => None,
        };

        let Some(cover) = &self.cover else {
            return Ok(FormBody::Json(json!({
                "title": self.title.trim(),
                "slug": slug,
                "excerpt": self.excerpt.trim(),
                "content": self.content,
                "status": self.status,
                "categoryId": self.category_id,
                "tags": self.tag_ids(),
                "metaTitle": self.seo.meta_title,
                "metaDescription": self.seo.meta_description,
                "metaKeywords": self.seo.meta_keywords,
                "scheduledAt": scheduled_at,
            })));
        };

        let mut fields = IndexedFields::new();
        fields
            .push("title", self.title.trim())
            .push_opt("slug", slug)
            .push("excerpt", self.excerpt.trim())
            .push("content", &self.content)
            .push("status", self.status)
            .push_opt("categoryId", self.category_id.as_deref())
            .push_opt("metaTitle", self.seo.meta_title.as_deref())
            .push_opt("metaDescription", self.seo.meta_description.as_deref())
            .push_opt("metaKeywords", self.seo.meta_keywords.as_deref())
            .push_opt("scheduledAt", scheduled_at);
        for (i, id) in self.tag_ids().into_iter().enumerate() {
            fields.push_indexed("tags", i, id);
        }

        Ok(FormBody::Multipart(fields.into_form().part("image", cover.part()?)))
    }
}
