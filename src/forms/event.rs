use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{required, resolve_slug, FormBody, IndexedFields};
use crate::backend::UploadFile;
use crate::common::{BackendError, FormError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    /// HTML body.
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(skip)]
    pub images: Vec<UploadFile>,
}

impl EventForm {
    pub fn validate(&self) -> Result<(), FormError> {
        required("title", &self.title)?;
        required("description", &self.description)?;
        required("location", &self.location)?;
        if self.date.is_none() {
            return Err(FormError::Required("date"));
        }
        resolve_slug(self.slug.as_deref(), &self.title)?;
        Ok(())
    }

    pub fn body(&self) -> Result<FormBody, BackendError> {
        let slug = resolve_slug(self.slug.as_deref(), &self.title).ok();
        let date = self.date.map(|d| d.to_rfc3339());

        if self.images.is_empty() {
            return Ok(FormBody::Json(json!({
                "title": self.title.trim(),
                "slug": slug,
                "description": self.description,
                "location": self.location.trim(),
                "date": date,
                "organizer": self.organizer.as_deref().map(str::trim),
            })));
        }

        let mut fields = IndexedFields::new();
        fields
            .push("title", self.title.trim())
            .push_opt("slug", slug)
            .push("description", &self.description)
            .push("location", self.location.trim())
            .push_opt("date", date)
            .push_opt("organizer", self.organizer.as_deref());

        let mut form = fields.into_form();
        for image in &self.images {
            form = form.part("images", image.part()?);
        }
        Ok(FormBody::Multipart(form))
    }
}
