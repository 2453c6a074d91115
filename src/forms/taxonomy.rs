use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{required, resolve_slug};
use crate::common::FormError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<(), FormError> {
        required("name", &self.name)?;
        resolve_slug(self.slug.as_deref(), &self.name)?;
        Ok(())
    }

    pub fn body(&self) -> serde_json::Value {
        json!({
            "name": self.name.trim(),
            "slug": resolve_slug(self.slug.as_deref(), &self.name).ok(),
            "description": self
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagForm {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl TagForm {
    pub fn validate(&self) -> Result<(), FormError> {
        required("name", &self.name)?;
        resolve_slug(self.slug.as_deref(), &self.name)?;
        Ok(())
    }

    pub fn body(&self) -> serde_json::Value {
        json!({
            "name": self.name.trim(),
            "slug": resolve_slug(self.slug.as_deref(), &self.name).ok(),
        })
    }
}
