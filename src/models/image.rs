use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub order: i32,
}

impl Image {
    /// The flagged primary image, or the lowest-ordered one when none is flagged.
    pub fn primary(images: &[Image]) -> Option<&Image> {
        images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| images.iter().min_by_key(|img| img.order))
    }
}
