use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{starting_price, Image, ListingStatus, Location, ReviewStats, Unit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct House {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub location: Location,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub review_stats: Option<ReviewStats>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl House {
    pub fn primary_image(&self) -> Option<&Image> {
        Image::primary(&self.images)
    }

    pub fn starting_price(&self) -> Option<f64> {
        starting_price(&self.units)
    }
}
