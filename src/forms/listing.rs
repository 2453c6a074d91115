use serde::{Deserialize, Serialize};

use super::{required, IndexedFields};
use crate::common::FormError;
use crate::models::{ListingStatus, Location, Unit};

/// Fields shared by the land and house forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFields {
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub location: Location,
    #[serde(default)]
    pub status: ListingStatus,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub units: Vec<Unit>,
}

impl ListingFields {
    pub fn validate(&self) -> Result<(), FormError> {
        required("title", &self.title)?;
        required("description", &self.description)?;
        required("location", &self.location.location)?;

        if let Some(lat) = self.location.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(FormError::Invalid {
                    field: "latitude",
                    reason: format!("{lat} is outside -90..90"),
                });
            }
        }
        if let Some(lng) = self.location.longitude {
            if !(-180.0..=180.0).contains(&lng) {
                return Err(FormError::Invalid {
                    field: "longitude",
                    reason: format!("{lng} is outside -180..180"),
                });
            }
        }

        if self.units.is_empty() {
            return Err(FormError::Required("units"));
        }
        for (i, unit) in self.units.iter().enumerate() {
            if unit.unit.trim().is_empty() {
                return Err(FormError::Invalid {
                    field: "units",
                    reason: format!("unit {} has no unit of measure", i + 1),
                });
            }
            if !(unit.size > 0.0) {
                return Err(FormError::Invalid {
                    field: "units",
                    reason: format!("unit {} must have a positive size", i + 1),
                });
            }
            if !(unit.price >= 0.0) {
                return Err(FormError::Invalid {
                    field: "units",
                    reason: format!("unit {} has a negative price", i + 1),
                });
            }
        }

        Ok(())
    }

    pub fn write_to(&self, fields: &mut IndexedFields) {
        fields
            .push("title", self.title.trim())
            .push("description", self.description.trim())
            .push("location", self.location.location.trim())
            .push("status", self.status)
            .push_opt("city", self.location.city.as_deref())
            .push_opt("state", self.location.state.as_deref())
            .push_opt("country", self.location.country.as_deref())
            .push_opt("latitude", self.location.latitude)
            .push_opt("longitude", self.location.longitude)
            .push_opt("category", self.category.as_deref());

        for (i, feature) in self
            .features
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .enumerate()
        {
            fields.push_indexed("features", i, feature);
        }

        for (i, unit) in self.units.iter().enumerate() {
            if let Some(id) = &unit.id {
                fields.push_item("units", i, "id", id);
            }
            fields
                .push_item("units", i, "size", unit.size)
                .push_item("units", i, "unit", unit.unit.trim())
                .push_item("units", i, "price", unit.price)
                .push_item("units", i, "available", unit.available);
        }
    }
}
