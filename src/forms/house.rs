use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

use super::{ImageEncoding, IndexedFields, ListingFields};
use crate::common::{BackendError, FormError};
use crate::services::ImageStaging;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseForm {
    #[serde(flatten)]
    pub listing: ListingFields,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<u32>,
}

impl HouseForm {
    pub fn validate(&self) -> Result<(), FormError> {
        self.listing.validate()
    }

    pub fn fields(&self) -> IndexedFields {
        let mut fields = IndexedFields::new();
        self.listing.write_to(&mut fields);
        fields
            .push_opt("propertyType", self.property_type.as_deref())
            .push_opt("bedrooms", self.bedrooms)
            .push_opt("bathrooms", self.bathrooms);
        fields
    }

    /// Houses use indexed image fields for both create and edit.
    pub fn form(&self, staging: &ImageStaging) -> Result<Form, BackendError> {
        staging.apply_to_form(self.fields(), ImageEncoding::IndexedFields)
    }
}
