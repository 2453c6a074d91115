use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

use super::{ImageEncoding, IndexedFields, ListingFields};
use crate::common::{BackendError, FormError};
use crate::services::ImageStaging;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandForm {
    #[serde(flatten)]
    pub listing: ListingFields,
}

impl LandForm {
    pub fn validate(&self) -> Result<(), FormError> {
        self.listing.validate()
    }

    pub fn fields(&self) -> IndexedFields {
        let mut fields = IndexedFields::new();
        self.listing.write_to(&mut fields);
        fields
    }

    /// New lands carry their images as indexed fields.
    pub fn create_form(&self, staging: &ImageStaging) -> Result<Form, BackendError> {
        staging.apply_to_form(self.fields(), ImageEncoding::IndexedFields)
    }

    /// The land edit route takes the `manageImages` JSON side channel.
    pub fn update_form(&self, staging: &ImageStaging) -> Result<Form, BackendError> {
        staging.apply_to_form(self.fields(), ImageEncoding::ManageImagesJson)
    }
}
