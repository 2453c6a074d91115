use serde::Deserialize;

use jglobal_site::backend::UploadFile;
use jglobal_site::common::{FormError, StagingError};
use jglobal_site::models::{NewReview, ReviewSubject};
use jglobal_site::services::{ImageEdit, ImageStaging};

#[derive(Debug, Deserialize)]
pub struct AdminLoginQuery {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageEditEntry {
    pub id: String,
    #[serde(flatten)]
    pub edit: ImageEdit,
}

/// Caption and primary flag for one uploaded file, matched by position.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewImageInput {
    pub caption: String,
    pub is_primary: bool,
}

/// A land or house edit: the listing fields plus changes to its current images.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEdit<F> {
    #[serde(flatten)]
    pub form: F,
    #[serde(default)]
    pub images_to_delete: Vec<String>,
    #[serde(default)]
    pub image_edits: Vec<ImageEditEntry>,
    #[serde(default)]
    pub new_image_details: Vec<NewImageInput>,
}

impl<F> ListingEdit<F> {
    /// Replays the requested changes over the entity's current images.
    pub fn stage(&self, staging: &mut ImageStaging) -> Result<(), StagingError> {
        for entry in &self.image_edits {
            staging.edit_existing(&entry.id, entry.edit.clone())?;
        }
        for id in &self.images_to_delete {
            staging.mark_for_deletion(id)?;
        }
        Ok(())
    }

    /// Adds the uploaded files, then applies `newImageDetails` to them in order.
    pub fn stage_uploads(
        &self,
        staging: &mut ImageStaging,
        files: Vec<UploadFile>,
    ) -> Result<(), StagingError> {
        let first = staging.new_count();
        staging.add_new(files);
        for (offset, detail) in self.new_image_details.iter().enumerate() {
            let index = first + offset;
            staging.set_new_caption(index, &detail.caption)?;
            if detail.is_primary {
                staging.set_new_primary(index)?;
            }
        }
        Ok(())
    }
}

/// Review form as posted by the public site.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub reviewer_name: String,
    #[serde(default)]
    pub reviewer_email: Option<String>,
    #[serde(default)]
    pub land_id: Option<String>,
    #[serde(default)]
    pub house_id: Option<String>,
}

impl TryFrom<ReviewSubmission> for NewReview {
    type Error = FormError;

    fn try_from(form: ReviewSubmission) -> Result<Self, Self::Error> {
        let nonblank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let subject = match (nonblank(form.land_id), nonblank(form.house_id)) {
            (Some(id), None) => ReviewSubject::Land(id),
            (None, Some(id)) => ReviewSubject::House(id),
            (Some(_), Some(_)) => {
                return Err(FormError::Invalid {
                    field: "subject",
                    reason: "a review targets either a land or a house".to_string(),
                });
            }
            (None, None) => return Err(FormError::Required("landId or houseId")),
        };

        if !(1..=5).contains(&form.rating) {
            return Err(FormError::Invalid {
                field: "rating",
                reason: "must be between 1 and 5".to_string(),
            });
        }
        if form.reviewer_name.trim().is_empty() {
            return Err(FormError::Required("reviewerName"));
        }

        Ok(NewReview {
            rating: form.rating,
            comment: form.comment.trim().to_string(),
            reviewer_name: form.reviewer_name.trim().to_string(),
            reviewer_email: nonblank(form.reviewer_email),
            subject,
        })
    }
}
