use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

use crate::backend::UploadFile;
use crate::common::{BackendError, StagingError};
use crate::forms::{ImageEncoding, IndexedFields};
use crate::models::Image;

/// Field name the backend reads raw image files from.
pub const IMAGE_FILE_FIELD: &str = "images";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeptImage {
    pub id: String,
    pub caption: Option<String>,
    pub is_primary: bool,
    pub order: i32,
}

impl From<&Image> for KeptImage {
    fn from(image: &Image) -> Self {
        Self {
            id: image.id.clone(),
            caption: image.caption.clone(),
            is_primary: image.is_primary,
            order: image.order,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImageDetail {
    pub caption: String,
    pub is_primary: bool,
    pub order: i32,
}

/// Metadata saved from the inline editor of an existing image.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageEdit {
    pub caption: Option<String>,
    pub order: Option<i32>,
    pub is_primary: Option<bool>,
}

/// The `manageImages` side channel sent with the land edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageImages {
    pub keep: Vec<KeptImage>,
    pub delete: Vec<String>,
    pub new_image_details: Vec<NewImageDetail>,
}

#[derive(Debug, Clone, PartialEq)]
struct StagedUpload {
    file: UploadFile,
    detail: NewImageDetail,
}

/// In-memory staging of an entity's image changes until the form is submitted.
///
/// Existing images live in `keep` (an editable overlay) and may additionally be
/// marked in `delete`; the two are only reconciled when the payload is built.
/// New uploads carry their own detail record. Primary flags are kept unique
/// within `keep` and within the new uploads, but not across them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageStaging {
    existing: Vec<Image>,
    keep: Vec<KeptImage>,
    delete: Vec<String>,
    new: Vec<StagedUpload>,
}

impl ImageStaging {
    pub fn new(existing: Vec<Image>) -> Self {
        let mut seen_primary = false;
        let keep = existing
            .iter()
            .map(|image| {
                let mut kept = KeptImage::from(image);
                if kept.is_primary {
                    kept.is_primary = !seen_primary;
                    seen_primary = true;
                }
                kept
            })
            .collect();

        Self {
            existing,
            keep,
            delete: Vec::new(),
            new: Vec::new(),
        }
    }

    /// Staging for a create form, with no existing images.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn existing(&self) -> &[Image] {
        &self.existing
    }

    pub fn kept(&self) -> &[KeptImage] {
        &self.keep
    }

    pub fn kept_image(&self, id: &str) -> Option<&KeptImage> {
        self.keep.iter().find(|k| k.id == id)
    }

    pub fn marked_for_deletion(&self) -> &[String] {
        &self.delete
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.delete.iter().any(|d| d == id)
    }

    fn ensure_known(&self, id: &str) -> Result<(), StagingError> {
        if self.keep.iter().any(|k| k.id == id) {
            Ok(())
        } else {
            Err(StagingError::UnknownImage(id.to_string()))
        }
    }

    pub fn mark_for_deletion(&mut self, id: &str) -> Result<(), StagingError> {
        self.ensure_known(id)?;
        if !self.is_marked(id) {
            self.delete.push(id.to_string());
        }
        Ok(())
    }

    /// Returns whether the id was marked.
    pub fn unmark(&mut self, id: &str) -> bool {
        let before = self.delete.len();
        self.delete.retain(|d| d != id);
        self.delete.len() != before
    }

    /// Returns whether the image is marked after the toggle.
    pub fn toggle_deletion(&mut self, id: &str) -> Result<bool, StagingError> {
        if self.unmark(id) {
            return Ok(false);
        }
        self.mark_for_deletion(id)?;
        Ok(true)
    }

    pub fn edit_existing(&mut self, id: &str, edit: ImageEdit) -> Result<(), StagingError> {
        self.ensure_known(id)?;

        let make_primary = edit.is_primary == Some(true);
        for kept in &mut self.keep {
            if kept.id == id {
                if let Some(caption) = &edit.caption {
                    kept.caption = Some(caption.trim().to_string()).filter(|c| !c.is_empty());
                }
                if let Some(order) = edit.order {
                    kept.order = order;
                }
                if let Some(is_primary) = edit.is_primary {
                    kept.is_primary = is_primary;
                }
            } else if make_primary {
                kept.is_primary = false;
            }
        }

        Ok(())
    }

    pub fn add_new<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = UploadFile>,
    {
        for file in files {
            let count = self.existing.len() + self.new.len();
            let detail = NewImageDetail {
                caption: String::new(),
                is_primary: count == 0,
                order: count as i32,
            };
            self.new.push(StagedUpload { file, detail });
        }
    }

    pub fn remove_new(&mut self, index: usize) -> Result<UploadFile, StagingError> {
        if index >= self.new.len() {
            return Err(StagingError::IndexOutOfRange {
                index,
                len: self.new.len(),
            });
        }
        Ok(self.new.remove(index).file)
    }

    pub fn set_new_primary(&mut self, index: usize) -> Result<(), StagingError> {
        if index >= self.new.len() {
            return Err(StagingError::IndexOutOfRange {
                index,
                len: self.new.len(),
            });
        }
        for (i, staged) in self.new.iter_mut().enumerate() {
            staged.detail.is_primary = i == index;
        }
        Ok(())
    }

    pub fn set_new_caption(&mut self, index: usize, caption: &str) -> Result<(), StagingError> {
        let len = self.new.len();
        let staged = self
            .new
            .get_mut(index)
            .ok_or(StagingError::IndexOutOfRange { index, len })?;
        staged.detail.caption = caption.trim().to_string();
        Ok(())
    }

    pub fn new_files(&self) -> impl Iterator<Item = &UploadFile> {
        self.new.iter().map(|s| &s.file)
    }

    pub fn new_details(&self) -> impl Iterator<Item = &NewImageDetail> {
        self.new.iter().map(|s| &s.detail)
    }

    pub fn new_count(&self) -> usize {
        self.new.len()
    }

    pub fn has_changes(&self) -> bool {
        if !self.delete.is_empty() || !self.new.is_empty() {
            return true;
        }
        self.existing
            .iter()
            .zip(&self.keep)
            .any(|(original, kept)| KeptImage::from(original) != *kept)
    }

    pub fn manage_images(&self) -> ManageImages {
        ManageImages {
            keep: self
                .keep
                .iter()
                .filter(|k| !self.is_marked(&k.id))
                .cloned()
                .collect(),
            delete: self.delete.clone(),
            new_image_details: self.new_details().cloned().collect(),
        }
    }

    pub fn write_fields(
        &self,
        fields: &mut IndexedFields,
        encoding: ImageEncoding,
    ) -> Result<(), BackendError> {
        let payload = self.manage_images();

        match encoding {
            ImageEncoding::ManageImagesJson => {
                fields.push("manageImages", serde_json::to_string(&payload)?);
            }
            ImageEncoding::IndexedFields => {
                for (i, kept) in payload.keep.iter().enumerate() {
                    fields.push_item("imagesToKeep", i, "id", &kept.id);
                    if let Some(caption) = &kept.caption {
                        fields.push_item("imagesToKeep", i, "caption", caption);
                    }
                    fields
                        .push_item("imagesToKeep", i, "isPrimary", kept.is_primary)
                        .push_item("imagesToKeep", i, "order", kept.order);
                }
                for (i, id) in payload.delete.iter().enumerate() {
                    fields.push_indexed("imagesToDelete", i, id);
                }
                for (i, detail) in payload.new_image_details.iter().enumerate() {
                    fields
                        .push_item("newImageDetails", i, "caption", &detail.caption)
                        .push_item("newImageDetails", i, "isPrimary", detail.is_primary)
                        .push_item("newImageDetails", i, "order", detail.order);
                }
            }
        }

        Ok(())
    }

    /// Builds the complete multipart body. Staged state is left untouched so a
    /// failed submit can be retried.
    pub fn apply_to_form(
        &self,
        mut fields: IndexedFields,
        encoding: ImageEncoding,
    ) -> Result<Form, BackendError> {
        self.write_fields(&mut fields, encoding)?;

        let mut form = fields.into_form();
        for file in self.new_files() {
            form = form.part(IMAGE_FILE_FIELD, file.part()?);
        }
        Ok(form)
    }
}
