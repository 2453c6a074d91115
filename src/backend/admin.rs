use serde::de::DeserializeOwned;

use super::{BackendClient, Resource};
use crate::common::SubmitError;
use crate::forms::{BlogForm, CategoryForm, EventForm, FormBody, HouseForm, LandForm, TagForm};
use crate::models::{Blog, Category, Event, House, Land, Tag};
use crate::services::ImageStaging;

// Every submit validates locally first; nothing is sent for an invalid form.
impl BackendClient {
    pub async fn create_land(
        &self,
        form: &LandForm,
        staging: &ImageStaging,
    ) -> Result<Land, SubmitError> {
        form.validate()?;
        let body = form.create_form(staging)?;
        Ok(self.create_multipart(Resource::Lands, body).await?)
    }

    pub async fn update_land(
        &self,
        id: &str,
        form: &LandForm,
        staging: &ImageStaging,
    ) -> Result<Land, SubmitError> {
        form.validate()?;
        let body = form.update_form(staging)?;
        Ok(self.update_multipart(Resource::Lands, id, body).await?)
    }

    pub async fn create_house(
        &self,
        form: &HouseForm,
        staging: &ImageStaging,
    ) -> Result<House, SubmitError> {
        form.validate()?;
        let body = form.form(staging)?;
        Ok(self.create_multipart(Resource::Houses, body).await?)
    }

    pub async fn update_house(
        &self,
        id: &str,
        form: &HouseForm,
        staging: &ImageStaging,
    ) -> Result<House, SubmitError> {
        form.validate()?;
        let body = form.form(staging)?;
        Ok(self.update_multipart(Resource::Houses, id, body).await?)
    }

    pub async fn create_blog(&self, form: &BlogForm) -> Result<Blog, SubmitError> {
        form.validate()?;
        self.submit_body(Resource::Blogs, None, form.body()?).await
    }

    pub async fn update_blog(&self, id: &str, form: &BlogForm) -> Result<Blog, SubmitError> {
        form.validate()?;
        self.submit_body(Resource::Blogs, Some(id), form.body()?).await
    }

    pub async fn create_event(&self, form: &EventForm) -> Result<Event, SubmitError> {
        form.validate()?;
        self.submit_body(Resource::Events, None, form.body()?).await
    }

    pub async fn update_event(&self, id: &str, form: &EventForm) -> Result<Event, SubmitError> {
        form.validate()?;
        self.submit_body(Resource::Events, Some(id), form.body()?).await
    }

    pub async fn create_category(&self, form: &CategoryForm) -> Result<Category, SubmitError> {
        form.validate()?;
        Ok(self.create_json(Resource::Categories, &form.body()).await?)
    }

    pub async fn update_category(
        &self,
        id: &str,
        form: &CategoryForm,
    ) -> Result<Category, SubmitError> {
        form.validate()?;
        Ok(self.update_json(Resource::Categories, id, &form.body()).await?)
    }

    pub async fn create_tag(&self, form: &TagForm) -> Result<Tag, SubmitError> {
        form.validate()?;
        Ok(self.create_json(Resource::Tags, &form.body()).await?)
    }

    pub async fn update_tag(&self, id: &str, form: &TagForm) -> Result<Tag, SubmitError> {
        form.validate()?;
        Ok(self.update_json(Resource::Tags, id, &form.body()).await?)
    }

    async fn submit_body<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: Option<&str>,
        body: FormBody,
    ) -> Result<T, SubmitError> {
        let created = match (id, body) {
            (None, FormBody::Json(json)) => self.create_json(resource, &json).await?,
            (None, FormBody::Multipart(form)) => self.create_multipart(resource, form).await?,
            (Some(id), FormBody::Json(json)) => self.update_json(resource, id, &json).await?,
            (Some(id), FormBody::Multipart(form)) => {
                self.update_multipart(resource, id, form).await?
            }
        };
        Ok(created)
    }
}
