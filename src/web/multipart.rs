use actix_multipart::{Field, Multipart, MultipartError};
use actix_web::guard::GuardContext;
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use bytes::{Bytes, BytesMut};
use futures_util::TryStreamExt;
use serde::de::DeserializeOwned;

use jglobal_site::backend::UploadFile;

/// Largest single part accepted, file or data.
pub const MAX_PART_BYTES: usize = 20 * 1024 * 1024;

/// Name of the part carrying the JSON form.
pub const DATA_FIELD: &str = "data";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    #[error("{0} exceeds the upload size limit")]
    TooLarge(String),

    #[error("Invalid form: {0}")]
    Data(#[from] serde_json::Error),

    #[error("Missing \"data\" part")]
    MissingData,

    #[error("No file was attached")]
    NoFiles,
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

pub fn is_multipart(ctx: &GuardContext) -> bool {
    ctx.head()
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

/// The JSON `data` part (if any) and every file part, in the order sent.
pub async fn read_form<T: DeserializeOwned>(
    mut payload: Multipart,
) -> Result<(Option<T>, Vec<UploadFile>), UploadError> {
    let mut data = None;
    let mut files = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        let (name, file_name) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_string),
                cd.get_filename().map(str::to_string),
            ),
            None => (None, None),
        };
        let content_type = field
            .content_type()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let label = file_name.clone().or_else(|| name.clone()).unwrap_or_default();
        let bytes = read_part(&mut field, &label).await?;

        match file_name {
            // Browsers send an empty part for an untouched file input
            Some(file_name) if file_name.is_empty() && bytes.is_empty() => {}
            Some(file_name) => files.push(UploadFile::new(file_name, content_type, bytes)),
            None if name.as_deref() == Some(DATA_FIELD) => {
                data = Some(serde_json::from_slice(&bytes)?);
            }
            None => log::debug!("Ignoring multipart field {label:?}"),
        }
    }

    Ok((data, files))
}

/// Like [`read_form`], for bodies where the `data` part is mandatory.
pub async fn read_data_form<T: DeserializeOwned>(
    payload: Multipart,
) -> Result<(T, Vec<UploadFile>), UploadError> {
    let (data, files) = read_form(payload).await?;
    Ok((data.ok_or(UploadError::MissingData)?, files))
}

async fn read_part(field: &mut Field, label: &str) -> Result<Bytes, UploadError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.try_next().await? {
        if buf.len() + chunk.len() > MAX_PART_BYTES {
            return Err(UploadError::TooLarge(label.to_string()));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}
