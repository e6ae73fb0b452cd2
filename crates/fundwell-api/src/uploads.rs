//! Multipart form bodies and the rules for files attached to them.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use thiserror::Error;

use crate::error::ApiError;

/// 5 MB per attached file.
pub const MAX_UPLOAD_SIZE: usize = 5 * 1024 * 1024;

/// Whole request bodies may exceed one file so oversized uploads reach
/// validation and get a readable message.
pub const BODY_LIMIT: usize = 3 * MAX_UPLOAD_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// Identification document of a campaign creator.
    Document,
    /// Profile pictures, campaign and update media.
    Image,
}

impl UploadKind {
    pub fn allowed_types(&self) -> &'static [&'static str] {
        match self {
            Self::Document => &["application/pdf"],
            Self::Image => &["image/jpeg", "image/png"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("File is too large. Max allowed size is 5 MB.")]
    TooLarge,

    #[error("Invalid file type. Allowed types: {0}.")]
    InvalidType(String),

    #[error("{0}")]
    Malformed(String),
}

impl UploadError {
    /// Rule violations go back to `form` with a message; a body that cannot
    /// be parsed at all is a plain 400.
    pub fn back_to(self, form: &str) -> ApiError {
        match self {
            Self::Malformed(message) => ApiError::bad_request(message),
            other => ApiError::redirect(form, Some(other.to_string())),
        }
    }
}

impl From<MultipartError> for UploadError {
    fn from(err: MultipartError) -> Self {
        // The body limit trips before any single part can be checked.
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge
        } else {
            Self::Malformed(err.body_text())
        }
    }
}

#[derive(Debug)]
struct FilePart {
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// A fully buffered multipart body: text fields and file parts by name.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, FilePart>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> Result<Self, UploadError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if field.file_name().is_some() {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?.to_vec();
                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    form.files.insert(name, FilePart { content_type, bytes });
                }
            } else {
                let text = field.text().await?;
                form.fields.insert(name, text);
            }
        }

        Ok(form)
    }

    /// A text field, empty when absent.
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Take a file part, checking its size and declared type.
    pub fn file(&mut self, name: &str, kind: UploadKind) -> Result<Option<Vec<u8>>, UploadError> {
        let Some(part) = self.files.remove(name) else {
            return Ok(None);
        };
        check(kind, part.content_type.as_deref(), part.bytes.len())?;
        Ok(Some(part.bytes))
    }
}

pub fn check(kind: UploadKind, content_type: Option<&str>, len: usize) -> Result<(), UploadError> {
    let allowed = kind.allowed_types();
    if !content_type.is_some_and(|ct| allowed.iter().any(|a| *a == ct)) {
        return Err(UploadError::InvalidType(allowed.join(", ")));
    }
    if len > MAX_UPLOAD_SIZE {
        return Err(UploadError::TooLarge);
    }
    Ok(())
}
