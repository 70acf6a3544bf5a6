//! Typed API functions per backend resource
//!
//! Every function goes through [`ApiClient`](crate::http::ApiClient), so
//! authentication, refresh and failure classification are uniform. Results
//! are `Result<_, ApiError>`; only session management in [`auth`] touches
//! credential storage and therefore returns the crate [`Result`](crate::Result).

pub mod alerts;
pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod endpoints;
pub mod itineraries;
pub mod notifications;
pub mod payments;
pub mod profile;
pub mod resource;
pub mod reviews;
pub mod weather;

use std::path::Path;

use crate::http::MultipartForm;

pub use endpoints::{paths, Environment};
pub use resource::Resource;
pub use weather::{Forecast, WeatherService};

/// Multipart part name the upload endpoints expect
pub const UPLOAD_FIELD: &str = "file";

/// An image or document to upload
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, inferring its MIME type from the extension
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        Ok(Self::new(file_name, mime_for(path), bytes))
    }

    /// Form with this file under [`UPLOAD_FIELD`]
    pub fn into_form(self) -> MultipartForm {
        MultipartForm::new().file(UPLOAD_FIELD, self.file_name, self.mime_type, self.bytes)
    }
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}
