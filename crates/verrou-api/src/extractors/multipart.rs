//! Multipart form extractor.
//!
//! Text parts and file parts are buffered separately; handlers then pull
//! the fields they need by name.

use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use verrou_core::error::AppError;
use verrou_storage::UploadedFile;

use crate::error::ApiError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Default)]
pub struct MultipartForm {
    texts: HashMap<String, String>,
    files: HashMap<String, Vec<UploadedFile>>,
}

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(normalize_name) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or(DEFAULT_CONTENT_TYPE)
                        .to_string();
                    let data = field.bytes().await.map_err(multipart_error)?;
                    // Browsers send an empty part for an untouched file input.
                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.push_file(name, UploadedFile::new(Some(file_name), content_type, data));
                }
                None => {
                    let value = field.text().await.map_err(multipart_error)?;
                    form.texts.insert(name, value);
                }
            }
        }

        Ok(form)
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(err.body_text())
    } else {
        AppError::bad_request(err.body_text())
    }
}

/// `images[]` and `images` name the same field.
fn normalize_name(name: &str) -> String {
    name.strip_suffix("[]").unwrap_or(name).to_string()
}

/// Lenient boolean parsing for form fields.
pub fn parse_bool(field: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Ok(true),
        "false" | "0" | "off" | "no" => Ok(false),
        _ => Err(AppError::validation(format!("{field} must be a boolean"))),
    }
}

impl MultipartForm {
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.texts.insert(name.into(), value.into());
    }

    pub fn push_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.files.entry(name.into()).or_default().push(file);
    }

    /// A text field; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, name: &str) -> Result<&str, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::validation(format!("{name} is required")))
    }

    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, AppError> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| AppError::validation(format!("{name} is invalid")))
            })
            .transpose()
    }

    pub fn uuid(&self, name: &str) -> Result<Option<Uuid>, AppError> {
        self.parse::<Uuid>(name)
    }

    pub fn required_uuid(&self, name: &str) -> Result<Uuid, AppError> {
        self.uuid(name)?
            .ok_or_else(|| AppError::validation(format!("{name} is required")))
    }

    pub fn bool(&self, name: &str) -> Result<Option<bool>, AppError> {
        self.text(name).map(|raw| parse_bool(name, raw)).transpose()
    }

    /// A text field holding JSON.
    pub fn json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, AppError> {
        self.text(name)
            .map(|raw| {
                serde_json::from_str(raw)
                    .map_err(|_| AppError::validation(format!("{name} must be valid JSON")))
            })
            .transpose()
    }

    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        self.files.remove(name).unwrap_or_default()
    }

    /// First file of a field; extra files are dropped.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.take_files(name).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn sample() -> MultipartForm {
        let mut form = MultipartForm::default();
        form.push_text("name", "  Vélos ");
        form.push_text("blank", "   ");
        form.push_text("published", "true");
        form.push_text("data", r#"{"brand":"Trek"}"#);
        form.push_file(
            "images",
            UploadedFile::new(Some("a.png".into()), "image/png", Bytes::from_static(b"a")),
        );
        form.push_file(
            "images",
            UploadedFile::new(Some("b.png".into()), "image/png", Bytes::from_static(b"b")),
        );
        form
    }

    #[test]
    fn text_fields_are_trimmed_and_blank_is_absent() {
        let form = sample();
        assert_eq!(form.text("name"), Some("Vélos"));
        assert_eq!(form.text("blank"), None);
        assert!(form.required("blank").is_err());
    }

    #[test]
    fn typed_accessors() {
        let form = sample();
        assert_eq!(form.bool("published").unwrap(), Some(true));
        assert!(form.uuid("name").is_err());
        assert_eq!(form.uuid("missing").unwrap(), None);

        let data: serde_json::Value = form.json("data").unwrap().unwrap();
        assert_eq!(data["brand"], "Trek");
    }

    #[test]
    fn files_are_grouped_by_field() {
        let mut form = sample();
        assert_eq!(form.take_files("images").len(), 2);
        assert!(form.take_file("images").is_none());
    }

    #[test]
    fn bracketed_names_are_normalized() {
        assert_eq!(normalize_name("images[]"), "images");
        assert_eq!(normalize_name("invoices"), "invoices");
    }

    #[test]
    fn bool_parsing_is_lenient() {
        assert!(parse_bool("published", "1").unwrap());
        assert!(!parse_bool("published", "False").unwrap());
        assert!(parse_bool("published", "maybe").is_err());
    }
}
