//! Body extractor for create/update endpoints that accept either JSON or
//! `multipart/form-data`.

use std::collections::HashMap;

use axum::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde_json::Value;
use service::images::UploadedFile;

use crate::errors::JsonApiError;

#[derive(Debug, Default)]
pub struct FormPayload {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

#[async_trait]
impl<S> FromRequest<S> for FormPayload
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("multipart/form-data"))
            .unwrap_or(false);

        let mut payload = FormPayload::default();
        if is_multipart {
            let mut multipart = Multipart::from_request(req, state).await?;
            while let Some(field) = multipart.next_field().await? {
                let Some(name) = field.name().map(str::to_string) else { continue };
                match field.file_name().map(str::to_string) {
                    Some(file_name) => {
                        let bytes = field.bytes().await?;
                        payload.files.insert(name, UploadedFile { file_name, bytes: bytes.to_vec() });
                    }
                    None => {
                        let text = field.text().await?;
                        payload.fields.insert(name, text);
                    }
                }
            }
        } else {
            let Json(value) = Json::<Value>::from_request(req, state).await?;
            let Value::Object(map) = value else {
                return Err(JsonApiError::validation("request body must be a JSON object"));
            };
            for (k, v) in map {
                match v {
                    Value::Null => {}
                    Value::String(s) => {
                        payload.fields.insert(k, s);
                    }
                    other => {
                        payload.fields.insert(k, other.to_string());
                    }
                }
            }
        }
        Ok(payload)
    }
}

impl FormPayload {
    /// Trimmed text value; blank counts as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn require(&self, key: &str) -> Result<String, JsonApiError> {
        self.text(key).ok_or_else(|| JsonApiError::validation(format!("{key} is required")))
    }

    pub fn number(&self, key: &str) -> Result<f64, JsonApiError> {
        self.require(key)?
            .parse::<f64>()
            .map_err(|_| JsonApiError::validation(format!("{key} must be a number")))
    }

    pub fn take_file(&mut self, key: &str) -> Option<UploadedFile> {
        self.files.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[tokio::test]
    async fn json_values_become_text_fields() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":" Oil ","price":12.5,"image_url":null}"#))
            .unwrap();
        let form = FormPayload::from_request(req, &()).await.unwrap();
        assert_eq!(form.require("name").unwrap(), "Oil");
        assert_eq!(form.number("price").unwrap(), 12.5);
        assert!(form.text("image_url").is_none());
        assert!(form.require("description").is_err());
    }

    #[tokio::test]
    async fn multipart_splits_text_and_files() {
        let body = "--XBOUNDARY\r\n\
Content-Disposition: form-data; name=\"name\"\r\n\r\n\
Comb\r\n\
--XBOUNDARY\r\n\
Content-Disposition: form-data; name=\"file\"; filename=\"comb.png\"\r\n\
Content-Type: image/png\r\n\r\n\
PNGDATA\r\n\
--XBOUNDARY--\r\n";
        let req = Request::builder()
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();
        let mut form = FormPayload::from_request(req, &()).await.unwrap();
        assert_eq!(form.text("name").as_deref(), Some("Comb"));
        let file = form.take_file("file").unwrap();
        assert_eq!(file.file_name, "comb.png");
        assert_eq!(file.bytes, b"PNGDATA");
    }

    #[tokio::test]
    async fn non_object_json_is_rejected() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("[1,2]"))
            .unwrap();
        let err = FormPayload::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
