//! Image payloads handed to the detection endpoint.
//!
//! A picker hands back a uri. Three shapes are understood: `data:<mime>;base64,<bytes>`,
//! `file://<path>` and a bare filesystem path.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::ClientError;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";
const DEFAULT_FILE_NAME: &str = "photo.jpg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub async fn load(&self) -> Result<LoadedImage, ClientError> {
        if let Some(rest) = self.uri.strip_prefix("data:") {
            return self.decode_data_uri(rest);
        }

        let path = self.uri.strip_prefix("file://").unwrap_or(&self.uri);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| self.image_error(e.to_string()))?;
        let mime_type = mime_guess::from_path(path)
            .first_raw()
            .filter(|mime| mime.starts_with("image/"))
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let file_name = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_FILE_NAME)
            .to_string();

        Ok(LoadedImage {
            bytes,
            file_name,
            mime_type,
        })
    }

    fn decode_data_uri(&self, rest: &str) -> Result<LoadedImage, ClientError> {
        let (meta, data) = rest
            .split_once(',')
            .ok_or_else(|| self.image_error("malformed data uri"))?;
        let mut meta_parts = meta.split(';');
        let mime_type = meta_parts
            .next()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        if !meta_parts.any(|part| part == "base64") {
            return Err(self.image_error("only base64 data uris are supported"));
        }
        let bytes = STANDARD
            .decode(data.trim())
            .map_err(|e| self.image_error(format!("invalid base64 payload: {e}")))?;

        Ok(LoadedImage {
            bytes,
            file_name: file_name_for_mime(&mime_type).to_string(),
            mime_type,
        })
    }

    fn image_error(&self, reason: impl Into<String>) -> ClientError {
        ClientError::Image {
            uri: self.uri.chars().take(64).collect(),
            reason: reason.into(),
        }
    }
}

fn file_name_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "photo.png",
        "image/webp" => "photo.webp",
        _ => DEFAULT_FILE_NAME,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn decodes_base64_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"png-bytes"));
        let loaded = ImagePayload::new(uri).load().await.expect("load");
        assert_eq!(loaded.bytes, b"png-bytes");
        assert_eq!(loaded.mime_type, "image/png");
        assert_eq!(loaded.file_name, "photo.png");
    }

    #[tokio::test]
    async fn rejects_non_base64_data_uri() {
        let err = ImagePayload::new("data:image/png,raw")
            .load()
            .await
            .expect_err("must fail");
        assert!(matches!(err, ClientError::Image { .. }));
    }

    #[tokio::test]
    async fn reads_file_uri_and_guesses_mime() {
        let mut file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .expect("temp file");
        file.write_all(b"fake-png").expect("write");
        let uri = format!("file://{}", file.path().display());

        let loaded = ImagePayload::new(uri).load().await.expect("load");
        assert_eq!(loaded.bytes, b"fake-png");
        assert_eq!(loaded.mime_type, "image/png");
        assert!(loaded.file_name.ends_with(".png"));
    }

    #[tokio::test]
    async fn missing_file_is_an_image_error() {
        let err = ImagePayload::new("/definitely/not/here.jpg")
            .load()
            .await
            .expect_err("must fail");
        assert!(matches!(err, ClientError::Image { .. }));
    }
}
