//! Prescription image attachments.
//!
//! Images are stored on the record as data URLs, the same representation a
//! browser file reader produces, so a record is self-contained.

use std::path::Path;

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};

/// MIME type guessed from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Encode raw bytes as a `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

/// Read an image file and encode it as a `data:` URL.
pub fn image_to_data_url(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read image: {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "encoded image");
    Ok(encode_data_url(mime_for(path), &bytes))
}

/// Split a `data:` URL into its MIME type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .context("not a data URL")?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .context("data URL is not base64-encoded")?;
    let bytes = general_purpose::STANDARD
        .decode(payload)
        .context("invalid base64 payload")?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_for(Path::new("rx.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("rx.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("rx.jpg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("rx")), "application/octet-stream");
    }

    #[test]
    fn encode_known_bytes() {
        assert_eq!(encode_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prescription.jpg");
        std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let url = image_to_data_url(&path).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = image_to_data_url(Path::new("/nonexistent/rx.png")).unwrap_err();
        assert!(err.to_string().contains("failed to read image"));
    }

    #[test]
    fn decode_rejects_plain_text() {
        assert!(decode_data_url("hello").is_err());
        assert!(decode_data_url("data:text/plain,hello").is_err());
    }
}
