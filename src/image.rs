// Image payload helpers: turn a local file into the data URI that
// `POST /moderation/image` accepts.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{Error, Result};

/// MIME type for an image path, chosen by extension (case-insensitive).
///
/// Only PNG, WebP and GIF are recognized; anything else, including a missing
/// extension, is sent as JPEG.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Encode raw bytes as `data:<mime>;base64,<data>`.
pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Read an image file and return it as a data URI.
pub async fn load_data_uri(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await.map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(encode_data_uri(&bytes, mime_type_for_path(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_their_mime_type() {
        assert_eq!(mime_type_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_type_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_type_for_path(Path::new("a.gif")), "image/gif");
        assert_eq!(mime_type_for_path(Path::new("a.jpg")), "image/jpeg");
    }

    #[test]
    fn extension_match_ignores_case() {
        assert_eq!(mime_type_for_path(Path::new("SHOUT.PNG")), "image/png");
        assert_eq!(mime_type_for_path(Path::new("Mixed.WebP")), "image/webp");
    }

    #[test]
    fn unknown_or_missing_extension_is_jpeg() {
        assert_eq!(mime_type_for_path(Path::new("scan.bmp")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("no_extension")), "image/jpeg");
        // Only the final extension counts
        assert_eq!(mime_type_for_path(Path::new("photo.png.bak")), "image/jpeg");
    }

    #[test]
    fn data_uri_uses_padded_standard_base64() {
        assert_eq!(encode_data_uri(b"hi", "image/gif"), "data:image/gif;base64,aGk=");
        assert_eq!(encode_data_uri(b"", "image/png"), "data:image/png;base64,");
    }

    #[tokio::test]
    async fn load_data_uri_reports_missing_file_as_io_error() {
        let path = Path::new("/definitely/not/here.png");
        let err = load_data_uri(path).await.unwrap_err();
        match err {
            Error::Io { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
