//! Base64 data-URI codec for image payloads.
//!
//! Creations store their image as a `data:image/...;base64,...` string so a
//! single TEXT column carries both the bytes and the mime type.

use base64::Engine;

use crate::error::CoreError;

/// Image mime types the service accepts.
pub const SUPPORTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Maximum decoded image size in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Metadata extracted from a validated image data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataUri {
    pub mime_type: String,
    pub decoded_len: usize,
}

/// Parse and validate an image data URI without retaining the decoded bytes.
///
/// Checks the `data:<mime>;base64,<payload>` shape, that the mime type is one
/// of [`SUPPORTED_MIME_TYPES`], that the payload is valid non-empty base64,
/// and that the decoded size does not exceed [`MAX_IMAGE_BYTES`].
pub fn parse_image_data_uri(uri: &str) -> Result<ImageDataUri, CoreError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| CoreError::Validation("image must be a data URI".into()))?;

    let (mime_type, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| CoreError::Validation("image data URI must be base64-encoded".into()))?;

    if !SUPPORTED_MIME_TYPES.contains(&mime_type) {
        return Err(CoreError::Validation(format!(
            "unsupported image type '{mime_type}', expected one of: {}",
            SUPPORTED_MIME_TYPES.join(", ")
        )));
    }

    if payload.is_empty() {
        return Err(CoreError::Validation("image payload is empty".into()));
    }

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| CoreError::Validation(format!("invalid base64 image payload: {e}")))?;

    if decoded.len() > MAX_IMAGE_BYTES {
        return Err(CoreError::Validation(format!(
            "image is {} bytes, larger than the {MAX_IMAGE_BYTES}-byte limit",
            decoded.len()
        )));
    }

    Ok(ImageDataUri {
        mime_type: mime_type.to_string(),
        decoded_len: decoded.len(),
    })
}

/// Encode raw image bytes as a data URI.
pub fn to_data_uri(bytes: &[u8], mime_type: &str) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime_type};base64,{payload}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid PNG header bytes, enough for an encode round.
    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn parses_encoded_png() {
        let uri = to_data_uri(PNG_BYTES, "image/png");
        let parsed = parse_image_data_uri(&uri).unwrap();
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.decoded_len, PNG_BYTES.len());
    }

    #[test]
    fn rejects_missing_data_prefix() {
        assert!(parse_image_data_uri("https://example.com/cat.png").is_err());
    }

    #[test]
    fn rejects_non_base64_encoding_marker() {
        assert!(parse_image_data_uri("data:image/png,rawbytes").is_err());
    }

    #[test]
    fn rejects_unsupported_mime_type() {
        let err = parse_image_data_uri("data:image/gif;base64,R0lGOD==").unwrap_err();
        assert!(err.to_string().contains("image/gif"));
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(parse_image_data_uri("data:image/png;base64,").is_err());
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(parse_image_data_uri("data:image/png;base64,@@@not-base64@@@").is_err());
    }

    #[test]
    fn rejects_oversized_payload() {
        let big = vec![0u8; MAX_IMAGE_BYTES + 1];
        let uri = to_data_uri(&big, "image/jpeg");
        let err = parse_image_data_uri(&uri).unwrap_err();
        assert!(err.to_string().contains("larger than"));
    }
}
