//! Content sniffing for uploads.
//!
//! Clients frequently send images with a generic or missing content type, so
//! the format is guessed from the leading bytes instead.

/// Best-effort MIME type of an upload from its magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniffs_common_formats() {
        assert_eq!(sniff_mime(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR"), "image/png");
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]), "image/jpeg");
        assert_eq!(sniff_mime(b"GIF89a...."), "image/gif");
    }

    #[test]
    fn test_unknown_bytes_fall_back() {
        let mime = sniff_mime(b"hello world");
        assert_eq!(mime, "application/octet-stream");
        assert!(!is_image(mime));
    }
}
