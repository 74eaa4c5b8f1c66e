//! Image upload checks

use crate::error::{ClientError, ClientResult};

pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// 5 MB
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

pub fn validate_image(content_type: &str, size: u64) -> ClientResult<()> {
    if !ALLOWED_IMAGE_TYPES.contains(&content_type.trim().to_lowercase().as_str()) {
        return Err(ClientError::invalid(
            "file",
            "Please upload a valid image file (JPEG, PNG, GIF, or WebP)",
        ));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(ClientError::invalid("file", "File size must be less than 5MB"));
    }
    Ok(())
}

/// Content type guessed from a file name's extension
pub fn content_type_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_and_size_limits() {
        assert!(validate_image("image/png", 1024).is_ok());
        assert!(validate_image("IMAGE/JPEG", MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_image("image/png", MAX_UPLOAD_BYTES + 1).is_err());
        assert!(validate_image("image/svg+xml", 10).is_err());
    }

    #[test]
    fn test_content_type_guess() {
        assert_eq!(content_type_for("photo.JPG"), Some("image/jpeg"));
        assert_eq!(content_type_for("sig.webp"), Some("image/webp"));
        assert_eq!(content_type_for("notes.txt"), None);
        assert_eq!(content_type_for("noext"), None);
    }
}
