use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::ValidationError;

/// Prefix under which every listing image is stored
pub const LISTING_IMAGE_PREFIX: &str = "listings";

/// Longest extension kept from an uploaded file name, dot included
pub const MAX_EXTENSION_LEN: usize = 10;

const MAX_KEY_LEN: usize = 1024;

/// A validated storage key for a listing image.
///
/// Keys are opaque strings in the object store, never URLs and never taken
/// verbatim from callers: new keys come from [`ImageKey::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Wrap an existing key (e.g. one read back from the database)
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyImageKey);
        }

        if value.len() > MAX_KEY_LEN {
            return Err(ValidationError::ImageKeyTooLong {
                actual: value.len(),
                max: MAX_KEY_LEN,
            });
        }

        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(ValidationError::InvalidImageKeyCharacter(c));
        }

        if value.starts_with('/') {
            return Err(ValidationError::ImageKeyStartsWithSlash);
        }

        if value.contains("//") {
            return Err(ValidationError::ImageKeyContainsDoubleSlash);
        }

        Ok(Self(value))
    }

    /// Generate a fresh key: `listings/<yyyy-mm-dd>/<uuid><.ext>`.
    ///
    /// Only a sanitized extension survives from the original file name.
    pub fn generate(original_file_name: Option<&str>, now: DateTime<Utc>) -> Self {
        let extension = original_file_name
            .map(sanitize_extension)
            .unwrap_or_default();

        Self(format!(
            "{}/{}/{}{}",
            LISTING_IMAGE_PREFIX,
            now.format("%Y-%m-%d"),
            Uuid::new_v4(),
            extension
        ))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Extract `.ext` from a file name, lowercased, ASCII alphanumerics only,
/// at most [`MAX_EXTENSION_LEN`] characters including the dot.
fn sanitize_extension(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();

    let Some((stem, raw_ext)) = base.rsplit_once('.') else {
        return String::new();
    };
    // ".bashrc" style names have no extension
    if stem.is_empty() {
        return String::new();
    }

    let cleaned: String = raw_ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXTENSION_LEN - 1)
        .collect::<String>()
        .to_ascii_lowercase();

    if cleaned.is_empty() {
        String::new()
    } else {
        format!(".{}", cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_valid_image_key() {
        assert!(ImageKey::new("listings/2024-01-01/a.png".to_string()).is_ok());
        assert!(ImageKey::new("photo.jpg".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_image_key() {
        assert!(ImageKey::new("".to_string()).is_err());
        assert!(ImageKey::new("/leading-slash".to_string()).is_err());
        assert!(ImageKey::new("double//slash".to_string()).is_err());
        assert!(ImageKey::new("null\0byte".to_string()).is_err());
        assert!(ImageKey::new("x".repeat(1025)).is_err());
    }

    #[test]
    fn test_generated_key_is_date_partitioned() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        let key = ImageKey::generate(Some("Holiday Photo.JPG"), now);

        assert!(key.as_str().starts_with("listings/2024-03-09/"));
        assert!(key.as_str().ends_with(".jpg"));
        assert!(ImageKey::new(key.as_str().to_string()).is_ok());
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let now = Utc::now();
        let a = ImageKey::generate(Some("a.png"), now);
        let b = ImageKey::generate(Some("a.png"), now);
        assert_ne!(a, b);
    }

    #[test]
    fn test_extension_is_sanitized() {
        assert_eq!(sanitize_extension("x.png"), ".png");
        assert_eq!(sanitize_extension("../../etc/passwd"), "");
        assert_eq!(sanitize_extension("evil.p/hp"), "");
        assert_eq!(sanitize_extension("weird.j$p%g"), ".jpg");
        assert_eq!(sanitize_extension(".hidden"), "");
        assert_eq!(sanitize_extension("noext"), "");
        assert_eq!(sanitize_extension("long.abcdefghijklmnop"), ".abcdefghi");
        assert!(sanitize_extension("long.abcdefghijklmnop").len() <= MAX_EXTENSION_LEN);
    }
}
