//! Utility functions for filename handling

use std::path::Path;

/// Minimum length of a bracketed catalog identifier
const CATALOG_ID_MIN_LEN: usize = 10;
/// Maximum length of a bracketed catalog identifier
const CATALOG_ID_MAX_LEN: usize = 13;

/// Extract an ISBN/ASIN catalog identifier from a filename
///
/// Identifiers are written in square brackets, e.g.
/// `Book Title [B00KDQFDZS].m4b` yields `B00KDQFDZS`. The bracket contents
/// must be 10 to 13 upper-case ASCII letters or digits. The first matching
/// token wins.
pub fn extract_catalog_id(filename: &str) -> Option<String> {
    for (open, _) in filename.match_indices('[') {
        let rest = &filename[open + 1..];
        let Some(close) = rest.find(']') else {
            break;
        };

        let candidate = &rest[..close];
        if is_catalog_id(candidate) {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Check if a string has the shape of a catalog identifier
pub fn is_catalog_id(candidate: &str) -> bool {
    (CATALOG_ID_MIN_LEN..=CATALOG_ID_MAX_LEN).contains(&candidate.len())
        && candidate
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Display title derived from a filename (extension stripped)
pub fn title_from_filename(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

/// Lower-case extension of a filename without the dot
pub fn format_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_catalog_id() {
        assert_eq!(
            extract_catalog_id("Book Title [B00KDQFDZS].m4b"),
            Some("B00KDQFDZS".to_string())
        );

        // 13-digit ISBN
        assert_eq!(
            extract_catalog_id("Dune [9780441013593].mp3"),
            Some("9780441013593".to_string())
        );

        // No brackets
        assert_eq!(extract_catalog_id("Plain Title.m4b"), None);

        // Too short and too long
        assert_eq!(extract_catalog_id("Title [ABC123].m4b"), None);
        assert_eq!(extract_catalog_id("Title [ABCDEFGHIJ1234].m4b"), None);

        // Lower-case is not an identifier
        assert_eq!(extract_catalog_id("Title [b00kdqfdzs].m4b"), None);
    }

    #[test]
    fn test_extract_catalog_id_skips_non_matching_brackets() {
        assert_eq!(
            extract_catalog_id("Series [Book 1] [B00KDQFDZS].m4b"),
            Some("B00KDQFDZS".to_string())
        );
        assert_eq!(
            extract_catalog_id("Nested [[B00KDQFDZS]].m4b"),
            Some("B00KDQFDZS".to_string())
        );
        assert_eq!(extract_catalog_id("Unclosed [B00KDQFDZS.m4b"), None);
    }

    #[test]
    fn test_title_from_filename() {
        assert_eq!(title_from_filename("Song.mp3"), "Song");
        assert_eq!(title_from_filename("My.Great.Book.m4b"), "My.Great.Book");
        assert_eq!(title_from_filename("noext"), "noext");
    }

    #[test]
    fn test_format_of() {
        assert_eq!(format_of("Song.MP3"), "mp3");
        assert_eq!(format_of("clip.mp4"), "mp4");
        assert_eq!(format_of("noext"), "");
    }
}
