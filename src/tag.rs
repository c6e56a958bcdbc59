//! Hashtag normalization and extraction.
//!
//! Every place that stores or compares tags goes through [`normalize`],
//! so matching never produces false negatives from inconsistent trimming.

/// Normalize a raw token into a hashtag.
///
/// A token qualifies as a tag iff it begins with `#` and contains at least
/// one non-whitespace character after the marker. Surrounding whitespace is
/// stripped. Returns `None` for anything else; callers must discard `None`
/// results rather than inserting them into a tag set.
///
/// Normalization is idempotent: `normalize(t) == Some(t)` for any tag it
/// has already produced.
pub fn normalize(raw: &str) -> Option<String> {
    let token = raw.trim();
    let rest = token.strip_prefix('#')?;
    if rest.trim().is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// Extract normalized hashtags from free text.
///
/// Scans lines that start with `#` and splits them on whitespace, keeping
/// every token that normalizes to a tag. This mirrors how the source feed
/// formats its posts: tags grouped on dedicated lines.
pub fn scan_tags(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for line in text.lines() {
        if !line.trim_start().starts_with('#') {
            continue;
        }
        for token in line.split_whitespace() {
            if let Some(tag) = normalize(token) {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_valid_tag() {
        assert_eq!(normalize("#flutter"), Some("#flutter".to_string()));
    }

    #[test]
    fn test_normalize_idempotent() {
        let tag = normalize("#flutter").unwrap();
        assert_eq!(normalize(&tag), Some(tag.clone()));
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(normalize("  #rust  "), Some("#rust".to_string()));
    }

    #[test]
    fn test_normalize_rejects_missing_marker() {
        assert_eq!(normalize("rust"), None);
    }

    #[test]
    fn test_normalize_rejects_bare_marker() {
        assert_eq!(normalize("#"), None);
        assert_eq!(normalize("#   "), None);
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
    }

    #[test]
    fn test_scan_tags_basic() {
        let text = "Looking for a developer\n\n#rust #backend #remote";
        assert_eq!(scan_tags(text), vec!["#rust", "#backend", "#remote"]);
    }

    #[test]
    fn test_scan_tags_skips_non_tag_lines() {
        let text = "contact: someone#somewhere\n#rust";
        assert_eq!(scan_tags(text), vec!["#rust"]);
    }

    #[test]
    fn test_scan_tags_discards_bare_markers() {
        let text = "#rust # #backend";
        assert_eq!(scan_tags(text), vec!["#rust", "#backend"]);
    }

    #[test]
    fn test_scan_tags_deduplicates() {
        let text = "#rust #rust\n#rust #tokio";
        assert_eq!(scan_tags(text), vec!["#rust", "#tokio"]);
    }

    #[test]
    fn test_scan_tags_empty_text() {
        assert!(scan_tags("").is_empty());
    }
}
