//! Path and key derivation from free-form descriptor fields.
//!
//! Every path segment the processor emits goes through [`slugify`];
//! build timestamps additionally get the human-readable
//! `YYYY-MM-DD_HH-MM-SS` shape when they parse as ISO-8601.

use chrono::NaiveDateTime;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Whitespace runs become a single dash.
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    /// Everything that is not a word character or a dash is dropped.
    static ref NON_WORD: Regex = Regex::new(r"[^\w\-]+").unwrap();
    /// Dash runs collapse to one.
    static ref DASHES: Regex = Regex::new(r"--+").unwrap();
}

/// Filesystem- and URL-safe lowercase slug.
///
/// Periods are stripped along with the other non-word characters, so
/// "1.2.3" and "1.23" both slug to "123". The companion frontend resolves
/// report paths by this exact shape; the collision stays.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let dashed = WHITESPACE.replace_all(lowered.trim(), "-");
    let stripped = NON_WORD.replace_all(&dashed, "");
    let collapsed = DASHES.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// Build-time path segment.
///
/// ISO-8601 inputs (tolerating a trailing literal `.000`, fractional
/// seconds, or a `Z`/offset suffix) are reformatted as
/// `YYYY-MM-DD_HH-MM-SS`; anything else falls back to [`slugify`];
/// an absent or empty value becomes `unknown`.
pub fn format_build_time(build_time: Option<&str>) -> String {
    let raw = match build_time {
        None | Some("") => return "unknown".to_string(),
        Some(raw) => raw,
    };
    match parse_iso_timestamp(raw) {
        Some(dt) => dt.format("%Y-%m-%d_%H-%M-%S").to_string(),
        None => slugify(raw),
    }
}

fn parse_iso_timestamp(value: &str) -> Option<NaiveDateTime> {
    // Jenkins-style timestamps carry a literal ".000" millisecond suffix.
    let trimmed = value.strip_suffix(".000").unwrap_or(value);
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        // Keep the wall-clock fields as written, offset included.
        return Some(dt.naive_local());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{format_build_time, slugify};

    #[test]
    fn slugify_lowercases_and_dashes_whitespace() {
        assert_eq!(slugify("  My Build  Name "), "my-build-name");
    }

    #[test]
    fn slugify_strips_non_word_characters() {
        assert_eq!(slugify("1.2.3"), "123");
        assert_eq!(slugify("abcDEF"), "abcdef");
        assert_eq!(slugify("feature/json: fast?"), "featurejson-fast");
    }

    #[test]
    fn slugify_collapses_and_trims_dashes() {
        assert_eq!(slugify("--a---b--"), "a-b");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn slugify_preserves_version_collision() {
        // "1.2.3" and "1.23" intentionally produce the same path segment.
        assert_eq!(slugify("1.2.3"), slugify("1.23"));
    }

    #[test]
    fn build_time_with_millisecond_suffix() {
        assert_eq!(
            format_build_time(Some("2025-09-02T08:10:26.000")),
            "2025-09-02_08-10-26"
        );
    }

    #[test]
    fn build_time_plain_and_fractional() {
        assert_eq!(
            format_build_time(Some("2025-09-02T08:10:26")),
            "2025-09-02_08-10-26"
        );
        assert_eq!(
            format_build_time(Some("2025-09-02T08:10:26.500")),
            "2025-09-02_08-10-26"
        );
    }

    #[test]
    fn build_time_with_zone_marker() {
        assert_eq!(
            format_build_time(Some("2025-09-02T08:10:26Z")),
            "2025-09-02_08-10-26"
        );
        assert_eq!(
            format_build_time(Some("2025-09-02T08:10:26+02:00")),
            "2025-09-02_08-10-26"
        );
    }

    #[test]
    fn build_time_falls_back_to_slug() {
        assert_eq!(format_build_time(Some("nightly #42")), "nightly-42");
    }

    #[test]
    fn build_time_absent_is_unknown() {
        assert_eq!(format_build_time(None), "unknown");
        assert_eq!(format_build_time(Some("")), "unknown");
    }
}
