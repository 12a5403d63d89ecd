//! Changelog rollover.
//!
//! The changelog follows the "keep a changelog" layout: a `## [Unreleased]`
//! section with six fixed `###` subsections above the released versions.
//! A release strips the empty subsections and opens a fresh Unreleased
//! block above a dated heading for the new version.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Marker a changelog must contain for the rollover to apply
pub const UNRELEASED_MARKER: &str = "\n## [Unreleased]\n";

/// Subsections every Unreleased block starts with
pub const SUBSECTIONS: [&str; 6] = [
    "Added",
    "Changes",
    "Deprecated",
    "Removed",
    "Fixed",
    "Security",
];

// A subsection heading plus all whitespace after it. It is empty only when
// the next character is the `#` of another heading.
static SUBSECTION_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^### [A-Za-z]+\s+").expect("heading pattern is valid"));

/// Remove every `### <Word>` heading that is followed, after only
/// whitespace, by another heading.
///
/// Whitespace-only content counts as empty. A heading at the very end of
/// the file is kept.
pub fn strip_empty_subsections(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied_up_to = 0;

    for m in SUBSECTION_HEADING.find_iter(text) {
        if text[m.end()..].starts_with('#') {
            out.push_str(&text[copied_up_to..m.start()]);
            copied_up_to = m.end();
        }
    }
    out.push_str(&text[copied_up_to..]);
    out
}

/// A fresh Unreleased block followed by the heading for `version`,
/// framed by newlines so it can replace [UNRELEASED_MARKER] in place.
pub fn unreleased_block(version: &str, date: NaiveDate) -> String {
    let mut block = String::from("\n## [Unreleased]\n\n");
    for section in SUBSECTIONS {
        block.push_str("### ");
        block.push_str(section);
        block.push_str("\n\n");
    }
    block.push_str(&format!("## [{}] - {}\n", version, date.format("%Y-%m-%d")));
    block
}

/// Strip empty subsections, then turn the Unreleased section into the
/// section of `version` released on `date`.
///
/// Returns the new text and whether the Unreleased marker was found. Without
/// a marker only the stripping applies.
pub fn roll_over(text: &str, version: &str, date: NaiveDate) -> (String, bool) {
    let stripped = strip_empty_subsections(text);
    if !stripped.contains(UNRELEASED_MARKER) {
        return (stripped, false);
    }
    let rolled = stripped.replace(UNRELEASED_MARKER, &unreleased_block(version, date));
    (rolled, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_unreleased_block_layout() {
        let block = unreleased_block("1.2.4", date());
        assert_eq!(
            block,
            "\n## [Unreleased]\n\n### Added\n\n### Changes\n\n### Deprecated\n\n\
             ### Removed\n\n### Fixed\n\n### Security\n\n## [1.2.4] - 2024-03-05\n"
        );
    }

    #[test]
    fn test_strip_removes_adjacent_empty_headings() {
        let text = "## [Unreleased]\n\n### Added\n\n### Changes\n\n- new thing\n\n### Fixed\n\n## [1.0.0]\n";
        assert_eq!(
            strip_empty_subsections(text),
            "## [Unreleased]\n\n### Changes\n\n- new thing\n\n## [1.0.0]\n"
        );
    }

    #[test]
    fn test_strip_keeps_heading_with_content() {
        let text = "### Added\n- feature\n### Fixed\n- bug\n";
        assert_eq!(strip_empty_subsections(text), text);
    }

    #[test]
    fn test_strip_keeps_heading_at_end_of_file() {
        let text = "### Security\n\n";
        assert_eq!(strip_empty_subsections(text), text);
    }

    #[test]
    fn test_strip_treats_whitespace_only_content_as_empty() {
        let text = "### Added\n   \n\t\n### Fixed\n- bug\n";
        assert_eq!(strip_empty_subsections(text), "### Fixed\n- bug\n");
    }

    #[test]
    fn test_strip_ignores_headings_with_trailing_text() {
        let text = "### Added stuff\n\n### Fixed\n- bug\n";
        assert_eq!(strip_empty_subsections(text), text);
    }

    #[test]
    fn test_strip_is_idempotent() {
        let text = "# Changelog\n\n## [Unreleased]\n\n### Added\n\n### Changes\n\n- x\n\n\
                    ### Deprecated\n\n### Removed\n\n### Fixed\n\n- y\n\n### Security\n\n## [1.0.0] - 2024-01-01\n";
        let once = strip_empty_subsections(text);
        let twice = strip_empty_subsections(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_roll_over_fresh_changelog() {
        let text = format!("# Changelog\n{}", unreleased_block("1.2.3", date()));
        let (rolled, found) = roll_over(&text, "1.2.4", date());

        assert!(found);
        assert_eq!(
            rolled,
            format!(
                "# Changelog\n{}\n## [1.2.3] - 2024-03-05\n",
                unreleased_block("1.2.4", date())
            )
        );
        assert_eq!(rolled.matches("## [Unreleased]").count(), 1);
    }

    #[test]
    fn test_roll_over_keeps_entries_under_new_version() {
        let text = "# Changelog\n\n## [Unreleased]\n\n### Added\n\n- shiny\n\n### Fixed\n\n## [1.0.0] - 2024-01-01\n";
        let (rolled, found) = roll_over(text, "1.1.0", date());

        assert!(found);
        let unreleased = rolled.find("## [Unreleased]").unwrap();
        let heading = rolled.find("## [1.1.0] - 2024-03-05").unwrap();
        let entry = rolled.find("- shiny").unwrap();
        let previous = rolled.find("## [1.0.0]").unwrap();
        assert!(unreleased < heading && heading < entry && entry < previous);
        assert!(!rolled[heading..previous].contains("### Fixed"));
    }

    #[test]
    fn test_roll_over_without_marker() {
        let text = "# Changelog\n\n### Added\n\n## [1.0.0]\n";
        let (rolled, found) = roll_over(text, "1.0.1", date());
        assert!(!found);
        assert_eq!(rolled, "# Changelog\n\n## [1.0.0]\n");
    }
}
