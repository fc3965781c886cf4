//! Local filename derivation.
//!
//! Local copies are always named `sanitize_title(title) + "." + extension`.
//! View copies additionally carry a millisecond timestamp so repeated views
//! of the same title never collide; downloads do not, so they overwrite.

use super::types::DeclaredType;

/// Replace every character outside `[a-zA-Z0-9]` with `_`.
///
/// Character count is preserved. No length limit is applied.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Extension for the local copy.
///
/// Takes the text after the last `.` of `source_file_name`, lower-cased, when
/// non-empty. Otherwise falls back to the declared type's default.
#[must_use]
pub fn derive_extension(source_file_name: &str, declared_type: DeclaredType) -> String {
    if let Some((_, ext)) = source_file_name.rsplit_once('.') {
        // A separator would turn the extension into a subdirectory.
        if !ext.is_empty() && !ext.contains(['/', '\\']) {
            return ext.to_lowercase();
        }
    }
    declared_type.default_extension().to_string()
}

/// Filename of a transient view copy: `<title>_<millis>.<ext>`.
#[must_use]
pub fn view_file_name(title: &str, extension: &str, unix_millis: i64) -> String {
    format!("{}_{unix_millis}.{extension}", sanitize_title(title))
}

/// Filename of a durable download: `<title>.<ext>`.
#[must_use]
pub fn download_file_name(title: &str, extension: &str) -> String {
    format!("{}.{extension}", sanitize_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_extension_last_segment_lowercased() {
        assert_eq!(
            derive_extension("report.final.PDF", DeclaredType::Doc),
            "pdf"
        );
    }

    #[test]
    fn test_extension_fallback_for_empty_name() {
        assert_eq!(derive_extension("", DeclaredType::Ppt), "pptx");
    }

    #[rstest]
    #[case("notes", DeclaredType::Pdf, "pdf")]
    #[case("notes.", DeclaredType::Doc, "docx")]
    #[case("photo", DeclaredType::Img, "jpg")]
    #[case("weird", DeclaredType::Link, "file")]
    #[case("a./../evil", DeclaredType::Pdf, "pdf")]
    #[case("chapter1.Docx", DeclaredType::Pdf, "docx")]
    fn test_extension_cases(
        #[case] name: &str,
        #[case] declared: DeclaredType,
        #[case] expected: &str,
    ) {
        assert_eq!(derive_extension(name, declared), expected);
    }

    #[test]
    fn test_sanitize_title() {
        let sanitized = sanitize_title("Mid-Term: Exam (2024)!");
        assert_eq!(sanitized, "Mid_Term__Exam__2024__");
        assert_eq!(sanitized.chars().count(), "Mid-Term: Exam (2024)!".chars().count());
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize_title("Géométrie"), "G_om_trie");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            view_file_name("Algebra Notes", "pdf", 1_700_000_000_000),
            "Algebra_Notes_1700000000000.pdf"
        );
        assert_eq!(download_file_name("Algebra Notes", "pdf"), "Algebra_Notes.pdf");
    }
}
