//! Property-based tests for local filename derivation.

use proptest::prelude::*;

use super::naming::{derive_extension, download_file_name, sanitize_title, view_file_name};
use super::types::DeclaredType;

fn declared_type() -> impl Strategy<Value = DeclaredType> {
    prop_oneof![
        Just(DeclaredType::Pdf),
        Just(DeclaredType::Doc),
        Just(DeclaredType::Ppt),
        Just(DeclaredType::Img),
        Just(DeclaredType::Link),
        Just(DeclaredType::Other),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Sanitized titles contain only `[A-Za-z0-9_]` and keep their length in chars.
    #[test]
    fn prop_sanitize_keeps_safe_chars(title in any::<String>()) {
        let sanitized = sanitize_title(&title);

        prop_assert!(sanitized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        prop_assert_eq!(sanitized.chars().count(), title.chars().count());
    }

    /// Alphanumeric ASCII titles pass through unchanged.
    #[test]
    fn prop_sanitize_identity_on_safe_titles(title in "[A-Za-z0-9]{0,40}") {
        prop_assert_eq!(sanitize_title(&title), title);
    }

    /// The extension is never empty and has no uppercase letters.
    #[test]
    fn prop_extension_lowercase_and_non_empty(
        name in any::<String>(),
        declared in declared_type(),
    ) {
        let ext = derive_extension(&name, declared);

        prop_assert!(!ext.is_empty());
        prop_assert_eq!(ext.to_lowercase(), ext.clone());
        prop_assert!(!ext.contains(['/', '\\']));
    }

    /// Names without a dot fall back to the declared type's default.
    #[test]
    fn prop_extension_fallback_without_dot(
        name in "[^.]{0,20}",
        declared in declared_type(),
    ) {
        prop_assert_eq!(derive_extension(&name, declared), declared.default_extension());
    }

    /// View names differ by timestamp; download names depend on the title only.
    #[test]
    fn prop_view_names_unique_download_names_stable(
        title in ".{0,30}",
        first in 0i64..i64::MAX / 2,
        delta in 1i64..1_000_000,
    ) {
        prop_assert_ne!(
            view_file_name(&title, "pdf", first),
            view_file_name(&title, "pdf", first + delta)
        );
        prop_assert_eq!(
            download_file_name(&title, "pdf"),
            download_file_name(&title, "pdf")
        );
        prop_assert!(!download_file_name(&title, "pdf").contains('/'));
    }
}
