//! Internal helpers for name validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! display-name rules so groups and participants enforce the same
//! invariants.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Normalizes a user-supplied display name: trims surrounding whitespace and
/// applies NFC so visually identical names compare equal.
pub(crate) fn normalize_display_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.nfc().collect())
}

/// Case-folded NFKC key used for duplicate detection.
///
/// Two names with the same key are considered the same identity even when
/// their display forms differ (case, compatibility characters).
pub(crate) fn normalize_name_key(value: &str) -> String {
    value.nfkc().flat_map(char::to_lowercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_trimmed() {
        assert_eq!(
            normalize_display_name("  Alice  ", "participant").unwrap(),
            "Alice"
        );
        assert!(normalize_display_name("   ", "participant").is_err());
    }

    #[test]
    fn key_folds_case_and_compatibility_forms() {
        assert_eq!(normalize_name_key("Alice"), normalize_name_key("ALICE"));
        assert_eq!(normalize_name_key("Café"), normalize_name_key("CAFÉ"));
    }
}
