//! Type name normalization
//!
//! Registry type names embed their API version (`V1Pod`, `V1beta1CronJob`,
//! `CoreV1Event`). Everything up to and including the last digit is version
//! marker; the remainder is the version-agnostic kind.

/// Strip the version marker from a type name
///
/// Returns the suffix after the last ASCII digit, or the input unchanged
/// when it contains no digit.
///
/// ```
/// use kubetype_core::naming::strip_version;
///
/// assert_eq!(strip_version("V1beta1CronJob"), "CronJob");
/// assert_eq!(strip_version("Pod"), "Pod");
/// ```
pub fn strip_version(name: &str) -> &str {
    match name.rfind(|c: char| c.is_ascii_digit()) {
        // ASCII digits are one byte wide
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

/// Case-insensitive comparison of two kinds after stripping their versions
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    strip_version(a).eq_ignore_ascii_case(strip_version(b))
}

/// Uppercase the first character of `s`
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
