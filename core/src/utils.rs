//! Utility functions and types.

use std::fmt::Debug;

/// Redacts a secret for `Debug` output.
///
/// - Empty input renders as `EMPTY`.
/// - Input shorter than 12 characters is fully hidden.
/// - Longer input keeps the first and last three characters so different
///   secrets can still be told apart in logs.
///
/// Multi-line input such as PEM documents is always fully hidden.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12
            || self.0.contains('\n')
            || !self.0.is_char_boundary(3)
            || !self.0.is_char_boundary(length - 3)
        {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..3])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 3..])
        }
    }
}

/// Trim the input and collapse every run of whitespace into a single space.
///
/// ```
/// use paysign_core::utils::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  a   b \t c "), "a b c");
/// ```
pub fn collapse_whitespace(input: &str) -> String {
    let mut s = String::with_capacity(input.len());
    for (idx, word) in input.split_whitespace().enumerate() {
        if idx != 0 {
            s.push(' ');
        }
        s.push_str(word);
    }
    s
}
