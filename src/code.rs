//! Shaping of the encoded digest into the final code.

/// Returns the first `length` characters of `code`.
///
/// Best effort: a `length` past the end yields the whole code, `0` yields
/// an empty string.
pub fn truncate(code: &str, length: usize) -> String {
    code.chars().take(length).collect()
}

/// Applies the flower rule.
///
/// A code starting with an ASCII digit has its first character swapped with
/// the first ASCII letter. Codes that start with anything else, or contain
/// no letter at all, are returned unchanged.
pub fn adjust(code: &str) -> String {
    let mut chars: Vec<char> = code.chars().collect();

    let starts_with_digit = chars.first().is_some_and(|c| c.is_ascii_digit());
    if !starts_with_digit {
        return code.to_owned();
    }

    // position 0 is a digit, so any hit is at i > 0
    if let Some(i) = chars.iter().position(|c| c.is_ascii_alphabetic()) {
        chars.swap(0, i);
    }

    chars.into_iter().collect()
}
