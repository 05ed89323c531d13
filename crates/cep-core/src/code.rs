use crate::error::NormalizeError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of characters in a canonical postal code.
pub const CODE_LENGTH: usize = 8;

/// Characters users commonly type as separators (`01.310-100`, `(01310) 100`).
const SEPARATORS: [char; 6] = ['.', '-', '/', '(', ')', ' '];

/// Lowest assignable code prefix. Every CEP range starts at `01000-000`, so a
/// canonical code beginning with `00` has fewer than seven significant digits.
const DEGENERATE_PREFIX: &str = "00";

/// A normalized postal code: exactly eight ASCII digits.
///
/// The only ways to obtain one are [`normalize`] and
/// [`CepCode::new_unchecked`], so every key that reaches a store or a provider
/// has already been canonicalized. Deserialization goes through `normalize`
/// too and only accepts codes already in canonical form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct CepCode(String);

impl CepCode {
    /// Creates a `CepCode` without normalization.
    ///
    /// Use this only for values read back from trusted storage.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CepCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CepCode {
    type Error = NormalizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let code = normalize(Some(&value))?;
        if code.0 != value {
            return Err(NormalizeError::NotCanonical(value));
        }
        Ok(code)
    }
}

impl AsRef<str> for CepCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strips separators, left-pads with `'0'` and keeps the leftmost eight
/// characters.
///
/// Inputs longer than eight characters lose their rightmost characters, so
/// `123456789` becomes `12345678`.
pub fn canonicalize(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| !SEPARATORS.contains(c)).collect();
    let length = cleaned.chars().count();

    let mut padded = String::with_capacity(CODE_LENGTH.max(cleaned.len()));
    for _ in length..CODE_LENGTH {
        padded.push('0');
    }
    padded.push_str(&cleaned);

    padded.chars().take(CODE_LENGTH).collect()
}

/// Turns raw user input into a lookup key.
///
/// # Examples
///
/// ```
/// use cep_core::code::normalize;
///
/// assert_eq!(normalize(Some("01310-100")).unwrap().as_str(), "01310100");
/// assert_eq!(normalize(Some("1310100")).unwrap().as_str(), "01310100");
/// assert!(normalize(None).is_err());
/// ```
pub fn normalize(raw: Option<&str>) -> Result<CepCode, NormalizeError> {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(NormalizeError::EmptyInput),
    };

    let code = canonicalize(raw);

    if code.chars().count() < CODE_LENGTH {
        return Err(NormalizeError::TooShort(code));
    }

    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(NormalizeError::NonDigit(code));
    }

    if code.starts_with(DEGENERATE_PREFIX) {
        return Err(NormalizeError::TooShort(code));
    }

    Ok(CepCode(code))
}
