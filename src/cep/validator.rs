//! Postal code shape validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Length of a postal code in bytes.
pub const POSTAL_CODE_LEN: usize = 8;

/// Shape rule applied to an inbound postal code.
///
/// The gateway hop historically accepted only digits while the resolver hop
/// only checked the length. Both rules are kept so that neither hop silently
/// changes what it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostalCodeShape {
    /// Exactly eight ASCII digits.
    #[default]
    Strict,
    /// Exactly eight bytes of any kind.
    LengthOnly,
}

impl PostalCodeShape {
    /// Returns true if `code` satisfies this shape.
    pub fn validate(self, code: &str) -> bool {
        match self {
            PostalCodeShape::Strict => {
                code.len() == POSTAL_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
            }
            PostalCodeShape::LengthOnly => code.len() == POSTAL_CODE_LEN,
        }
    }
}

impl fmt::Display for PostalCodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostalCodeShape::Strict => f.write_str("strict"),
            PostalCodeShape::LengthOnly => f.write_str("length_only"),
        }
    }
}

/// A postal code that passed a shape check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate `raw` against `shape`.
    pub fn parse(raw: &str, shape: PostalCodeShape) -> DomainResult<Self> {
        if shape.validate(raw) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(DomainError::InvalidInput)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
