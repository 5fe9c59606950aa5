use std::fmt;

use crate::error::LookupError;

/// Number of digits in a Brazilian postal code.
pub const POSTAL_CODE_LEN: usize = 8;

/// Returns true iff `input` is exactly eight ASCII digits.
pub fn is_valid_postal_code(input: &str) -> bool {
    input.len() == POSTAL_CODE_LEN && input.bytes().all(|b| b.is_ascii_digit())
}

/// A postal code (CEP) that passed [`is_valid_postal_code`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        if is_valid_postal_code(input) {
            Ok(Self(input.to_owned()))
        } else {
            Err(LookupError::Validation(input.to_owned()))
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

impl TryFrom<&str> for PostalCode {
    type Error = LookupError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
