//! Patient phone numbers

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, str::FromStr};
use validator::{Validate, ValidationError, ValidationErrors};

/// Message shown when a phone number doesn't look like an Egyptian mobile number
pub const INVALID_PHONE_NUMBER: &str = "Invalid Egyptian phone number";

static EGYPTIAN_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^01[0125][0-9]{8}$").expect("Valid hardcoded phone number regex"));

/// A verified Egyptian mobile phone number.
///
/// Eleven ASCII digits, starting with `010`, `011`, `012` or `015`.
/// Surrounding whitespace is stripped when parsing.
///
/// Every request the portal sends that carries a phone number takes
/// this type, so the format is checked before anything goes on the wire.
#[derive(Clone, Serialize, Deserialize, Validate, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PhoneNumber {
    #[validate(custom = "egyptian_mobile_pattern")]
    inner: String,
}

impl std::fmt::Debug for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PhoneNumber").field(&self.inner).finish()
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.as_str().fmt(f)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, ValidationErrors> {
        let phone_number = Self {
            inner: s.trim().to_string(),
        };
        phone_number.validate()?;
        Ok(phone_number)
    }
}

impl PhoneNumber {
    /// Get a string reference of this phone number
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }
}

fn egyptian_mobile_pattern(s: &str) -> Result<(), ValidationError> {
    if EGYPTIAN_MOBILE.is_match(s) {
        Ok(())
    } else {
        let mut err = ValidationError::new("egyptian_mobile");
        err.message = Some(Cow::Borrowed(INVALID_PHONE_NUMBER));
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_validation_message;
    use assert_matches::assert_matches;

    #[test]
    fn test_valid_phone_numbers() {
        assert_matches!("01012345678".parse::<PhoneNumber>(), Ok(_));
        assert_matches!("01112345678".parse::<PhoneNumber>(), Ok(_));
        assert_matches!("01212345678".parse::<PhoneNumber>(), Ok(_));
        assert_matches!("01512345678".parse::<PhoneNumber>(), Ok(_));
    }

    #[test]
    fn test_phone_number_is_trimmed() {
        let phone: PhoneNumber = "  01012345678\n".parse().unwrap();
        assert_eq!(phone.as_str(), "01012345678");
    }

    #[test]
    fn test_phone_number_wrong_length() {
        assert_matches!("123".parse::<PhoneNumber>(), Err(_));
        assert_matches!("0101234567".parse::<PhoneNumber>(), Err(_));
        assert_matches!("010123456789".parse::<PhoneNumber>(), Err(_));
        assert_matches!("".parse::<PhoneNumber>(), Err(_));
    }

    #[test]
    fn test_phone_number_wrong_operator_prefix() {
        assert_matches!("01312345678".parse::<PhoneNumber>(), Err(_));
        assert_matches!("01412345678".parse::<PhoneNumber>(), Err(_));
        assert_matches!("02012345678".parse::<PhoneNumber>(), Err(_));
        assert_matches!("01,12345678".parse::<PhoneNumber>(), Err(_));
    }

    #[test]
    fn test_phone_number_rejects_non_ascii_digits() {
        assert_matches!("٠١٠١٢٣٤٥٦٧٨".parse::<PhoneNumber>(), Err(_));
        assert_matches!("+201012345678".parse::<PhoneNumber>(), Err(_));
        assert_matches!("0101234567a".parse::<PhoneNumber>(), Err(_));
    }

    #[test]
    fn test_phone_number_rejection_message() {
        let err = "123".parse::<PhoneNumber>().unwrap_err();
        assert_eq!(first_validation_message(&err), INVALID_PHONE_NUMBER);
    }

    #[test]
    fn test_phone_number_serializes_as_string() -> testresult::TestResult {
        let phone: PhoneNumber = "01012345678".parse()?;
        assert_eq!(serde_json::to_string(&phone)?, "\"01012345678\"");
        Ok(())
    }
}
