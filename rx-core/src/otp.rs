//! One-time passwords sent by SMS

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

/// An OTP as entered by the user.
///
/// The content is opaque to the client. The server is the one deciding
/// whether it's valid, we only check it's long enough to be worth sending.
#[derive(Clone, Serialize, Deserialize, Validate, Eq, PartialEq)]
#[serde(transparent)]
pub struct OtpCode {
    #[validate(length(min = 6, message = "OTP must be 6 digits"))]
    inner: String,
}

// Never print the code itself
impl std::fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OtpCode").field(&"******").finish()
    }
}

impl FromStr for OtpCode {
    type Err = ValidationErrors;

    fn from_str(s: &str) -> Result<Self, ValidationErrors> {
        let code = Self {
            inner: s.trim().to_string(),
        };
        code.validate()?;
        Ok(code)
    }
}

impl OtpCode {
    /// Get a string reference of this code
    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::first_validation_message;
    use assert_matches::assert_matches;

    #[test]
    fn test_otp_length() {
        assert_matches!("123456".parse::<OtpCode>(), Ok(_));
        assert_matches!("a1b2c3d4".parse::<OtpCode>(), Ok(_));
        assert_matches!("12345".parse::<OtpCode>(), Err(_));
        assert_matches!("  12345  ".parse::<OtpCode>(), Err(_));
        assert_matches!("".parse::<OtpCode>(), Err(_));
    }

    #[test]
    fn test_otp_rejection_message() {
        let err = "123".parse::<OtpCode>().unwrap_err();
        assert_eq!(first_validation_message(&err), "OTP must be 6 digits");
    }

    #[test]
    fn test_otp_debug_is_redacted() {
        let code: OtpCode = "987654".parse().unwrap();
        assert!(!format!("{code:?}").contains("987654"));
    }
}
