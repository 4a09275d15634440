//! Phone-number and password normalization for signup and login.
//!
//! Both signup and login run the same normalization so the lookup key used at
//! login is always the key stored at signup.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, Op};

/// `010XXXXXXXX` or `010-XXXX-XXXX`.
const MOBILE_ID_PATTERN: &str = r"^(010-\d{4}-\d{4}|010\d{8})$";

/// 1 to 255 ASCII letters, digits or one of `@$!%*?&`.
const PASSWORD_PATTERN: &str = r"^[A-Za-z0-9@$!%*?&]{1,255}$";

static MOBILE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MOBILE_ID_PATTERN).expect("valid regex"));

static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PASSWORD_PATTERN).expect("valid regex"));

/// Message for a phone number that does not match either accepted shape.
pub const INVALID_MOBILE_ID_MESSAGE: &str = "Invalid mobile phone number.";

/// Validate a mobile phone number and return its canonical 11-digit form.
pub fn normalize_phone(raw: &str) -> Result<String, CoreError> {
    const OP: Op = "core/credentials/normalize_phone";

    if !MOBILE_ID_RE.is_match(raw) {
        return Err(CoreError::invalid(OP, INVALID_MOBILE_ID_MESSAGE));
    }

    Ok(raw.replace('-', ""))
}

/// Whether `raw` is an acceptable password.
pub fn validate_password(raw: &str) -> bool {
    PASSWORD_RE.is_match(raw)
}
