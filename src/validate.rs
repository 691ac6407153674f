//! Client-side form validation
//!
//! Mirrors the server-side required-field constraints so invalid input
//! never produces a network call. The server stays the final authority.

use crate::api::{ApiError, NewRequest};
use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone pattern compiles"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

/// Check a new-request payload before it is allowed near the wire.
pub fn validate_new_request(request: &NewRequest) -> Result<(), ApiError> {
    require("name", &request.name)?;
    require("phone", &request.phone)?;
    require("email", &request.email)?;
    require("room number", &request.room_no)?;
    require("address", &request.address)?;
    require("service type", &request.service_type)?;

    if !PHONE_RE.is_match(request.phone.trim()) {
        return Err(ApiError::Validation(
            "phone must be exactly 10 digits".to_string(),
        ));
    }
    if !EMAIL_RE.is_match(request.email.trim()) {
        return Err(ApiError::Validation(format!(
            "'{}' is not a valid email address",
            request.email
        )));
    }
    Ok(())
}

/// Check assignment inputs; an empty staff name or email must not
/// issue a network call.
pub fn validate_assignment(staff_name: &str, staff_email: &str) -> Result<(), ApiError> {
    if staff_name.trim().is_empty() || staff_email.trim().is_empty() {
        return Err(ApiError::Validation(
            "both staff name and email are required".to_string(),
        ));
    }
    Ok(())
}

/// Check login/register credentials before the call.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(ApiError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    if password.len() < 6 {
        return Err(ApiError::Validation(
            "password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_request() -> NewRequest {
        NewRequest {
            user_id: None,
            name: "A".to_string(),
            email: "a@b.com".to_string(),
            phone: "1234567890".to_string(),
            room_no: "101".to_string(),
            address: "x".to_string(),
            location_url: None,
            service_type: "deep-clean".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_new_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let mut req = valid_request();
        req.address = "  ".to_string();
        let err = validate_new_request(&req).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("address"));
    }

    #[test]
    fn test_short_phone_fails() {
        let mut req = valid_request();
        req.phone = "12345".to_string();
        assert!(validate_new_request(&req).unwrap_err().is_validation());
    }

    #[test]
    fn test_phone_with_letters_fails() {
        let mut req = valid_request();
        req.phone = "12345abcde".to_string();
        assert!(validate_new_request(&req).unwrap_err().is_validation());
    }

    #[test]
    fn test_bad_email_fails() {
        let mut req = valid_request();
        req.email = "not-an-email".to_string();
        assert!(validate_new_request(&req).unwrap_err().is_validation());
    }

    #[test]
    fn test_location_url_is_optional() {
        let mut req = valid_request();
        req.location_url = None;
        assert!(validate_new_request(&req).is_ok());
    }

    #[test]
    fn test_assignment_rejects_empty_inputs() {
        assert!(validate_assignment("", "a@b.com").is_err());
        assert!(validate_assignment("Sonal", "  ").is_err());
        assert!(validate_assignment("Sonal", "sonal@example.com").is_ok());
    }

    proptest! {
        #[test]
        fn prop_exactly_ten_digits_pass(phone in "[0-9]{10}") {
            let mut req = valid_request();
            req.phone = phone;
            prop_assert!(validate_new_request(&req).is_ok());
        }

        #[test]
        fn prop_wrong_length_phones_fail(phone in "[0-9]{0,9}|[0-9]{11,14}") {
            let mut req = valid_request();
            req.phone = phone.clone();
            // Empty strings trip the required check, the rest the pattern.
            prop_assert!(validate_new_request(&req).is_err());
        }
    }
}
