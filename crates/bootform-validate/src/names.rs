//! Application identifier and version checks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// Pattern an application id must satisfy.
pub const APPLICATION_ID_PATTERN: &str = "^[a-z][a-z0-9-]*[a-z0-9]$";

/// Pattern an application version must satisfy.
pub const APPLICATION_VERSION_PATTERN: &str = "^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$";

static APPLICATION_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(APPLICATION_ID_PATTERN).expect("id pattern compiles"));

static APPLICATION_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(APPLICATION_VERSION_PATTERN).expect("version pattern compiles"));

/// Validate an application id against [`APPLICATION_ID_PATTERN`].
pub fn check_application_id(id: &str) -> Result<(), ValidationError> {
    if APPLICATION_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(ValidationError::InvalidApplicationId {
            value: id.to_owned(),
            pattern: APPLICATION_ID_PATTERN,
        })
    }
}

/// Validate an application version against [`APPLICATION_VERSION_PATTERN`].
pub fn check_application_version(version: &str) -> Result<(), ValidationError> {
    if APPLICATION_VERSION_RE.is_match(version) {
        Ok(())
    } else {
        Err(ValidationError::InvalidApplicationVersion {
            value: version.to_owned(),
            pattern: APPLICATION_VERSION_PATTERN,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_application_ids() {
        for id in ["hello", "hello-world", "a2", "web-app-42"] {
            assert!(check_application_id(id).is_ok(), "rejected {id:?}");
        }
    }

    #[test]
    fn rejects_malformed_application_ids() {
        for id in ["", "a", "Hello", "2fast", "trailing-", "under_score"] {
            assert!(check_application_id(id).is_err(), "accepted {id:?}");
        }
    }

    #[test]
    fn accepts_well_formed_versions() {
        for version in ["1", "v1", "1.0.3", "2024-08-24", "1.0_rc1"] {
            assert!(check_application_version(version).is_ok(), "rejected {version:?}");
        }
    }

    #[test]
    fn rejects_malformed_versions() {
        for version in ["", ".1", "1.", "-x", "a b"] {
            assert!(check_application_version(version).is_err(), "accepted {version:?}");
        }
    }

    #[test]
    fn errors_carry_the_offending_value_and_pattern() {
        let err = check_application_id("Bad_Id").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Bad_Id"));
        assert!(message.contains(APPLICATION_ID_PATTERN));
    }
}
