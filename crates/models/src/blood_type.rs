//! The eight ABO/Rh blood type labels used across the schema.
//!
//! Stored as plain strings; matching is exact equality, with no compatibility
//! matrix (a request for `O-` notifies `O-` donors only).

use crate::errors::ModelError;

pub const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

pub fn is_valid(s: &str) -> bool {
    BLOOD_TYPES.contains(&s)
}

pub fn validate(s: &str) -> Result<(), ModelError> {
    if is_valid(s) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!("invalid blood type: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_all_eight() {
        for t in BLOOD_TYPES {
            assert!(is_valid(t), "{t} should be valid");
        }
    }

    #[test]
    fn rejects_lowercase_and_garbage() {
        assert!(!is_valid("o+"));
        assert!(!is_valid("AB"));
        assert!(!is_valid(""));
        assert!(validate("C+").is_err());
    }
}
