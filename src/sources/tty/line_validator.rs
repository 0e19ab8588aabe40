use reedline::{ValidationResult, Validator};

use crate::line::is_complete;

// Keeps the editor open while a quote or a trailing backslash is pending.
pub struct MyshLineValidator;

impl Validator for MyshLineValidator {
    fn validate(&self, line: &str) -> ValidationResult {
        if is_complete(line) {
            ValidationResult::Complete
        } else {
            ValidationResult::Incomplete
        }
    }
}
