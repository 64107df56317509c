//! Declarative field rules.
//!
//! A rule set is an ordered slice of [`Rule`]s. [`validate_entity`] evaluates
//! every rule, so a form can show all of its problems at once, and reports
//! failures in declaration order.

use super::{FieldError, ValidationError};

pub struct Rule<T> {
    pub field: &'static str,
    pub message: &'static str,
    pub predicate: fn(&T) -> bool,
}

impl<T> Rule<T> {
    pub const fn new(
        field: &'static str,
        message: &'static str,
        predicate: fn(&T) -> bool,
    ) -> Self {
        Self {
            field,
            message,
            predicate,
        }
    }
}

pub fn validate_entity<T>(entity: &T, rules: &[Rule<T>]) -> Vec<FieldError> {
    rules
        .iter()
        .filter(|rule| !(rule.predicate)(entity))
        .map(|rule| FieldError::new(rule.field, rule.message))
        .collect()
}

/// Runs `rules` and turns any failure into a [`ValidationError`].
pub fn ensure_valid<T>(
    entity: &T,
    rules: &[Rule<T>],
) -> Result<(), ValidationError> {
    let errors = validate_entity(entity, rules);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::failed(errors))
    }
}

pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}
