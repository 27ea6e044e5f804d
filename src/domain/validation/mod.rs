//! Validation domain
//!
//! Rule sets describe which input fields an operation accepts and the
//! constraints on each; a [`Validator`] turns raw input into validated data
//! or an ordered list of field errors.

mod rules;
mod validator;

pub use rules::{Rule, RuleSet};
pub use validator::{FieldError, FieldErrors, RuleValidator, ValidationResult, Validator};
