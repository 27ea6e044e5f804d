//! Input validation against rule sets

use std::fmt::{self, Debug};

use serde_json::Value;
use validator::ValidateEmail;

use super::rules::{Rule, RuleSet};
use crate::domain::store::Document;

/// A single failed rule for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Field errors in rule-set order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// The error callers are shown: first one wins
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Message of the first error, or a generic one for an empty set
    pub fn first_message(&self) -> String {
        self.first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "The given data was invalid.".to_string())
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

/// Outcome of validating an input document
pub type ValidationResult = Result<Document, FieldErrors>;

/// Checks raw input against a rule set
///
/// On success returns only the fields named by the rule set.
pub trait Validator: Send + Sync + Debug {
    fn validate(&self, input: &Document, rules: &RuleSet) -> ValidationResult;
}

/// Reference validator implementing [`Rule`] semantics
#[derive(Debug, Clone, Default)]
pub struct RuleValidator;

impl RuleValidator {
    pub fn new() -> Self {
        Self
    }

    fn is_blank(value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(Value::Array(items)) => items.is_empty(),
            _ => false,
        }
    }

    fn size_of(value: &Value) -> Option<f64> {
        match value {
            Value::String(s) => Some(s.chars().count() as f64),
            Value::Array(items) => Some(items.len() as f64),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    fn unit_of(value: &Value) -> &'static str {
        match value {
            Value::String(_) => " characters",
            Value::Array(_) => " items",
            _ => "",
        }
    }

    fn check(field: &str, rule: Rule, value: &Value) -> Option<String> {
        match rule {
            Rule::Required => None,
            Rule::String => (!value.is_string())
                .then(|| format!("The {} field must be a string.", field)),
            Rule::Integer => (!(value.is_i64() || value.is_u64()))
                .then(|| format!("The {} field must be an integer.", field)),
            Rule::Array => (!value.is_array())
                .then(|| format!("The {} field must be an array.", field)),
            Rule::Email => {
                let valid = value.as_str().is_some_and(|s| s.validate_email());
                (!valid).then(|| format!("The {} field must be a valid email address.", field))
            }
            Rule::Min(min) => match Self::size_of(value) {
                Some(size) if size < min as f64 => Some(format!(
                    "The {} field must be at least {}{}.",
                    field,
                    min,
                    Self::unit_of(value)
                )),
                _ => None,
            },
            Rule::Max(max) => match Self::size_of(value) {
                Some(size) if size > max as f64 => Some(format!(
                    "The {} field must not be greater than {}{}.",
                    field,
                    max,
                    Self::unit_of(value)
                )),
                _ => None,
            },
        }
    }
}

impl Validator for RuleValidator {
    fn validate(&self, input: &Document, rules: &RuleSet) -> ValidationResult {
        let mut validated = Document::new();
        let mut errors = FieldErrors::new();

        for (field, field_rules) in rules.iter() {
            let value = input.get(field);

            if Self::is_blank(value) {
                if field_rules.contains(&Rule::Required) {
                    errors.push(FieldError::new(
                        field,
                        format!("The {} field is required.", field),
                    ));
                }
                continue;
            }

            let Some(value) = value else {
                continue;
            };

            // One error per field; later rules are not evaluated once one fails
            let failure = field_rules
                .iter()
                .find_map(|rule| Self::check(field, *rule, value));

            match failure {
                Some(message) => errors.push(FieldError::new(field, message)),
                None => {
                    validated.insert(field.to_string(), value.clone());
                }
            }
        }

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(errors)
        }
    }
}
