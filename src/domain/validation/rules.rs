//! Validation rules and rule sets

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

static RULE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[a-z_]+)(?::(?P<arg>\d+))?$").expect("rule pattern is valid")
});

/// A single constraint applied to one input field
///
/// `Min`/`Max` bound the character count of strings, the element count of
/// arrays, and the value of numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required,
    String,
    Email,
    Integer,
    Array,
    Min(u64),
    Max(u64),
}

impl FromStr for Rule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = RULE_PATTERN
            .captures(s.trim())
            .ok_or_else(|| DomainError::configuration(format!("Malformed rule: '{}'", s)))?;

        let arg = captures
            .name("arg")
            .map(|m| m.as_str().parse::<u64>())
            .transpose()
            .map_err(|e| DomainError::configuration(format!("Bad rule argument in '{}': {}", s, e)))?;

        match (&captures["name"], arg) {
            ("required", None) => Ok(Rule::Required),
            ("string", None) => Ok(Rule::String),
            ("email", None) => Ok(Rule::Email),
            ("integer", None) => Ok(Rule::Integer),
            ("array", None) => Ok(Rule::Array),
            ("min", Some(n)) => Ok(Rule::Min(n)),
            ("max", Some(n)) => Ok(Rule::Max(n)),
            (name, _) => Err(DomainError::configuration(format!(
                "Unknown rule or wrong arity: '{}'",
                name
            ))),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::String => write!(f, "string"),
            Rule::Email => write!(f, "email"),
            Rule::Integer => write!(f, "integer"),
            Rule::Array => write!(f, "array"),
            Rule::Min(n) => write!(f, "min:{}", n),
            Rule::Max(n) => write!(f, "max:{}", n),
        }
    }
}

/// Ordered list of fields with the rules each must satisfy
///
/// Field order determines the order of reported errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: Vec<(String, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field with explicit rules
    pub fn field(mut self, name: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.fields.push((name.into(), rules.into_iter().collect()));
        self
    }

    /// Adds a field from a pipe-separated spec such as `required|email|max:255`
    pub fn parse_field(self, name: impl Into<String>, spec: &str) -> Result<Self, DomainError> {
        let rules = spec
            .split('|')
            .filter(|part| !part.trim().is_empty())
            .map(Rule::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.field(name, rules))
    }

    /// Builds a rule set from `(field, spec)` pairs
    pub fn parse<'a>(
        specs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, DomainError> {
        specs
            .into_iter()
            .try_fold(Self::new(), |set, (name, spec)| set.parse_field(name, spec))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(f, r)| (f.as_str(), r.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
