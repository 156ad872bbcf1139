use std::fmt;
use thiserror::Error;

/// Placeholder substituted with the current steps-per-rotation value.
pub const PERIOD_PLACEHOLDER: &str = "{period}";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TemplateError {
    #[error("Template '{0}' is empty")]
    Empty(String),

    #[error(
        "Template '{0}' does not contain the '{{period}}' placeholder; every run would write the same file"
    )]
    MissingPlaceholder(String),
}

/// A filename pattern whose rendering differs for every sweep value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate(String);

impl PathTemplate {
    pub fn parse(pattern: impl Into<String>) -> Result<Self, TemplateError> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(TemplateError::Empty(pattern));
        }
        if !pattern.contains(PERIOD_PLACEHOLDER) {
            return Err(TemplateError::MissingPlaceholder(pattern));
        }
        Ok(Self(pattern))
    }

    pub fn render(&self, period: u64) -> String {
        self.0.replace(PERIOD_PLACEHOLDER, &period.to_string())
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
