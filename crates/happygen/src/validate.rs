//! Violation reports shared by the document loaders.

use std::fmt;

/// A single structural problem found in an input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path to the offending field, e.g. `keywords[2].regex`.
    pub location: String,
    pub problem: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            f.write_str(&self.problem)
        } else {
            write!(f, "{}: {}", self.location, self.problem)
        }
    }
}

/// The complete list of violations found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    inner: Vec<Violation>,
}

impl Violations {
    pub fn push(&mut self, location: impl Into<String>, problem: impl Into<String>) {
        self.inner.push(Violation {
            location: location.into(),
            problem: problem.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> + '_ {
        self.inner.iter()
    }

    /// Turn the collected violations into an error, if there are any.
    pub(crate) fn finish<T, E>(self, value: T, f: impl FnOnce(Self) -> E) -> Result<T, E> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(f(self))
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.len() == 1 { "" } else { "s" };
        write!(f, "{} violation{}", self.len(), suffix)?;
        for violation in &self.inner {
            write!(f, "\n  - {}", violation)?;
        }
        Ok(())
    }
}

/// Human readable name of a JSON value's type.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value::*;
    match value {
        Null => "null",
        Bool(..) => "a boolean",
        Number(..) => "a number",
        String(..) => "a string",
        Array(..) => "a list",
        Object(..) => "an object",
    }
}
