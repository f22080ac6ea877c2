//! Token schema: the named lexical categories and their regular expressions.

use crate::{
    util::verify_suffix,
    validate::{kind_of, Violations},
};
use indexmap::IndexMap;
use serde_json::Value;
use std::{fmt, fs, io, path::Path};

/// The four terminal kinds that carry a parsed value.
///
/// These are hard-wired into both generated artifacts with their own
/// conversion semantics, and never get the per-token treatment that named
/// literal tokens get.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValuedToken {
    Id,
    Str,
    Int,
    Float,
}

impl ValuedToken {
    pub const ALL: [Self; 4] = [Self::Id, Self::Str, Self::Int, Self::Float];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Str => "STR",
            Self::Int => "INT",
            Self::Float => "FLOAT",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|valued| valued.name() == name)
    }

    pub fn is_valued(name: &str) -> bool {
        Self::from_name(name).is_some()
    }
}

impl fmt::Display for ValuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A named token category and the regular expression recognizing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRegex {
    pub name: String,
    pub regex: String,
}

impl NameRegex {
    pub fn new(name: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regex: regex.into(),
        }
    }

    pub fn valued(&self) -> Option<ValuedToken> {
        ValuedToken::from_name(&self.name)
    }
}

/// A validated token schema, in document order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tokens: IndexMap<String, NameRegex>,
}

impl Schema {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let source = fs::read_to_string(path).map_err(SchemaError::Io)?;
        Self::from_str(&source)
    }

    pub fn from_str(source: &str) -> Result<Self, SchemaError> {
        let span = tracing::trace_span!("load_schema");
        let _entered = span.enter();

        let document: Value = serde_json::from_str(source).map_err(SchemaError::Syntax)?;
        let schema = Self::from_value(&document)?;
        tracing::debug!("loaded {} tokens", schema.len());
        Ok(schema)
    }

    fn from_value(document: &Value) -> Result<Self, SchemaError> {
        let mut violations = Violations::default();

        let keywords: &[Value] = match document {
            Value::Object(fields) => match fields.get("keywords") {
                Some(Value::Array(keywords)) => &keywords[..],
                Some(other) => {
                    let problem = format!("expected a list, found {}", kind_of(other));
                    violations.push("keywords", problem);
                    &[]
                }
                None => {
                    violations.push("keywords", "missing field");
                    &[]
                }
            },
            other => {
                violations.push("", format!("expected an object, found {}", kind_of(other)));
                &[]
            }
        };

        let mut tokens = vec![];
        for (i, entry) in keywords.iter().enumerate() {
            let location = format!("keywords[{}]", i);
            let Some(fields) = entry.as_object() else {
                violations.push(location, format!("expected an object, found {}", kind_of(entry)));
                continue;
            };
            let mut field = |key: &str| match fields.get(key) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => {
                    violations.push(
                        format!("{}.{}", location, key),
                        format!("expected a string, found {}", kind_of(other)),
                    );
                    None
                }
                None => {
                    violations.push(format!("{}.{}", location, key), "missing field");
                    None
                }
            };
            let name = field("name");
            let regex = field("regex");
            if let (Some(name), Some(regex)) = (name, regex) {
                tokens.push((location, NameRegex { name, regex }));
            }
        }

        let schema = Self::collect(tokens, &mut violations);
        violations.finish(schema, SchemaError::Invalid)
    }

    /// Build a schema from already constructed entries, applying the same
    /// name checks as the document loader.
    pub fn new<I>(tokens: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = NameRegex>,
    {
        let mut violations = Violations::default();
        let tokens = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| (format!("tokens[{}]", i), token));
        let schema = Self::collect(tokens, &mut violations);
        violations.finish(schema, SchemaError::Invalid)
    }

    fn collect<I>(tokens: I, violations: &mut Violations) -> Self
    where
        I: IntoIterator<Item = (String, NameRegex)>,
    {
        let mut schema = Self::default();
        let mut locations = IndexMap::<String, String>::new();
        for (location, token) in tokens {
            if !verify_suffix(&token.name) {
                violations.push(
                    format!("{}.name", location),
                    format!("`{}' is not a valid token name", token.name),
                );
                continue;
            }
            if let Some(first) = locations.get(&token.name) {
                violations.push(
                    format!("{}.name", location),
                    format!("duplicate token name `{}' (first declared at {})", token.name, first),
                );
                continue;
            }
            locations.insert(token.name.clone(), location);
            schema.tokens.insert(token.name.clone(), token);
        }
        schema
    }

    /// All tokens in document order.
    pub fn tokens(&self) -> impl Iterator<Item = &NameRegex> + '_ {
        self.tokens.values()
    }

    /// Tokens rendered as fixed literals, i.e. everything but the valued ones.
    pub fn literal_tokens(&self) -> impl Iterator<Item = &NameRegex> + '_ {
        self.tokens().filter(|token| token.valued().is_none())
    }

    pub fn get(&self, name: &str) -> Option<&NameRegex> {
        self.tokens.get(name)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("IO error: {}", _0)]
    Io(io::Error),

    #[error("invalid JSON: {}", _0)]
    Syntax(serde_json::Error),

    #[error("invalid token schema: {}", _0)]
    Invalid(Violations),
}
