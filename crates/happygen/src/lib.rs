//! Generator of Alex lexer and Happy parser specifications from a JSON token
//! schema and a JSON grammar-rule document.

pub mod artifact;
pub mod build;
pub mod codegen;
pub mod grammar;
pub mod lint;
pub mod rules;
pub mod schema;
pub mod seed;
pub mod util;
pub mod validate;

use std::{io, path::PathBuf};

/// Failure of a generation run, naming the document at fault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load token schema {}", .path.display())]
    Schema {
        path: PathBuf,
        source: schema::SchemaError,
    },

    #[error("failed to load grammar rules {}", .path.display())]
    Grammar {
        path: PathBuf,
        source: grammar::GrammarError,
    },

    #[error("failed to load seed file {}", .path.display())]
    Seed {
        path: PathBuf,
        source: seed::SeedError,
    },

    #[error("IO error on {}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn cause_is_reported_once() {
        let err = Error::Seed {
            path: PathBuf::from("Lexer.in.hs"),
            source: seed::SeedError::MissingSentinel("-- SEPARATOR".into()),
        };
        assert_eq!(err.to_string(), "failed to load seed file Lexer.in.hs");
        let cause = err.source().map(|source| source.to_string());
        assert_eq!(cause.as_deref(), Some("missing sentinel `-- SEPARATOR'"));
    }
}
