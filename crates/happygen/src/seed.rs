//! Seed files: hand-maintained Haskell prologue/epilogue split by a marker.

use std::{fs, io, path::Path};

/// The marker separating the prologue from the epilogue.
pub const DEFAULT_SENTINEL: &str = "-- SEPARATOR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedParts {
    pub prologue: String,
    pub epilogue: String,
}

impl SeedParts {
    pub fn from_file(path: impl AsRef<Path>, sentinel: &str) -> Result<Self, SeedError> {
        let source = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => SeedError::NotFound,
            _ => SeedError::Io(err),
        })?;
        Self::split(&source, sentinel)
    }

    /// Split the seed text on the sentinel line, which must occur exactly once.
    ///
    /// A sentinel line is a line whose text, ignoring surrounding whitespace,
    /// equals the sentinel. Trailing whitespace of the prologue is replaced by
    /// a single newline, and leading whitespace of the epilogue is removed.
    pub fn split(source: &str, sentinel: &str) -> Result<Self, SeedError> {
        let sentinel = sentinel.trim();
        if sentinel.is_empty() {
            return Err(SeedError::EmptySentinel);
        }

        let mut offset = 0;
        let mut found = Vec::new();
        for line in source.split_inclusive('\n') {
            if line.trim() == sentinel {
                found.push((offset, offset + line.len()));
            }
            offset += line.len();
        }
        let (start, end) = match found[..] {
            [] => return Err(SeedError::MissingSentinel(sentinel.to_owned())),
            [span] => span,
            _ => {
                let count = found.len();
                return Err(SeedError::DuplicateSentinel(sentinel.to_owned(), count));
            }
        };

        let mut prologue = source[..start].trim_end().to_owned();
        prologue.push('\n');
        Ok(Self {
            prologue,
            epilogue: source[end..].trim_start().to_owned(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("the seed file does not exist")]
    NotFound,

    #[error("IO error: {}", _0)]
    Io(io::Error),

    #[error("the sentinel must not be empty")]
    EmptySentinel,

    #[error("missing sentinel `{}'", _0)]
    MissingSentinel(String),

    #[error("the sentinel `{}' occurs {} times, expected exactly once", _0, _1)]
    DuplicateSentinel(String, usize),
}
