//! Assembly of the final `.x`/`.y` files.

use crate::seed::SeedParts;
use std::{
    fmt, fs,
    io::{self, Write as _},
    path::Path,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Lexical specification. The generated body leaves a `{` block open
    /// which the epilogue closes.
    Alex,
    /// Grammar specification. The epilogue gets its own `{ }` block.
    Happy,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alex => f.write_str("lexical specification"),
            Self::Happy => f.write_str("grammar specification"),
        }
    }
}

/// A rendered body spliced between the prologue and epilogue of a seed.
#[derive(Debug, Clone)]
pub struct Artifact {
    kind: ArtifactKind,
    seed: SeedParts,
    body: String,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, seed: SeedParts, body: impl fmt::Display) -> Self {
        Self {
            kind,
            seed,
            body: body.to_string(),
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Write the artifact.
    ///
    /// An existing file is replaced only once the new content is complete,
    /// and keeps its permissions. A new file is created with the default
    /// permissions of the process.
    pub fn store(&self, path: &Path) -> io::Result<()> {
        match fs::metadata(path) {
            Ok(metadata) => self.replace(path, metadata.permissions())?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => self.create(path)?,
            Err(err) => return Err(err),
        }
        tracing::debug!("wrote {} to {}", self.kind, path.display());
        Ok(())
    }

    fn replace(&self, path: &Path, permissions: fs::Permissions) -> io::Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        write!(file, "{}", self)?;
        file.as_file().set_permissions(permissions)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    fn create(&self, path: &Path) -> io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        let written = write!(file, "{}", self).and_then(|()| file.sync_all());
        if written.is_err() {
            // remove the partial output.
            let _ = fs::remove_file(path);
        }
        written
    }

    /// Whether the file at `path` already holds exactly this artifact.
    pub fn is_up_to_date(&self, path: &Path) -> io::Result<bool> {
        match fs::read_to_string(path) {
            Ok(current) => Ok(current == self.to_string()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{\n{}\n}}\n", self.seed.prologue)?;
        writeln!(f, "{}\n", self.body)?;
        match self.kind {
            ArtifactKind::Alex => writeln!(f, "{}}}", self.seed.epilogue),
            ArtifactKind::Happy => writeln!(f, "{{\n{}}}", self.seed.epilogue),
        }
    }
}
