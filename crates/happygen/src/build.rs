//! Generation runs over files on disk.

use crate::{
    artifact::{Artifact, ArtifactKind},
    codegen::{AlexCodegen, HappyCodegen},
    grammar::Grammar,
    lint::{self, Lint},
    schema::Schema,
    seed::{SeedParts, DEFAULT_SENTINEL},
    Error,
};
use std::path::{Path, PathBuf};

/// Render both artifacts from already loaded inputs.
pub fn render(
    schema: &Schema,
    grammar: &Grammar,
    lexer_seed: SeedParts,
    parser_seed: SeedParts,
) -> (Artifact, Artifact) {
    let alex = Artifact::new(ArtifactKind::Alex, lexer_seed, AlexCodegen::new(schema));
    let happy = Artifact::new(
        ArtifactKind::Happy,
        parser_seed,
        HappyCodegen::new(schema, grammar),
    );
    (alex, happy)
}

/// Both rendered artifacts of one run, not yet written.
#[derive(Debug)]
pub struct Generated {
    pub alex: Artifact,
    pub happy: Artifact,
    pub lints: Vec<Lint>,
}

/// The input and output paths of one generation run.
#[derive(Debug, Clone)]
pub struct Build {
    tokens: PathBuf,
    rules: PathBuf,
    lexer_seed: PathBuf,
    parser_seed: Option<PathBuf>,
    alex_output: PathBuf,
    happy_output: PathBuf,
    sentinel: String,
}

impl Build {
    pub fn new(
        tokens: impl Into<PathBuf>,
        rules: impl Into<PathBuf>,
        lexer_seed: impl Into<PathBuf>,
        alex_output: impl Into<PathBuf>,
        happy_output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tokens: tokens.into(),
            rules: rules.into(),
            lexer_seed: lexer_seed.into(),
            parser_seed: None,
            alex_output: alex_output.into(),
            happy_output: happy_output.into(),
            sentinel: DEFAULT_SENTINEL.to_owned(),
        }
    }

    /// Use a separate seed file for the grammar specification.
    ///
    /// Without one, the lexer seed is used for both artifacts.
    pub fn parser_seed(mut self, path: impl Into<PathBuf>) -> Self {
        self.parser_seed = Some(path.into());
        self
    }

    pub fn sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Load, validate and render everything without touching the outputs.
    pub fn generate(&self) -> Result<Generated, Error> {
        let span = tracing::debug_span!("generate");
        let _entered = span.enter();

        let schema = Schema::from_file(&self.tokens).map_err(|source| Error::Schema {
            path: self.tokens.clone(),
            source,
        })?;
        let grammar = Grammar::from_file(&self.rules).map_err(|source| Error::Grammar {
            path: self.rules.clone(),
            source,
        })?;
        let lexer_seed = self.load_seed(&self.lexer_seed)?;
        let parser_seed = match &self.parser_seed {
            Some(path) => self.load_seed(path)?,
            None => lexer_seed.clone(),
        };

        let mut lints = lint::check_schema(&schema);
        lints.extend(lint::check_grammar(&schema, &grammar));
        for lint in &lints {
            tracing::warn!("{}", lint);
        }

        let (alex, happy) = render(&schema, &grammar, lexer_seed, parser_seed);
        Ok(Generated { alex, happy, lints })
    }

    /// Generate and write both artifacts.
    ///
    /// Nothing is written unless every input is valid.
    pub fn process(&self) -> Result<Generated, Error> {
        let generated = self.generate()?;
        for (artifact, path) in self.outputs(&generated) {
            artifact.store(path).map_err(|source| Error::Io {
                path: path.to_owned(),
                source,
            })?;
        }
        tracing::info!(
            "generated {} and {}",
            self.alex_output.display(),
            self.happy_output.display()
        );
        Ok(generated)
    }

    /// Generate both artifacts and return the outputs whose content differs
    /// from what would be written.
    pub fn check(&self) -> Result<Vec<PathBuf>, Error> {
        let generated = self.generate()?;
        let mut stale = vec![];
        for (artifact, path) in self.outputs(&generated) {
            let up_to_date = artifact.is_up_to_date(path).map_err(|source| Error::Io {
                path: path.to_owned(),
                source,
            })?;
            if !up_to_date {
                stale.push(path.to_owned());
            }
        }
        Ok(stale)
    }

    fn outputs<'a>(&'a self, generated: &'a Generated) -> [(&'a Artifact, &'a Path); 2] {
        [
            (&generated.alex, &*self.alex_output),
            (&generated.happy, &*self.happy_output),
        ]
    }

    fn load_seed(&self, path: &Path) -> Result<SeedParts, Error> {
        SeedParts::from_file(path, &self.sentinel).map_err(|source| Error::Seed {
            path: path.to_owned(),
            source,
        })
    }
}
