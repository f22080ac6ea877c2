use anyhow::Context as _;
use clap::Parser;
use happygen::{build::Build, seed::DEFAULT_SENTINEL};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

/// Generate an Alex lexer (.x) and a Happy parser (.y) specification.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The token schema, `{"keywords": [{"name": .., "regex": ..}, ..]}`.
    #[arg(long, value_name = "TOKENS.json")]
    tokens: PathBuf,

    /// The grammar-rule document.
    #[arg(long, value_name = "RULES.json")]
    rules: PathBuf,

    /// The seed file providing the Haskell prologue/epilogue of the lexer.
    #[arg(long, value_name = "LEXER.in.hs")]
    lexer_seed: PathBuf,

    /// The seed file of the parser. Defaults to the lexer seed.
    #[arg(long, value_name = "PARSER.in.hs")]
    parser_seed: Option<PathBuf>,

    /// Specify the path of generated .x file.
    #[arg(long, value_name = "LEXER.x")]
    alex_output: PathBuf,

    /// Specify the path of generated .y file.
    #[arg(long, value_name = "PARSER.y")]
    happy_output: PathBuf,

    /// The marker separating prologue and epilogue in seed files.
    #[arg(long, default_value = DEFAULT_SENTINEL)]
    sentinel: String,

    /// Do not write anything, fail if the outputs are not up to date.
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("parsed CLI args = {:?}", args);

    let mut build = Build::new(
        &args.tokens,
        &args.rules,
        &args.lexer_seed,
        &args.alex_output,
        &args.happy_output,
    )
    .sentinel(&args.sentinel);
    if let Some(parser_seed) = &args.parser_seed {
        build = build.parser_seed(parser_seed);
    }

    if args.check {
        let stale = build.check().context("errored during generation")?;
        if stale.is_empty() {
            return Ok(ExitCode::SUCCESS);
        }
        for path in &stale {
            eprintln!("{} is not up to date", path.display());
        }
        return Ok(ExitCode::FAILURE);
    }

    build.process().context("errored during generation")?;

    Ok(ExitCode::SUCCESS)
}
