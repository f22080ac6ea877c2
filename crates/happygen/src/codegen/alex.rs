//! Alex lexical specification.

use super::banner;
use crate::schema::{Schema, ValuedToken};
use std::fmt;

/// The sections of the lexical specification, in output order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AlexSection {
    Wrapper,
    Macros,
    WhiteSpaceMacro,
    RulesHeader,
    TokenRules,
    IgnoreWhiteSpace,
    ValuedRules,
    TokenType,
}

pub const ALEX_LAYOUT: [AlexSection; 8] = [
    AlexSection::Wrapper,
    AlexSection::Macros,
    AlexSection::WhiteSpaceMacro,
    AlexSection::RulesHeader,
    AlexSection::TokenRules,
    AlexSection::IgnoreWhiteSpace,
    AlexSection::ValuedRules,
    AlexSection::TokenType,
];

/// Valued tokens in lexer rule order. Alex resolves equal-length matches by
/// the first rule, so integers must precede strings and floats.
const ALEX_VALUED: [ValuedToken; 4] = [
    ValuedToken::Id,
    ValuedToken::Int,
    ValuedToken::Str,
    ValuedToken::Float,
];

const WRAPPER: &str = "%wrapper \"monadUserState\"\n";
const RAW_TOKEN: &str = "AlexRawToken";

/// Renders the body of an Alex `.x` file from a token schema.
///
/// The output ends inside an open `{` code block which the seed epilogue
/// is expected to close.
#[derive(Debug)]
pub struct AlexCodegen<'g> {
    schema: &'g Schema,
}

impl<'g> AlexCodegen<'g> {
    pub fn new(schema: &'g Schema) -> Self {
        Self { schema }
    }

    fn section(&self, f: &mut fmt::Formatter<'_>, section: AlexSection) -> fmt::Result {
        use AlexSection::*;
        match section {
            Wrapper => writeln!(f, "{}", WRAPPER),

            Macros => {
                for token in self.schema.tokens() {
                    writeln!(f, "@KW_{} = {}", token.name, token.regex)?;
                }
                Ok(())
            }

            WhiteSpaceMacro => {
                writeln!(f)?;
                write!(f, "{}", banner("white space"))?;
                writeln!(f, "@WHITE_SPACE = $white+")
            }

            RulesHeader => {
                writeln!(f)?;
                write!(f, "{}", banner("tokens"))?;
                writeln!(f, "tokens :-\n")
            }

            TokenRules => {
                for token in self.schema.literal_tokens() {
                    writeln!(f, "@KW_{0} {{ lex' {1}_{0} }}", token.name, RAW_TOKEN)?;
                }
                Ok(())
            }

            IgnoreWhiteSpace => {
                writeln!(f)?;
                write!(f, "{}", banner("whitespace ? do nothing"))?;
                writeln!(f, "\n@WHITE_SPACE ;")
            }

            ValuedRules => {
                writeln!(f)?;
                write!(f, "{}", banner("integers and identifiers"))?;
                writeln!(f)?;
                for valued in ALEX_VALUED {
                    let macro_name = format!("@KW_{}", valued);
                    writeln!(f, "{:<9} {{ {} }}", macro_name, lex_action(valued))?;
                }
                writeln!(f, "{:<9} {{ lexicalError }}", ".")?;
                writeln!(f)
            }

            TokenType => {
                writeln!(f, "{{")?;
                writeln!(f)?;
                write!(f, "{}", banner("Token"))?;
                writeln!(f, "data AlexTokenTag")?;
                writeln!(f, "   = AlexTokenTag")?;
                writeln!(f, "     {{")?;
                writeln!(f, "         tokenRaw :: {},", RAW_TOKEN)?;
                writeln!(f, "         tokenLoc :: Location")?;
                writeln!(f, "     }}")?;
                writeln!(f, "     deriving ( Show )")?;
                writeln!(f)?;
                write!(f, "{}", banner("Raw Token"))?;
                writeln!(f, "data {}", RAW_TOKEN)?;
                for (i, valued) in ALEX_VALUED.into_iter().enumerate() {
                    let sep = if i == 0 { '=' } else { '|' };
                    writeln!(f, "   {} {}_{} {}", sep, RAW_TOKEN, valued, value_type(valued))?;
                }
                for token in self.schema.literal_tokens() {
                    writeln!(f, "   | {}_{}", RAW_TOKEN, token.name)?;
                }
                writeln!(f, "   | TokenEOF")?;
                writeln!(f, "   deriving ( Show )")
            }
        }
    }
}

impl fmt::Display for AlexCodegen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = tracing::trace_span!("alex_codegen");
        let _entered = span.enter();

        for section in ALEX_LAYOUT {
            self.section(f, section)?;
        }
        Ok(())
    }
}

fn lex_action(valued: ValuedToken) -> String {
    match valued {
        ValuedToken::Id | ValuedToken::Str => format!("lex {}_{}", RAW_TOKEN, valued),
        // numbers are parsed and rounded to an integer.
        ValuedToken::Int | ValuedToken::Float => {
            format!("lex ({}_{} . round . read)", RAW_TOKEN, valued)
        }
    }
}

fn value_type(valued: ValuedToken) -> &'static str {
    match valued {
        ValuedToken::Id | ValuedToken::Str => "String",
        ValuedToken::Int | ValuedToken::Float => "Int",
    }
}
