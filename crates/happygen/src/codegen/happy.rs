//! Happy grammar specification.

use super::{
    banner,
    literal::{literal_text, quote},
};
use crate::{
    grammar::Grammar,
    rules::Combinator,
    schema::{Schema, ValuedToken},
};
use std::fmt;

/// The sections of the grammar specification, in output order.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HappySection {
    EntryPoint,
    TokenType,
    Monad,
    Lexer,
    ErrorHandler,
    TokenTable,
    ValuedTokens,
    GrammarStart,
    Combinators,
    Rules,
}

pub const HAPPY_LAYOUT: [HappySection; 10] = [
    HappySection::EntryPoint,
    HappySection::TokenType,
    HappySection::Monad,
    HappySection::Lexer,
    HappySection::ErrorHandler,
    HappySection::TokenTable,
    HappySection::ValuedTokens,
    HappySection::GrammarStart,
    HappySection::Combinators,
    HappySection::Rules,
];

const TOKEN_TAG: &str = "AlexTokenTag";
const RAW_TOKEN: &str = "AlexRawToken";

/// Renders the body of a Happy `.y` file from a token schema and rules.
#[derive(Debug)]
pub struct HappyCodegen<'g> {
    schema: &'g Schema,
    grammar: &'g Grammar,
}

impl<'g> HappyCodegen<'g> {
    pub fn new(schema: &'g Schema, grammar: &'g Grammar) -> Self {
        Self { schema, grammar }
    }

    fn section(&self, f: &mut fmt::Formatter<'_>, section: HappySection) -> fmt::Result {
        use HappySection::*;
        match section {
            EntryPoint => {
                writeln!(f)?;
                write!(f, "{}", banner("API function: parse"))?;
                writeln!(f, "%name parse")
            }

            TokenType => {
                writeln!(f)?;
                write!(f, "{}", banner("token type"))?;
                writeln!(f, "%tokentype {{ {} }}", TOKEN_TAG)
            }

            Monad => {
                writeln!(f)?;
                write!(f, "{}", banner("monad"))?;
                writeln!(f, "%monad {{ Alex }}")
            }

            Lexer => {
                writeln!(f)?;
                write!(f, "{}", banner("lexer"))?;
                writeln!(f, "%lexer {{ lexwrap }} {{ {} TokenEOF _ }}", TOKEN_TAG)
            }

            ErrorHandler => {
                writeln!(f)?;
                write!(f, "{}", banner("Call this function when an error is encountered"))?;
                writeln!(f, "%error {{ parseError }}")
            }

            TokenTable => {
                writeln!(f, "\n%token\n")?;
                for token in self.schema.literal_tokens() {
                    writeln!(
                        f,
                        "{} {{ {} {}_{} _ }}",
                        quote(&literal_text(&token.regex)),
                        TOKEN_TAG,
                        RAW_TOKEN,
                        token.name
                    )?;
                }
                Ok(())
            }

            ValuedTokens => {
                writeln!(f)?;
                write!(f, "{}", banner("integers and identifiers"))?;
                writeln!(f)?;
                for valued in ValuedToken::ALL {
                    writeln!(
                        f,
                        "{:<6} {{ {} ({}_{} {}) _ }}",
                        valued.name(),
                        TOKEN_TAG,
                        RAW_TOKEN,
                        valued,
                        binder(valued)
                    )?;
                }
                Ok(())
            }

            GrammarStart => {
                writeln!(f)?;
                write!(f, "{}", banner("grammar specification"))?;
                writeln!(f, "%%")
            }

            Combinators => {
                writeln!(f)?;
                write!(f, "{}", banner("parametrized rules"))?;
                writeln!(f)?;
                for kind in Combinator::ALL {
                    writeln!(f, "{}", kind.definition())?;
                }
                Ok(())
            }

            Rules => {
                writeln!(f)?;
                write!(f, "{}", banner("program"))?;
                for (i, rule) in self.grammar.rules().iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", rule.display(self.schema))?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for HappyCodegen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = tracing::trace_span!("happy_codegen");
        let _entered = span.enter();

        for section in HAPPY_LAYOUT {
            self.section(f, section)?;
        }
        Ok(())
    }
}

fn binder(valued: ValuedToken) -> &'static str {
    match valued {
        ValuedToken::Id => "id",
        ValuedToken::Str => "s",
        ValuedToken::Int => "i",
        ValuedToken::Float => "f",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rules::{Alternative, Element, Rule, Variable},
        schema::NameRegex,
    };
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        Schema::new([
            NameRegex::new("IF", "if"),
            NameRegex::new("SLASH", "\\/"),
            NameRegex::new("STRING_QUOTE", "\"'\""),
            NameRegex::new("ID", "[a-z]+"),
            NameRegex::new("INT", "[0-9]+"),
        ])
        .unwrap()
    }

    #[test]
    fn token_table() {
        let grammar = Grammar::new([Rule::sequence(
            "stmt",
            [Element::Token("IF".into())],
            "MakeIf",
        )])
        .unwrap();
        let schema = schema();
        let out = HappyCodegen::new(&schema, &grammar).to_string();
        let table: Vec<_> = out
            .lines()
            .skip_while(|l| *l != "%token")
            .skip(2)
            .take_while(|l| !l.is_empty())
            .collect();
        assert_eq!(
            table,
            [
                "'if' { AlexTokenTag AlexRawToken_IF _ }",
                "'/' { AlexTokenTag AlexRawToken_SLASH _ }",
                "'\\'' { AlexTokenTag AlexRawToken_STRING_QUOTE _ }",
            ]
        );
        for valued in ValuedToken::ALL {
            let decl = format!("{:<6} {{ AlexTokenTag (AlexRawToken_{} ", valued.name(), valued);
            assert_eq!(out.lines().filter(|l| l.starts_with(&decl)).count(), 1);
        }
    }

    #[test]
    fn keyword_rule_scenario() {
        let grammar = Grammar::new([Rule::sequence(
            "stmt",
            [Element::Token("IF".into())],
            "MakeIf",
        )])
        .unwrap();
        let schema = schema();
        let out = HappyCodegen::new(&schema, &grammar).to_string();
        assert!(out.ends_with("stmt: 'if'\n{\nMakeIf\n}\n"), "{}", out);
    }

    #[test]
    fn preserves_rule_order() {
        let grammar = Grammar::new([
            Rule::sequence("program", [Element::Variable(Variable::new("stmt"))], "$1"),
            Rule::choice(
                "stmt",
                [
                    Alternative {
                        variable: Variable::new("stmt_if"),
                        action: None,
                    },
                    Alternative {
                        variable: Variable::new("stmt_expr"),
                        action: None,
                    },
                ],
            ),
            Rule::sequence(
                "stmt_if",
                [
                    Element::Token("IF".into()),
                    Element::Token("INT".into()),
                    Element::Token("SLASH".into()),
                ],
                "If $2",
            ),
        ])
        .unwrap();
        let schema = schema();
        let out = HappyCodegen::new(&schema, &grammar).to_string();
        let rules = &out[out.find("* program *").unwrap()..];
        let program = rules.find("program: stmt\n").unwrap();
        let stmt = rules.find("stmt:\nstmt_if { $1 } |\nstmt_expr { $1 }\n").unwrap();
        let stmt_if = rules.find("stmt_if: 'if' INT '/'\n{\nIf $2\n}\n").unwrap();
        assert!(program < stmt && stmt < stmt_if);
    }

    #[test]
    fn header_order() {
        let grammar = Grammar::new([Rule::sequence("unit", [], "()")]).unwrap();
        let schema = Schema::default();
        let out = HappyCodegen::new(&schema, &grammar).to_string();
        let position = |needle: &str| out.find(needle).unwrap();
        let positions = [
            position("%name parse"),
            position("%tokentype { AlexTokenTag }"),
            position("%monad { Alex }"),
            position("%lexer { lexwrap } { AlexTokenTag TokenEOF _ }"),
            position("%error { parseError }"),
            position("%token\n"),
            position("ID     { AlexTokenTag (AlexRawToken_ID id) _ }"),
            position("%%"),
            position("listof(a): a { [$1] } | a listof(a) { $1:$2 }"),
            position("unit:\n{\n()\n}\n"),
        ];
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", out);
    }
}
