//! Cross-document checks that do not fail a build.

use crate::{
    codegen::literal::literal_text,
    grammar::Grammar,
    schema::{Schema, ValuedToken},
};
use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lint {
    /// A rule refers to a token that is neither declared in the schema nor
    /// the literal text of a declared token.
    UnknownToken { lhs: String, token: String },

    /// A nonterminal is used but never appears as a left-hand side.
    UndefinedVariable(String),

    /// A valued token has no macro in the schema, so its lexer rule refers
    /// to an undefined macro.
    MissingValuedToken(ValuedToken),

    /// Two tokens quote to the same literal in the token table.
    DuplicateLiteral {
        literal: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownToken { lhs, token } => write!(
                f,
                "rule `{}' refers to the token `{}' which is not declared in the token schema",
                lhs, token
            ),
            Self::UndefinedVariable(name) => {
                write!(f, "the nonterminal `{}' has no associated production rule", name)
            }
            Self::MissingValuedToken(valued) => {
                write!(f, "the token schema does not define the valued token `{}'", valued)
            }
            Self::DuplicateLiteral {
                literal,
                first,
                second,
            } => write!(
                f,
                "the tokens `{}' and `{}' share the literal `{}'",
                first, second, literal
            ),
        }
    }
}

/// Check the token schema on its own.
pub fn check_schema(schema: &Schema) -> Vec<Lint> {
    let mut lints = vec![];

    for valued in ValuedToken::ALL {
        if schema.get(valued.name()).is_none() {
            lints.push(Lint::MissingValuedToken(valued));
        }
    }

    let mut literals = IndexMap::<String, &str>::new();
    for token in schema.literal_tokens() {
        let literal = literal_text(&token.regex);
        match literals.get(&literal) {
            Some(first) => lints.push(Lint::DuplicateLiteral {
                literal,
                first: first.to_string(),
                second: token.name.clone(),
            }),
            None => {
                literals.insert(literal, &token.name);
            }
        }
    }

    lints
}

/// Check the rules against the token schema they are rendered with.
pub fn check_grammar(schema: &Schema, grammar: &Grammar) -> Vec<Lint> {
    let literals: Vec<String> = schema
        .literal_tokens()
        .map(|token| literal_text(&token.regex))
        .collect();

    let mut lints = vec![];
    for rule in grammar.rules() {
        for token in rule.tokens() {
            let known = ValuedToken::is_valued(token)
                || schema.get(token).is_some()
                || literals.iter().any(|literal| literal == token);
            if !known {
                lints.push(Lint::UnknownToken {
                    lhs: rule.lhs.symbol.clone(),
                    token: token.to_owned(),
                });
            }
        }
    }
    lints.extend(
        grammar
            .undefined_variables()
            .into_iter()
            .map(|name| Lint::UndefinedVariable(name.to_owned())),
    );
    lints
}
