//! Rule element model.

use crate::{codegen::literal, schema::Schema, util::display_fn};
use std::fmt;

/// The left-hand side nonterminal of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lhs {
    pub symbol: String,
}

impl Lhs {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl fmt::Display for Lhs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// A reference to another nonterminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The generic rules every generated grammar defines, applicable to a
/// nonterminal as `kind(inner)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Combinator {
    Optional,
    ListOf,
    OrNull,
    PossiblyEmptyArrayOf,
}

impl Combinator {
    pub const ALL: [Self; 4] = [
        Self::Optional,
        Self::ListOf,
        Self::OrNull,
        Self::PossiblyEmptyArrayOf,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Optional => "optional",
            Self::ListOf => "listof",
            Self::OrNull => "ornull",
            Self::PossiblyEmptyArrayOf => "possibly_empty_arrayof",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// The parametrized production defining this combinator.
    pub const fn definition(self) -> &'static str {
        match self {
            Self::Optional => "optional(a): { Nothing } | a { Just $1 }",
            Self::ListOf => "listof(a): a { [$1] } | a listof(a) { $1:$2 }",
            Self::OrNull => "ornull(a): 'null' { Nothing } | a { Just $1 }",
            Self::PossiblyEmptyArrayOf => {
                "possibly_empty_arrayof(a): 'array' '(' ')' { [] } \
                 | 'array' '(' listof(a) ')' { $3 }"
            }
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single element on the right-hand side of a sequence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Variable(Variable),
    Token(String),
    Parametrized(Combinator, Variable),
}

impl Element {
    /// `ID` for valued tokens, `'literal'` for everything else.
    ///
    /// A token naming an entry of the schema is rendered as that entry's
    /// literal text, otherwise the token text itself is the literal.
    pub fn display<'a>(&'a self, schema: &'a Schema) -> impl fmt::Display + 'a {
        display_fn(move |f| match self {
            Self::Variable(var) => write!(f, "{}", var),
            Self::Token(token) => write!(f, "{}", literal::terminal(schema, token)),
            Self::Parametrized(kind, var) => write!(f, "{}({})", kind, var),
        })
    }
}

/// Opaque target-language expression placed in an action block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub text: String,
}

impl Action {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Yields the value of the first matched element.
    pub fn first() -> Self {
        Self::new("$1")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One alternative of a choice rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternative {
    pub variable: Variable,
    pub action: Option<Action>,
}

/// The body of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derived {
    /// A single right-hand side followed by one action block.
    Sequence {
        elements: Vec<Element>,
        action: Action,
    },
    /// Several right-hand sides, each with its own inline action.
    Choice(Vec<Alternative>),
}

/// A production rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub lhs: Lhs,
    pub derived: Derived,
}

impl Rule {
    pub fn sequence<I>(lhs: &str, elements: I, action: &str) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        Self {
            lhs: Lhs::new(lhs),
            derived: Derived::Sequence {
                elements: elements.into_iter().collect(),
                action: Action::new(action),
            },
        }
    }

    pub fn choice<I>(lhs: &str, alternatives: I) -> Self
    where
        I: IntoIterator<Item = Alternative>,
    {
        Self {
            lhs: Lhs::new(lhs),
            derived: Derived::Choice(alternatives.into_iter().collect()),
        }
    }

    /// Every nonterminal referenced from the right-hand side.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        let (elements, alternatives): (&[Element], &[Alternative]) = match &self.derived {
            Derived::Sequence { elements, .. } => (elements, &[]),
            Derived::Choice(alternatives) => (&[], alternatives),
        };
        elements
            .iter()
            .filter_map(|elem| match elem {
                Element::Variable(var) | Element::Parametrized(_, var) => Some(var),
                Element::Token(..) => None,
            })
            .chain(alternatives.iter().map(|alt| &alt.variable))
    }

    /// Every token referenced from the right-hand side.
    pub fn tokens(&self) -> impl Iterator<Item = &str> + '_ {
        let elements: &[Element] = match &self.derived {
            Derived::Sequence { elements, .. } => elements,
            Derived::Choice(..) => &[],
        };
        elements.iter().filter_map(|elem| match elem {
            Element::Token(token) => Some(&**token),
            _ => None,
        })
    }

    // sequence:
    //   `lhs: E1 E2 E3`
    //   `{`
    //   `action`
    //   `}`
    // choice:
    //   `lhs:`
    //   `A1 { action } |`
    //   `A2 { $1 }`
    pub fn display<'a>(&'a self, schema: &'a Schema) -> impl fmt::Display + 'a {
        display_fn(move |f| match &self.derived {
            Derived::Sequence { elements, action } => {
                write!(f, "{}:", self.lhs)?;
                for elem in elements {
                    write!(f, " {}", elem.display(schema))?;
                }
                writeln!(f)?;
                writeln!(f, "{{\n{}\n}}", action)
            }
            Derived::Choice(alternatives) => {
                writeln!(f, "{}:", self.lhs)?;
                for (i, alt) in alternatives.iter().enumerate() {
                    if i > 0 {
                        writeln!(f, " |")?;
                    }
                    let action = alt.action.clone().unwrap_or_else(Action::first);
                    write!(f, "{} {{ {} }}", alt.variable, action)?;
                }
                writeln!(f)
            }
        })
    }
}
