//! Grammar-rule documents.

use crate::{
    rules::{Action, Alternative, Combinator, Derived, Element, Lhs, Rule, Variable},
    util::verify_symbol,
    validate::{kind_of, Violations},
};
use indexmap::IndexSet;
use serde_json::{Map, Value};
use std::{fs, io, path::Path};

/// An ordered, non-empty list of production rules.
///
/// The first rule conventionally denotes the start symbol.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let source = fs::read_to_string(path).map_err(GrammarError::Io)?;
        Self::from_str(&source)
    }

    pub fn from_str(source: &str) -> Result<Self, GrammarError> {
        let span = tracing::trace_span!("load_grammar");
        let _entered = span.enter();

        let document: Value = serde_json::from_str(source).map_err(GrammarError::Syntax)?;
        let grammar = Self::from_value(&document)?;
        tracing::debug!("loaded {} rules", grammar.rules.len());
        Ok(grammar)
    }

    fn from_value(document: &Value) -> Result<Self, GrammarError> {
        let mut violations = Violations::default();

        let entries = match document {
            Value::Array(entries) => &entries[..],
            other => {
                violations.push("", format!("expected a list, found {}", kind_of(other)));
                return Err(GrammarError::Invalid(violations));
            }
        };
        if entries.is_empty() {
            violations.push("", "a grammar must contain at least one rule");
        }

        let mut rules = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            // every entry is checked so that all violations are reported at once.
            if let Some(rule) = parse_rule(entry, &format!("[{}]", i), &mut violations) {
                rules.push(rule);
            }
        }

        violations.finish(Self { rules }, GrammarError::Invalid)
    }

    /// Build a grammar from already constructed rules, applying the same
    /// checks as the document loader.
    pub fn new<I>(rules: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let rules: Vec<Rule> = rules.into_iter().collect();
        let mut violations = Violations::default();
        if rules.is_empty() {
            violations.push("", "a grammar must contain at least one rule");
        }
        for (i, rule) in rules.iter().enumerate() {
            let location = format!("[{}]", i);
            check_symbol(&rule.lhs.symbol, &format!("{}.LHS", location), &mut violations);
            if let Derived::Choice(alternatives) = &rule.derived {
                if alternatives.is_empty() {
                    violations.push(format!("{}.derived.choice", location), "no alternatives");
                }
            }
            for var in rule.variables() {
                check_symbol(&var.name, &location, &mut violations);
            }
        }
        violations.finish(Self { rules }, GrammarError::Invalid)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The left-hand side of the first rule.
    pub fn start(&self) -> &Lhs {
        &self.rules[0].lhs
    }

    /// Nonterminals referenced from some right-hand side but never defined.
    pub fn undefined_variables(&self) -> Vec<&str> {
        let defined: IndexSet<&str> = self.rules.iter().map(|r| &*r.lhs.symbol).collect();
        let mut undefined = IndexSet::new();
        for rule in &self.rules {
            for var in rule.variables() {
                if !defined.contains(&*var.name) {
                    undefined.insert(&*var.name);
                }
            }
        }
        undefined.into_iter().collect()
    }
}

fn parse_rule(entry: &Value, location: &str, violations: &mut Violations) -> Option<Rule> {
    let fields = expect_object(entry, location, violations)?;
    check_fields(fields, &["LHS", "derived", "action"], location, violations);

    let lhs = expect_string(fields, "LHS", location, violations)
        .filter(|lhs| check_symbol(lhs, &format!("{}.LHS", location), violations))
        .map(Lhs::new);
    let action = parse_action(fields, location, violations);

    let derived_location = format!("{}.derived", location);
    let Some(derived) = fields.get("derived") else {
        violations.push(derived_location, "missing field");
        return None;
    };
    let derived = expect_object(derived, &derived_location, violations)?;
    let derived = match (derived.get("sequence"), derived.get("choice")) {
        (Some(sequence), None) if derived.len() == 1 => {
            let sequence_location = format!("{}.sequence", derived_location);
            let elements = parse_sequence(sequence, &sequence_location, violations);
            let action = match action {
                Ok(Some(action)) => action,
                Ok(None) => {
                    violations.push(
                        format!("{}.action", location),
                        "missing field (required by sequence rules)",
                    );
                    return None;
                }
                Err(()) => return None,
            };
            Derived::Sequence {
                elements: elements?,
                action,
            }
        }
        (None, Some(choice)) if derived.len() == 1 => {
            let choice_location = format!("{}.choice", derived_location);
            let mut alternatives = parse_choice(choice, &choice_location, violations)?;
            // a rule-level action is the default of alternatives lacking one.
            let default = action.ok()?;
            for alt in &mut alternatives {
                if alt.action.is_none() {
                    alt.action = default.clone();
                }
            }
            Derived::Choice(alternatives)
        }
        _ => {
            violations.push(
                derived_location,
                "expected exactly one of `sequence' or `choice'",
            );
            return None;
        }
    };

    Some(Rule { lhs: lhs?, derived })
}

fn parse_action(
    fields: &Map<String, Value>,
    location: &str,
    violations: &mut Violations,
) -> Result<Option<Action>, ()> {
    match fields.get("action") {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(Action::new(text.as_str()))),
        Some(other) => {
            violations.push(
                format!("{}.action", location),
                format!("expected a string, found {}", kind_of(other)),
            );
            Err(())
        }
    }
}

fn parse_sequence(
    sequence: &Value,
    location: &str,
    violations: &mut Violations,
) -> Option<Vec<Element>> {
    let leaves = expect_array(sequence, location, violations)?;
    let mut elements = Vec::with_capacity(leaves.len());
    let mut valid = true;
    for (i, leaf) in leaves.iter().enumerate() {
        let location = format!("{}[{}]", location, i);
        match parse_element(leaf, &location, violations) {
            Some(elem) => elements.push(elem),
            None => valid = false,
        }
    }
    valid.then_some(elements)
}

// `{"variable": V}` | `{"token": T}` | `{"parametrized": K, "variable": V}`
fn parse_element(leaf: &Value, location: &str, violations: &mut Violations) -> Option<Element> {
    let fields = expect_object(leaf, location, violations)?;
    let mut keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    keys.sort_unstable();
    match &keys[..] {
        ["variable"] => {
            let name = expect_string(fields, "variable", location, violations)?;
            check_symbol(name, &format!("{}.variable", location), violations)
                .then(|| Element::Variable(Variable::new(name)))
        }
        ["token"] => {
            let token = expect_string(fields, "token", location, violations)?;
            if token.is_empty() {
                violations.push(format!("{}.token", location), "empty token");
                return None;
            }
            Some(Element::Token(token.to_owned()))
        }
        ["parametrized", "variable"] => {
            let kind = expect_string(fields, "parametrized", location, violations);
            let name = expect_string(fields, "variable", location, violations)?;
            let kind = kind?;
            let Some(kind) = Combinator::from_name(kind) else {
                let known: Vec<_> = Combinator::ALL.iter().map(|c| c.name()).collect();
                violations.push(
                    format!("{}.parametrized", location),
                    format!("unknown combinator `{}' (expected one of {:?})", kind, known),
                );
                return None;
            };
            check_symbol(name, &format!("{}.variable", location), violations)
                .then(|| Element::Parametrized(kind, Variable::new(name)))
        }
        _ => {
            violations.push(
                location,
                "expected exactly one of `variable', `token' or `parametrized' + `variable'",
            );
            None
        }
    }
}

// `{"variable": V, "action"?: A}`
fn parse_choice(
    choice: &Value,
    location: &str,
    violations: &mut Violations,
) -> Option<Vec<Alternative>> {
    let entries = expect_array(choice, location, violations)?;
    if entries.is_empty() {
        violations.push(location, "no alternatives");
        return None;
    }
    let mut alternatives = Vec::with_capacity(entries.len());
    let mut valid = true;
    for (i, entry) in entries.iter().enumerate() {
        let location = format!("{}[{}]", location, i);
        match parse_alternative(entry, &location, violations) {
            Some(alt) => alternatives.push(alt),
            None => valid = false,
        }
    }
    valid.then_some(alternatives)
}

fn parse_alternative(
    entry: &Value,
    location: &str,
    violations: &mut Violations,
) -> Option<Alternative> {
    let fields = expect_object(entry, location, violations)?;
    check_fields(fields, &["variable", "action"], location, violations);
    let name = expect_string(fields, "variable", location, violations);
    let action = parse_action(fields, location, violations).ok()?;
    let name = name?;
    check_symbol(name, &format!("{}.variable", location), violations).then(|| Alternative {
        variable: Variable::new(name),
        action,
    })
}

fn expect_object<'v>(
    value: &'v Value,
    location: &str,
    violations: &mut Violations,
) -> Option<&'v Map<String, Value>> {
    match value {
        Value::Object(fields) => Some(fields),
        other => {
            violations.push(location, format!("expected an object, found {}", kind_of(other)));
            None
        }
    }
}

fn expect_array<'v>(
    value: &'v Value,
    location: &str,
    violations: &mut Violations,
) -> Option<&'v [Value]> {
    match value {
        Value::Array(items) => Some(items),
        other => {
            violations.push(location, format!("expected a list, found {}", kind_of(other)));
            None
        }
    }
}

fn expect_string<'v>(
    fields: &'v Map<String, Value>,
    key: &str,
    location: &str,
    violations: &mut Violations,
) -> Option<&'v str> {
    match fields.get(key) {
        Some(Value::String(s)) => Some(s),
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
    }
}

fn check_fields(
    fields: &Map<String, Value>,
    allowed: &[&str],
    location: &str,
    violations: &mut Violations,
) {
    for key in fields.keys() {
        if !allowed.contains(&key.as_str()) {
            violations.push(format!("{}.{}", location, key), "unexpected field");
        }
    }
}

fn check_symbol(symbol: &str, location: &str, violations: &mut Violations) -> bool {
    let ok = verify_symbol(symbol);
    if !ok {
        violations.push(location, format!("`{}' is not a valid nonterminal name", symbol));
    }
    ok
}

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("IO error: {}", _0)]
    Io(io::Error),

    #[error("invalid JSON: {}", _0)]
    Syntax(serde_json::Error),

    #[error("invalid grammar: {}", _0)]
    Invalid(Violations),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn violations(source: &str) -> Vec<String> {
        match Grammar::from_str(source) {
            Err(GrammarError::Invalid(violations)) => {
                violations.iter().map(ToString::to_string).collect()
            }
            other => panic!("expected violations, got {:?}", other),
        }
    }

    #[test]
    fn sequence_rule() {
        let grammar = Grammar::from_str(
            r#"[{"LHS": "stmt", "derived": {"sequence": [{"token": "IF"}]}, "action": "MakeIf"}]"#,
        )
        .unwrap();
        assert_eq!(
            grammar.rules(),
            [Rule::sequence("stmt", [Element::Token("IF".into())], "MakeIf")]
        );
        assert_eq!(grammar.start().symbol, "stmt");
    }

    #[test]
    fn all_element_kinds() {
        let grammar = Grammar::from_str(
            r#"[{
                "LHS": "stmts",
                "derived": {"sequence": [
                    {"variable": "stmt"},
                    {"token": ";"},
                    {"parametrized": "listof", "variable": "stmt"}
                ]},
                "action": "$1 : $3"
            }]"#,
        )
        .unwrap();
        assert_eq!(
            grammar.rules(),
            [Rule::sequence(
                "stmts",
                [
                    Element::Variable(Variable::new("stmt")),
                    Element::Token(";".into()),
                    Element::Parametrized(Combinator::ListOf, Variable::new("stmt")),
                ],
                "$1 : $3"
            )]
        );
    }

    #[test]
    fn choice_rule_actions() {
        let grammar = Grammar::from_str(
            r#"[
                {"LHS": "stmt", "derived": {"choice": [
                    {"variable": "stmt_if"},
                    {"variable": "stmt_while", "action": "While $1"}
                ]}},
                {"LHS": "expr", "derived": {"choice": [
                    {"variable": "lit"},
                    {"variable": "call", "action": "Call $1"}
                ]}, "action": "Expr $1"}
            ]"#,
        )
        .unwrap();
        let alt = |var: &str, action: Option<&str>| Alternative {
            variable: Variable::new(var),
            action: action.map(Action::new),
        };
        assert_eq!(
            grammar.rules(),
            [
                Rule::choice(
                    "stmt",
                    [alt("stmt_if", None), alt("stmt_while", Some("While $1"))]
                ),
                Rule::choice(
                    "expr",
                    [alt("lit", Some("Expr $1")), alt("call", Some("Call $1"))]
                ),
            ]
        );
    }

    #[test]
    fn object_instead_of_list() {
        assert_eq!(
            violations(r#"{"LHS": "stmt"}"#),
            ["expected a list, found an object"]
        );
    }

    #[test]
    fn empty_grammar() {
        assert_eq!(violations("[]"), ["a grammar must contain at least one rule"]);
    }

    #[test]
    fn neither_sequence_nor_choice() {
        assert_eq!(
            violations(r#"[{"LHS": "stmt", "derived": {"alternatives": []}, "action": "$1"}]"#),
            ["[0].derived: expected exactly one of `sequence' or `choice'"]
        );
        assert_eq!(
            violations(
                r#"[{"LHS": "stmt", "derived": {"sequence": [], "choice": []}, "action": "$1"}]"#
            ),
            ["[0].derived: expected exactly one of `sequence' or `choice'"]
        );
    }

    #[test]
    fn reports_every_bad_rule() {
        let found = violations(
            r#"[
                {"LHS": "ok", "derived": {"sequence": [{"token": "IF"}]}, "action": "$1"},
                {"derived": {"sequence": []}, "action": "$1"},
                {"LHS": "stmt", "derived": {"sequence": [{"token": "IF"}]}},
                {"LHS": "stmt", "derived": {"sequence": [{"variable": 1}, {"name": "x"}]}, "action": "$1"},
                {"LHS": "e", "derived": {"choice": []}},
                {"LHS": "e", "derived": {"sequence": [{"parametrized": "setof", "variable": "x"}]}, "action": "$1"},
                "rule"
            ]"#,
        );
        assert_eq!(
            found,
            [
                "[1].LHS: missing field",
                "[2].action: missing field (required by sequence rules)",
                "[3].derived.sequence[0].variable: expected a string, found a number",
                "[3].derived.sequence[1]: expected exactly one of `variable', `token' or `parametrized' + `variable'",
                "[4].derived.choice: no alternatives",
                "[5].derived.sequence[0].parametrized: unknown combinator `setof' (expected one of [\"optional\", \"listof\", \"ornull\", \"possibly_empty_arrayof\"])",
                "[6]: expected an object, found a string",
            ]
        );
    }

    #[test]
    fn rejects_bad_symbols() {
        assert_eq!(
            violations(r#"[{"LHS": "1st", "derived": {"choice": [{"variable": "a b"}]}}]"#),
            [
                "[0].LHS: `1st' is not a valid nonterminal name",
                "[0].derived.choice[0].variable: `a b' is not a valid nonterminal name",
            ]
        );
    }

    #[test]
    fn undefined_variables() {
        let grammar = Grammar::new([
            Rule::sequence(
                "program",
                [
                    Element::Variable(Variable::new("stmts")),
                    Element::Parametrized(Combinator::Optional, Variable::new("eof")),
                ],
                "$1",
            ),
            Rule::sequence("stmts", [Element::Variable(Variable::new("stmt"))], "$1"),
        ])
        .unwrap();
        assert_eq!(grammar.undefined_variables(), ["eof", "stmt"]);
    }
}
