//! Quoted terminal literals for the Happy token table and rule bodies.

use crate::{
    schema::{Schema, ValuedToken},
    util::display_fn,
};
use std::fmt;

/// Recover the literal text matched by a token's regular expression.
///
/// Alex string quotes are dropped and `\x` escapes resolve to `x`. A
/// trailing lone backslash is kept as is.
pub fn literal_text(regex: &str) -> String {
    let mut literal = String::with_capacity(regex.len());
    let mut chars = regex.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => continue,
            '\\' => literal.push(chars.next().unwrap_or('\\')),
            ch => literal.push(ch),
        }
    }
    literal
}

/// Quote the literal text as a Happy terminal, e.g. `'if'`.
pub fn quote(literal: &str) -> impl fmt::Display + '_ {
    display_fn(move |f| {
        f.write_str("'")?;
        for ch in literal.chars() {
            match ch {
                '\\' => f.write_str("\\\\")?,
                '\'' => f.write_str("\\'")?,
                ch => write!(f, "{}", ch)?,
            }
        }
        f.write_str("'")
    })
}

/// Render a token reference appearing in a rule body.
pub fn terminal<'a>(schema: &'a Schema, token: &'a str) -> impl fmt::Display + 'a {
    display_fn(move |f| {
        if ValuedToken::is_valued(token) {
            return f.write_str(token);
        }
        match schema.get(token) {
            Some(entry) => write!(f, "{}", quote(&literal_text(&entry.regex))),
            None => write!(f, "{}", quote(token)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NameRegex;

    #[test]
    fn literal_from_regex() {
        assert_eq!(literal_text("if"), "if");
        assert_eq!(literal_text("\"while\""), "while");
        assert_eq!(literal_text("\\/"), "/");
        assert_eq!(literal_text("\\\\"), "\\");
        assert_eq!(literal_text("\\("), "(");
        assert_eq!(literal_text("a\\"), "a\\");
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("if").to_string(), "'if'");
        assert_eq!(quote("\\").to_string(), "'\\\\'");
        assert_eq!(quote("'").to_string(), "'\\''");
        assert_eq!(quote("/").to_string(), "'/'");
    }

    #[test]
    fn terminals() {
        let schema = Schema::new([
            NameRegex::new("SLASH", "\\/"),
            NameRegex::new("BACKSLASH", "\\\\"),
            NameRegex::new("ID", "[a-z]+"),
        ])
        .unwrap();
        assert_eq!(terminal(&schema, "SLASH").to_string(), "'/'");
        assert_eq!(terminal(&schema, "BACKSLASH").to_string(), "'\\\\'");
        assert_eq!(terminal(&schema, "ID").to_string(), "ID");
        assert_eq!(terminal(&schema, "FLOAT").to_string(), "FLOAT");
        assert_eq!(terminal(&schema, "(").to_string(), "'('");
    }
}
