use std::fmt;

pub fn display_fn<F>(f: F) -> impl fmt::Display
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    struct DisplayFn<F> {
        f: F,
    }
    impl<F> fmt::Display for DisplayFn<F>
    where
        F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
    {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            (self.f)(formatter)
        }
    }
    DisplayFn { f }
}

/// Check whether the string can be used as a Happy nonterminal name.
pub fn verify_symbol(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_ident_start(first) => chars.all(is_ident_continue),
        _ => false,
    }
}

/// Check whether the string can be appended to a macro or constructor prefix
/// such as `@KW_` or `AlexRawToken_`.
///
/// Alex macro names are restricted to ASCII.
pub fn verify_suffix(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '\'')
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || unicode_ident::is_xid_start(ch)
}

fn is_ident_continue(ch: char) -> bool {
    // Haskell allows primes in identifiers.
    ch == '\'' || unicode_ident::is_xid_continue(ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols() {
        assert!(verify_symbol("stmt"));
        assert!(verify_symbol("_stmt'"));
        assert!(verify_symbol("Stmt_Namespace"));
        assert!(!verify_symbol(""));
        assert!(!verify_symbol("1stmt"));
        assert!(!verify_symbol("listof(stmt)"));
    }

    #[test]
    fn suffixes() {
        assert!(verify_suffix("IF"));
        assert!(verify_suffix("1"));
        assert!(!verify_suffix(""));
        assert!(verify_suffix("LEFT_PAREN'"));
        assert!(!verify_suffix("LEFT PAREN"));
        assert!(!verify_suffix("ÉTAT"));
        assert!(!verify_suffix("λ"));
    }
}
