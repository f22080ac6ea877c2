//! Rendering of the generated Alex and Happy specifications.
//!
//! Each artifact is an ordered composition of sections. The layout arrays
//! are the single place defining in which order the sections appear.

pub mod alex;
pub mod happy;
pub mod literal;

pub use self::{alex::AlexCodegen, happy::HappyCodegen};

use crate::util::display_fn;
use std::fmt;

/// Haskell comment box used as a section header.
///
/// ```text
/// -- *********
/// -- *       *
/// -- * Token *
/// -- *       *
/// -- *********
/// ```
pub fn banner(title: &str) -> impl fmt::Display + '_ {
    display_fn(move |f| {
        let width = title.chars().count();
        let edge = "*".repeat(width + 4);
        let blank = " ".repeat(width + 2);
        writeln!(f, "-- {}", edge)?;
        writeln!(f, "-- *{}*", blank)?;
        writeln!(f, "-- * {} *", title)?;
        writeln!(f, "-- *{}*", blank)?;
        writeln!(f, "-- {}", edge)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn banner_box() {
        assert_eq!(
            banner("Token").to_string(),
            "\
-- *********
-- *       *
-- * Token *
-- *       *
-- *********
"
        );
    }
}
