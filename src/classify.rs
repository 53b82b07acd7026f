//! # Name Classification
//!
//! Converts delimited lowercase identifiers into UpperCamelCase namespace paths.
//!
//! Runs of `[a-z0-9]` are capitalized, `_` joins words inside a segment and is
//! dropped, and both `/` and `-` act as namespace separators that become `::`.
//!
//! ```rust
//! use cog_bundle::classify::classify;
//!
//! assert_eq!(classify("cog_cmd"), "CogCmd");
//! assert_eq!(classify("cog_cmd/my_bundle"), "CogCmd::MyBundle");
//! assert_eq!(classify("cog_cmd-my_bundle"), "CogCmd::MyBundle");
//! ```
//!
//! Malformed identifiers are not rejected. Every delimiter is consumed
//! individually, so `a--b` becomes `A::::B`, a leading `-` yields a leading
//! `::`, and uppercase or other characters outside a run pass through as-is.

use std::iter::Peekable;
use std::str::Chars;

/// Separator placed between namespace segments
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Classify a command or bundle identifier into its namespace path.
pub fn classify(term: &str) -> String {
    let mut classified = String::with_capacity(term.len() + 8);
    let mut chars = term.chars().peekable();

    capitalize_run(&mut chars, &mut classified);

    while let Some(c) = chars.next() {
        match c {
            '_' => capitalize_run(&mut chars, &mut classified),
            '/' | '-' => {
                classified.push_str(NAMESPACE_SEPARATOR);
                capitalize_run(&mut chars, &mut classified);
            }
            other => classified.push(other),
        }
    }

    classified
}

fn is_run_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

/// Consume a run of `[a-z0-9]` and append it with its first character uppercased.
fn capitalize_run(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    let mut first = true;
    while let Some(&c) = chars.peek() {
        if !is_run_char(c) {
            break;
        }
        out.push(if first { c.to_ascii_uppercase() } else { c });
        first = false;
        chars.next();
    }
}
