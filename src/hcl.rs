// Copyright 2026 Martin Pool

//! Render environment variables as a Terraform `locals` block.
//!
//! Entries are always sorted by key, so the same variables produce the same
//! text no matter what order they were read or stored in.

use std::fmt::Write;

use itertools::Itertools;

/// Format variables as:
///
/// ```text
/// locals {
///   env_vars = {
///     "BAZ" = "qux"
///     "FOO" = "bar"
///   }
/// }
/// ```
///
/// Keys are expected to be unique, as they are when coming from a map.
pub fn env_vars_to_hcl<I, K, V>(env_vars: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut hcl = String::from("locals {\n  env_vars = {\n");
    for (key, value) in env_vars
        .into_iter()
        .sorted_by(|(a, _), (b, _)| a.as_ref().cmp(b.as_ref()))
    {
        writeln!(
            hcl,
            "    {} = {}",
            quote_string(key.as_ref()),
            quote_string(value.as_ref())
        )
        .expect("write to String");
    }
    hcl.push_str("  }\n}\n");
    hcl
}

/// Quote a string as an HCL template literal that evaluates back to exactly `s`.
fn quote_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            // `${` and `%{` start template sequences; doubling the sigil makes them literal.
            '$' | '%' if chars.peek() == Some(&'{') => {
                quoted.push(c);
                quoted.push(c);
            }
            c if c.is_control() => {
                write!(quoted, "\\u{:04X}", c as u32).expect("write to String");
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
