//! Output key computation

use crate::options::Options;
use crate::rule::Rule;

/// Strip any namespace prefix from a qualified name.
pub fn local_part(name: &str) -> &str {
    match name.split_once(':') {
        Some((_, local)) => local,
        None => name,
    }
}

/// Whether an attribute name declares a namespace (`xmlns` or `xmlns:*`).
pub fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

/// Normalize `-`/`_` separated names to camel case.
///
/// A run of separators followed by a letter collapses into that letter,
/// uppercased. Separators not followed by a letter are kept as they are, so
/// the transform is idempotent.
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if !is_separator(c) {
            out.push(c);
            continue;
        }
        let mut run = String::from(c);
        while let Some(&next) = chars.peek() {
            if !is_separator(next) {
                break;
            }
            run.push(next);
            chars.next();
        }
        match chars.peek() {
            Some(&letter) if letter.is_alphabetic() => {
                out.extend(letter.to_uppercase());
                chars.next();
            }
            _ => out.push_str(&run),
        }
    }
    out
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '_'
}

/// The name a rule's `local_name` constraint is compared against, besides
/// the raw local name.
pub(crate) fn normalized_name(local_name: &str, options: &Options) -> String {
    if options.convert_keys_to_camel_case {
        camel_case(local_name)
    } else {
        local_name.to_string()
    }
}

/// Compute the output key of a node from its raw name and matched rule.
pub fn resolve_key(raw_name: &str, rule: &Rule, options: &Options) -> String {
    if let Some(key) = rule.effect.as_key() {
        return key.to_string();
    }
    normalized_name(local_part(raw_name), options)
}
