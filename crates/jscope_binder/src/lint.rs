//! Syntactic lint patterns that need no scope information.

use jscope_core::intern::{InternedString, KnownNames};

/// Property names that are almost always a typo, with their fix.
const MISSPELLED_PROPERTIES: &[(&str, &str)] = &[("lenght", "length")];

/// The intended spelling of a misspelled property name.
pub fn misspelled_property(name: &str) -> Option<&'static str> {
    MISSPELLED_PROPERTIES
        .iter()
        .find(|(wrong, _)| *wrong == name)
        .map(|(_, right)| *right)
}

/// `parseInt(x)` without a radix parses `"08"` differently across engines.
pub fn is_parse_int_without_radix(known: &KnownNames, callee: InternedString, arg_count: usize) -> bool {
    callee == known.parse_int && arg_count == 1
}
