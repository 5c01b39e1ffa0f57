//! Identifier names.
//!
//! The parser interns every identifier it sees; scope tables and the binder
//! key on the resulting [`InternedString`] handle. A handful of names the
//! analysis treats specially are interned up front and exposed through
//! [`KnownNames`].

use lasso::{Spur, ThreadedRodeo};
use std::fmt;
use std::sync::Arc;

/// A handle to an interned name. Equal handles mean equal names.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct InternedString(Spur);

impl fmt::Debug for InternedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InternedString({:?})", self.0)
    }
}

/// Names with fixed meaning to the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownNames {
    /// The key under which a function scope stores its `this` symbol. No
    /// identifier can spell it, so it never collides with a declared name.
    pub this: InternedString,
    /// `parseInt`, checked for a missing radix argument.
    pub parse_int: InternedString,
}

/// Thread-safe name table shared between a tree and its analysis.
///
/// Clones share one table, so handles from either side compare equal.
#[derive(Clone)]
pub struct StringInterner {
    rodeo: Arc<ThreadedRodeo>,
    known: KnownNames,
}

impl StringInterner {
    pub fn new() -> Self {
        let rodeo = ThreadedRodeo::new();
        let known = KnownNames {
            this: InternedString(rodeo.get_or_intern_static("this")),
            parse_int: InternedString(rodeo.get_or_intern_static("parseInt")),
        };
        Self {
            rodeo: Arc::new(rodeo),
            known,
        }
    }

    /// Handles for the names the analysis treats specially.
    #[inline]
    pub fn known(&self) -> &KnownNames {
        &self.known
    }

    /// Intern `s`, returning the existing handle if it was seen before.
    #[inline]
    pub fn intern(&self, s: &str) -> InternedString {
        InternedString(self.rodeo.get_or_intern(s))
    }

    /// The handle for `s` if it has been interned. Never adds to the table.
    #[inline]
    pub fn get(&self, s: &str) -> Option<InternedString> {
        self.rodeo.get(s).map(InternedString)
    }

    #[inline]
    pub fn resolve(&self, key: InternedString) -> &str {
        self.rodeo.resolve(&key.0)
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StringInterner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringInterner")
            .field("names", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_same_handle() {
        let interner = StringInterner::new();
        let a = interner.intern("counter");
        let b = interner.intern("counter");
        let c = interner.intern("total");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.resolve(a), "counter");
        assert_eq!(interner.resolve(c), "total");
    }

    #[test]
    fn test_get_does_not_intern() {
        let interner = StringInterner::new();
        let before = interner.len();
        assert!(interner.get("label").is_none());
        assert_eq!(interner.len(), before);
        let a = interner.intern("label");
        assert_eq!(interner.get("label"), Some(a));
    }

    #[test]
    fn test_known_names_are_preinterned() {
        let interner = StringInterner::new();
        assert_eq!(interner.len(), 2);
        assert_eq!(interner.resolve(interner.known().this), "this");
        assert_eq!(interner.intern("parseInt"), interner.known().parse_int);
    }

    #[test]
    fn test_clones_share_table() {
        let interner = StringInterner::new();
        let clone = interner.clone();
        let a = interner.intern("shared");
        assert_eq!(clone.get("shared"), Some(a));
        assert_eq!(clone.known(), interner.known());
    }
}
