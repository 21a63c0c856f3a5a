//! Cheap-to-clone, cheap-to-compare interned strings for account and commodity names.
//!
//! Account and commodity symbols are repeated constantly across a journal (every posting
//! touches an account; most touch a commodity). Wrapping them in [`InternedStr`] means clones
//! are a refcount bump and equality is usually a pointer compare, not a byte compare.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// An interned, reference-counted string.
///
/// Two `InternedStr`s produced by the same [`StringInterner`] for equal text share the same
/// backing allocation, so comparing them is a pointer check before falling back to a byte
/// compare.
#[derive(Clone, Eq)]
pub struct InternedStr(Arc<str>);

impl InternedStr {
    /// Wraps `s` without going through a [`StringInterner`].
    ///
    /// Prefer [`StringInterner::intern`] when the same text is likely to recur; this
    /// constructor is for one-off values (e.g. building a test fixture).
    #[must_use]
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(Arc::from(s.as_ref()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if `self` and `other` are the very same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for InternedStr {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl PartialEq<str> for InternedStr {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for InternedStr {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Hash for InternedStr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for InternedStr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InternedStr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for InternedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl Deref for InternedStr {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for InternedStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for InternedStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InternedStr {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for InternedStr {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl Default for InternedStr {
    fn default() -> Self {
        Self::new("")
    }
}

impl serde::Serialize for InternedStr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for InternedStr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s))
    }
}

/// Deduplicates [`InternedStr`] allocations.
///
/// One interner is typically shared across a whole journal load; callers that don't care about
/// sharing (most tests) can just use [`InternedStr::new`] directly.
#[derive(Debug, Default)]
pub struct StringInterner {
    pool: HashSet<Arc<str>>,
}

impl StringInterner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an `InternedStr` for `s`, reusing a prior allocation if one exists.
    pub fn intern(&mut self, s: &str) -> InternedStr {
        if let Some(existing) = self.pool.get(s) {
            return InternedStr(Arc::clone(existing));
        }
        let arc: Arc<str> = Arc::from(s);
        self.pool.insert(Arc::clone(&arc));
        InternedStr(arc)
    }

    /// Number of distinct strings interned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// `true` if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
