//! Label collections an expression can be matched against.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{BuildHasher, Hash};

use serde::{Deserialize, Serialize};

/// Anything that can answer "is this label present".
///
/// A single string behaves as a one-element set.
pub trait Labels {
    fn contains_label(&self, label: &str) -> bool;
}

impl Labels for str {
    fn contains_label(&self, label: &str) -> bool {
        self == label
    }
}

impl Labels for String {
    fn contains_label(&self, label: &str) -> bool {
        self == label
    }
}

impl<S: AsRef<str>> Labels for [S] {
    fn contains_label(&self, label: &str) -> bool {
        self.iter().any(|l| l.as_ref() == label)
    }
}

impl<S: AsRef<str>, const N: usize> Labels for [S; N] {
    fn contains_label(&self, label: &str) -> bool {
        self.as_slice().contains_label(label)
    }
}

impl<S: AsRef<str>> Labels for Vec<S> {
    fn contains_label(&self, label: &str) -> bool {
        self.as_slice().contains_label(label)
    }
}

impl<S: Borrow<str> + Hash + Eq, H: BuildHasher> Labels for HashSet<S, H> {
    fn contains_label(&self, label: &str) -> bool {
        self.contains(label)
    }
}

impl<S: Borrow<str> + Ord> Labels for BTreeSet<S> {
    fn contains_label(&self, label: &str) -> bool {
        self.contains(label)
    }
}

impl<T: Labels + ?Sized> Labels for &T {
    fn contains_label(&self, label: &str) -> bool {
        (**self).contains_label(label)
    }
}

/// An ordered, de-duplicated set of labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeSet<String>);

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a whitespace-separated label string.
    pub fn parse(text: &str) -> Self {
        text.split_whitespace().collect()
    }

    /// Add a label; returns false if it was already present.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        self.0.insert(label.into())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Labels for LabelSet {
    fn contains_label(&self, label: &str) -> bool {
        self.contains(label)
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for LabelSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl From<&str> for LabelSet {
    fn from(label: &str) -> Self {
        std::iter::once(label).collect()
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for label in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(label)?;
            first = false;
        }
        Ok(())
    }
}
