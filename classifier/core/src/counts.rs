//! Class Counts
//!
//! The raw `class name -> count` mapping reported by the classification
//! service.
//!
//! The service sends a JSON object. Deserializing it into a hash map would
//! lose the order in which classes were listed, and that order is what
//! decides how classes unknown to the catalog are presented. `ClassCounts`
//! keeps document order instead. A repeated key keeps its first position and
//! takes the last value, mirroring how JSON parsers usually treat duplicates.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered mapping from class name to a non-negative count
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts {
    entries: Vec<(String, u64)>,
    /// Position of each name in `entries`
    index: HashMap<String, usize>,
}

impl ClassCounts {
    /// Create an empty mapping
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for `name`
    ///
    /// A new name is appended; an existing name keeps its position and gets
    /// the new count.
    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&pos) => self.entries[pos].1 = count,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, count));
            }
        }
    }

    /// Count for `name`, if present
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&pos| self.entries[pos].1)
    }

    /// Entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), *c))
    }

    /// Number of distinct class names
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no class was reported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| *c).sum()
    }
}

impl<N: Into<String>> FromIterator<(N, u64)> for ClassCounts {
    fn from_iter<T: IntoIterator<Item = (N, u64)>>(iter: T) -> Self {
        let mut counts = Self::new();
        for (name, count) in iter {
            counts.insert(name, count);
        }
        counts
    }
}

impl Serialize for ClassCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

struct ClassCountsVisitor;

impl<'de> Visitor<'de> for ClassCountsVisitor {
    type Value = ClassCounts;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of class names to non-negative integer counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let capacity = access.size_hint().unwrap_or(0);
        let mut counts = ClassCounts {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        };
        while let Some((name, count)) = access.next_entry::<String, u64>()? {
            counts.insert(name, count);
        }
        Ok(counts)
    }
}

impl<'de> Deserialize<'de> for ClassCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ClassCountsVisitor)
    }
}
