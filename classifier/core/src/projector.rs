//! Result Projection
//!
//! Turns the service's raw class counts into the ordered, colored rows a
//! surface renders.
//!
//! Known classes come first, in catalog order. Classes the catalog does not
//! list follow in the order the service reported them and get the
//! catalog's fallback color.

use serde::{Deserialize, Serialize};

use crate::catalog::{ClassCatalog, ColorToken};
use crate::counts::ClassCounts;

/// One presentation-ready row of the class breakdown
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    /// Class name as reported by the service
    pub name: String,
    /// Number of objects of this class
    pub count: u64,
    /// Color to render this row with
    pub color: ColorToken,
}

impl DisplayEntry {
    /// Fraction of `total` this entry accounts for (0.0 when `total` is 0)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn share_of(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 / total as f64
        }
    }
}

/// Project raw class counts into ordered display entries
///
/// Every name in `class_counts` appears exactly once, with its count
/// unchanged.
#[must_use]
pub fn project(class_counts: &ClassCounts, catalog: &ClassCatalog) -> Vec<DisplayEntry> {
    let mut ranked: Vec<(Option<usize>, DisplayEntry)> = class_counts
        .iter()
        .map(|(name, count)| {
            (
                catalog.position(name),
                DisplayEntry {
                    name: name.to_string(),
                    count,
                    color: catalog.color_for(name).clone(),
                },
            )
        })
        .collect();

    // Stable: unknown names (None) keep their relative input order.
    ranked.sort_by_key(|(position, _)| position.unwrap_or(usize::MAX));

    ranked.into_iter().map(|(_, entry)| entry).collect()
}

/// Sum of the counts of `entries`
#[must_use]
pub fn total_count(entries: &[DisplayEntry]) -> u64 {
    entries.iter().map(|e| e.count).sum()
}
