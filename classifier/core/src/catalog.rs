//! Class Catalog
//!
//! The fixed registry of class names the classification service knows about,
//! each bound to a color token, plus one fallback token for names the
//! catalog has never heard of.
//!
//! # Design Philosophy
//!
//! The catalog is a plain value handed to whoever needs it (the projector,
//! the workflow, a surface). Nothing reads it from global state, so tests can
//! build any catalog they like and the config file can replace the built-in
//! one without touching code.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque color token
///
/// The built-in catalog uses `#rrggbb` hex strings. Surfaces decide how to
/// render a token; anything they cannot interpret should fall back to their
/// own neutral color.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    /// Create a token from any string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for ColorToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// One known class and its color
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Class name exactly as the service reports it
    pub name: String,
    /// Color used when rendering this class
    pub color: ColorToken,
}

/// Ordered registry of known classes plus a fallback color
///
/// Declaration order matters: it is the order in which known classes are
/// presented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassCatalog {
    entries: Vec<CatalogEntry>,
    default_color: ColorToken,
}

/// Fallback color of the built-in catalog (muted gray)
pub const DEFAULT_FALLBACK_COLOR: &str = "#8b93a7";

impl ClassCatalog {
    /// Build a catalog from `(name, color)` pairs and a fallback color
    ///
    /// If a name is listed twice, the first declaration wins.
    pub fn new<I, N, C>(entries: I, default_color: impl Into<ColorToken>) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<ColorToken>,
    {
        let mut deduped: Vec<CatalogEntry> = Vec::new();
        for (name, color) in entries {
            let name = name.into();
            if deduped.iter().any(|e| e.name == name) {
                continue;
            }
            deduped.push(CatalogEntry {
                name,
                color: color.into(),
            });
        }

        Self {
            entries: deduped,
            default_color: default_color.into(),
        }
    }

    /// The classes produced by the astronomy classification service
    ///
    /// Names are the service's own labels: star, nebula, galaxy, comet,
    /// planet and noise.
    #[must_use]
    pub fn astronomy() -> Self {
        Self::new(
            [
                ("Yıldız", "#3b82f6"),
                ("Bulutsu", "#f59e0b"),
                ("Galaksi", "#b36bf5"),
                ("Kuyruklu Yıldız", "#26d926"),
                ("Gezegen", "#26d9d9"),
                ("Gürültü", "#ef4444"),
            ],
            DEFAULT_FALLBACK_COLOR,
        )
    }

    /// Position of `name` in declaration order, if known
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Whether `name` is a known class
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Registered color for `name`, or the fallback color
    #[must_use]
    pub fn color_for(&self, name: &str) -> &ColorToken {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map_or(&self.default_color, |e| &e.color)
    }

    /// The fallback color for unknown names
    #[must_use]
    pub fn default_color(&self) -> &ColorToken {
        &self.default_color
    }

    /// Known classes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Number of known classes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog lists no classes at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ClassCatalog {
    fn default() -> Self {
        Self::astronomy()
    }
}
