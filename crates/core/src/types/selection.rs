//! Category selection for the catalog view.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::CategoryId;

/// The sentinel used for "every category" in URLs and form values.
pub const ALL_SENTINEL: &str = "all";

/// Which slice of the catalog is being displayed.
///
/// `All` is the initial state and is also what an empty or `"all"` selector
/// parses to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum CategorySelection {
    /// Every plant, via the all-plants endpoint.
    #[default]
    All,
    /// Plants of a single category.
    Category(CategoryId),
}

impl CategorySelection {
    /// Parse a raw selector (path segment, query value, CLI argument).
    ///
    /// ```
    /// use green_earth_core::{CategoryId, CategorySelection};
    ///
    /// assert_eq!(CategorySelection::parse("all"), CategorySelection::All);
    /// assert_eq!(CategorySelection::parse(" "), CategorySelection::All);
    /// assert_eq!(
    ///     CategorySelection::parse("3"),
    ///     CategorySelection::Category(CategoryId::new("3"))
    /// );
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(ALL_SENTINEL) {
            Self::All
        } else {
            Self::Category(CategoryId::new(raw))
        }
    }

    /// Parse an optional selector, treating `None` as `All`.
    #[must_use]
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map_or(Self::All, Self::parse)
    }

    /// Whether this is the `All` sentinel.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Whether a category button with this id should be highlighted.
    #[must_use]
    pub fn is_active(&self, id: &CategoryId) -> bool {
        match self {
            Self::All => false,
            Self::Category(selected) => selected == id,
        }
    }

    /// The selector as used in URLs (`"all"` or the category id).
    #[must_use]
    pub fn as_param(&self) -> &str {
        match self {
            Self::All => ALL_SENTINEL,
            Self::Category(id) => id.as_str(),
        }
    }
}

impl fmt::Display for CategorySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl From<String> for CategorySelection {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<CategorySelection> for String {
    fn from(selection: CategorySelection) -> Self {
        selection.as_param().to_owned()
    }
}

impl From<CategoryId> for CategorySelection {
    fn from(id: CategoryId) -> Self {
        if id.is_empty() {
            Self::All
        } else {
            Self::Category(id)
        }
    }
}
