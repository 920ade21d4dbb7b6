//! Dependency selection and the version pin rule.

use std::fmt;

use xmltree::Element;

/// Tag name of dependency elements, compared after lower-casing.
pub const DEPENDENCY_TAG: &str = "dependency";

/// Attribute holding the dependency identifier.
pub const ID_ATTRIBUTE: &str = "id";

/// Attribute holding the dependency version range.
pub const VERSION_ATTRIBUTE: &str = "version";

/// Identifier-prefix filter selecting which dependencies get pinned.
///
/// The dependency id is lower-cased before comparison but the filter is used
/// exactly as given, so only a lower-case filter can match:
///
/// ```
/// use nupin::IdFilter;
///
/// let filter = IdFilter::new("castle.");
/// assert!(filter.matches("Castle.Core"));
/// assert!(!IdFilter::new("Castle.").matches("Castle.Core"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct IdFilter(String);

impl IdFilter {
    /// Creates a filter from an id prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Returns the prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether a dependency id is selected.
    ///
    /// Empty ids are never selected.
    pub fn matches(&self, id: &str) -> bool {
        !id.is_empty() && id.to_lowercase().starts_with(self.0.as_str())
    }
}

impl fmt::Display for IdFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdFilter {
    fn from(prefix: &str) -> Self {
        Self::new(prefix)
    }
}

impl From<String> for IdFilter {
    fn from(prefix: String) -> Self {
        Self(prefix)
    }
}

/// Returns the pinned form of a version, or `None` if it is left alone.
///
/// A value is considered already pinned when it starts with `[` **or** ends
/// with `]`. Half-bracketed values such as `[1.2.3` or `1.2.3]` are therefore
/// never touched.
///
/// ```
/// use nupin::pin::pin_version;
///
/// assert_eq!(pin_version("1.2.3").as_deref(), Some("[1.2.3]"));
/// assert_eq!(pin_version("[1.2.3]"), None);
/// assert_eq!(pin_version("[1.2.3"), None);
/// assert_eq!(pin_version("1.2.3]"), None);
/// ```
pub fn pin_version(version: &str) -> Option<String> {
    if version.starts_with('[') || version.ends_with(']') {
        None
    } else {
        Some(format!("[{version}]"))
    }
}

/// Returns the element name including its namespace prefix, if any.
pub fn qualified_name(element: &Element) -> String {
    match &element.prefix {
        Some(prefix) => format!("{prefix}:{}", element.name),
        None => element.name.clone(),
    }
}

/// Returns whether an element is a dependency element.
pub fn is_dependency(element: &Element) -> bool {
    qualified_name(element).to_lowercase() == DEPENDENCY_TAG
}
