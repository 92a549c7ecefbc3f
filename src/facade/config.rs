//! Which attribute kinds a facade memoizes.

use serde::Serialize;

/// The two independent caching switches of a facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheConfig {
    /// Memoize label membership.
    pub labels: bool,
    /// Memoize property values.
    pub properties: bool,
}

impl CacheConfig {
    /// No memoization: every lookup goes to the store.
    pub const NONE: CacheConfig = CacheConfig {
        labels: false,
        properties: false,
    };

    /// Memoize both labels and properties.
    pub const ALL: CacheConfig = CacheConfig {
        labels: true,
        properties: true,
    };

    /// Parse a selector such as `"label"`, `"property"` or `"label,property"`.
    ///
    /// Accepts more than the two bare keywords. Matching is case-insensitive
    /// and by containment, so any separator works and the `propert` stem also
    /// matches `properties`. The extra keyword `"all"` enables both. An empty
    /// selector or `None` enables neither.
    pub fn parse(selector: Option<&str>) -> Self {
        let selector = match selector {
            Some(s) => s.trim().to_lowercase(),
            None => return Self::NONE,
        };
        if selector == "all" {
            return Self::ALL;
        }
        Self {
            labels: selector.contains("label"),
            properties: selector.contains("propert"),
        }
    }

    /// Whether any kind is memoized.
    pub fn any(&self) -> bool {
        self.labels || self.properties
    }

    /// The canonical selector string for this configuration.
    pub fn selector(&self) -> &'static str {
        match (self.labels, self.properties) {
            (false, false) => "",
            (true, false) => "label",
            (false, true) => "property",
            (true, true) => "label,property",
        }
    }
}

impl std::fmt::Display for CacheConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.any() {
            write!(f, "{}", self.selector())
        } else {
            write!(f, "none")
        }
    }
}
