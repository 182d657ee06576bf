//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

/// Wildcard entry that allows every origin.
pub const WILDCARD_ORIGIN: &str = "*";

/// Configured CORS allow-list.
///
/// Entries are compared exactly and case-sensitively against the
/// request `Origin` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    /// Parse a comma-separated list, trimming entries and dropping empty ones.
    ///
    /// # Examples
    /// ```
    /// use geolookup::domain::value_objects::AllowedOrigins;
    ///
    /// let origins = AllowedOrigins::parse(" http://a.com , http://b.com ");
    /// assert_eq!(origins.len(), 2);
    /// assert!(origins.contains("http://a.com"));
    /// ```
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list contains the literal `*`.
    pub fn has_wildcard(&self) -> bool {
        self.0.iter().any(|o| o == WILDCARD_ORIGIN)
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.0.iter().any(|o| o == origin)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for AllowedOrigins {
    fn from(origins: Vec<String>) -> Self {
        Self::new(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(AllowedOrigins::parse("").is_empty());
        assert!(AllowedOrigins::parse(" , ,").is_empty());
    }

    #[test]
    fn test_parse_trims_entries() {
        let origins = AllowedOrigins::parse(" http://a.com ,http://b.com");
        assert_eq!(
            origins.as_slice(),
            &["http://a.com".to_string(), "http://b.com".to_string()]
        );
    }

    #[test]
    fn test_wildcard_detection() {
        assert!(AllowedOrigins::parse("http://a.com, *").has_wildcard());
        assert!(!AllowedOrigins::parse("http://a.com").has_wildcard());
        assert!(!AllowedOrigins::default().has_wildcard());
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let origins = AllowedOrigins::parse("http://a.com");
        assert!(origins.contains("http://a.com"));
        assert!(!origins.contains("http://A.com"));
        assert!(!origins.contains("http://a.com/"));
    }

    #[test]
    fn test_from_vec() {
        let origins: AllowedOrigins = vec!["*".to_string()].into();
        assert_eq!(origins.len(), 1);
        assert!(origins.has_wildcard());
    }
}
