//! Cookie set of an authenticated portal session.

use std::collections::BTreeMap;

/// Cookies issued to one authenticated browser session, keyed by name.
///
/// Opaque to the attendance client beyond being attached to outgoing
/// requests as a single `Cookie` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    cookies: BTreeMap<String, String>,
}

impl SessionCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cookie, replacing any earlier value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Cookie names, for logging. Values are never exposed this way.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cookies.keys().map(String::as_str)
    }

    /// Render as a `Cookie` request header value (`a=1; b=2`).
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K, V> FromIterator<(K, V)> for SessionCookies
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut cookies = Self::new();
        for (name, value) in iter {
            cookies.insert(name, value);
        }
        cookies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value_is_sorted_and_joined() {
        let cookies: SessionCookies = [("SESSION", "abc"), ("LOCALE", "ko")].into_iter().collect();
        assert_eq!(cookies.header_value(), "LOCALE=ko; SESSION=abc");
        assert_eq!(cookies.len(), 2);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let cookies: SessionCookies = [("SESSION", "old"), ("SESSION", "new")]
            .into_iter()
            .collect();
        assert_eq!(cookies.get("SESSION"), Some("new"));
        assert_eq!(cookies.len(), 1);
    }

    #[test]
    fn test_empty() {
        let cookies = SessionCookies::new();
        assert!(cookies.is_empty());
        assert_eq!(cookies.header_value(), "");
    }
}
