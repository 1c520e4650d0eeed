//! Element Attributes
//!
//! Ordered key/value list. Order is kept for deterministic rendering;
//! key uniqueness is up to the caller, `set` only replaces the first match.

/// Single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Attribute collection of a node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    attrs: Vec<Attr>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Get attribute by position
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.attrs.get(index)
    }

    /// Get attribute value; names compare ASCII case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Check if attribute exists
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append an attribute without checking for an existing key
    pub fn push(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    /// Set attribute, replacing the first one with the same name
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name.eq_ignore_ascii_case(name)) {
            return Some(std::mem::replace(&mut attr.value, value.to_string()));
        }
        self.attrs.push(Attr::new(name, value));
        None
    }

    /// Remove attribute by name, keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<Attr> {
        let index = self.attrs.iter().position(|a| a.name.eq_ignore_ascii_case(name))?;
        Some(self.attrs.remove(index))
    }

    /// Whitespace-separated tokens of the `class` attribute
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get("class").unwrap_or_default().split_ascii_whitespace()
    }

    /// Set equality: same size and every pair present on both sides.
    /// Order does not matter.
    pub fn matches(&self, other: &Attributes) -> bool {
        self.attrs.len() == other.attrs.len()
            && self.contains_all(other)
            && other.contains_all(self)
    }

    fn contains_all(&self, other: &Attributes) -> bool {
        other
            .attrs
            .iter()
            .all(|b| self.attrs.iter().any(|a| a.name == b.name && a.value == b.value))
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.attrs.iter()
    }
}

impl FromIterator<Attr> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attr>>(iter: I) -> Self {
        Self {
            attrs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_attribute() {
        let mut attrs = Attributes::new();
        attrs.set("class", "btn");
        attrs.set("href", "/docs");

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("class"), Some("btn"));
        assert_eq!(attrs.get("HREF"), Some("/docs"));
        assert_eq!(attrs.set("class", "btn primary"), Some("btn".to_string()));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut attrs: Attributes = [Attr::new("a", "1"), Attr::new("b", "2"), Attr::new("c", "3")]
            .into_iter()
            .collect();

        attrs.remove("b");
        let names: Vec<_> = attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_classes() {
        let mut attrs = Attributes::new();
        attrs.set("class", "  card\tactive ");
        assert_eq!(attrs.classes().collect::<Vec<_>>(), vec!["card", "active"]);
    }

    #[test]
    fn test_matches_ignores_order() {
        let a: Attributes = [Attr::new("x", "1"), Attr::new("y", "2")].into_iter().collect();
        let b: Attributes = [Attr::new("y", "2"), Attr::new("x", "1")].into_iter().collect();
        let c: Attributes = [Attr::new("x", "1"), Attr::new("y", "3")].into_iter().collect();

        assert!(a.matches(&b));
        assert!(!a.matches(&c));
        assert!(!a.matches(&Attributes::new()));
    }

    #[test]
    fn test_matches_is_symmetric_with_duplicates() {
        let mut dup = Attributes::new();
        dup.push(Attr::new("x", "1"));
        dup.push(Attr::new("x", "1"));
        let mixed: Attributes = [Attr::new("x", "1"), Attr::new("y", "2")].into_iter().collect();

        assert!(!dup.matches(&mixed));
        assert!(!mixed.matches(&dup));
        assert!(dup.matches(&dup.clone()));
    }
}
