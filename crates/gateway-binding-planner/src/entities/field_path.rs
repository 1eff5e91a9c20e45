use std::fmt;

/// A dotted sequence of declared field names, e.g. `zero_value_msg.c`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Parse a dotted path. Returns `None` for an empty path, an empty
    /// component or a component that is not an identifier.
    pub fn parse(dotted: &str) -> Option<Self> {
        let segments: Vec<String> = dotted.split('.').map(str::to_string).collect();
        if segments.iter().all(|s| is_identifier(s)) {
            Some(Self(segments))
        } else {
            None
        }
    }

    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// True when one path equals or is nested inside the other
    pub fn overlaps(&self, other: &FieldPath) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotted_path() {
        let path = FieldPath::parse("r_camel.name_camel").unwrap();
        assert_eq!(path.segments(), &["r_camel".to_string(), "name_camel".to_string()]);
        assert_eq!(path.to_string(), "r_camel.name_camel");
    }

    #[test]
    fn test_parse_rejects_empty_components() {
        assert!(FieldPath::parse("").is_none());
        assert!(FieldPath::parse("a..b").is_none());
        assert!(FieldPath::parse(".a").is_none());
        assert!(FieldPath::parse("1abc").is_none());
        assert!(FieldPath::parse("a-b").is_none());
    }

    #[test]
    fn test_overlaps() {
        let req = FieldPath::root("req");
        let nested = req.child("b");
        assert!(nested.starts_with(&req));
        assert!(req.overlaps(&nested));
        assert!(nested.overlaps(&req));
        assert!(!FieldPath::root("a").overlaps(&req));
        assert!(!FieldPath::root("re").overlaps(&req));
    }
}
