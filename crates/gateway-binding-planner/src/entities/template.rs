use super::FieldPath;
use crate::error::RenderError;

/// One element of a compiled path template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Text copied verbatim, slashes included
    Literal(String),
    /// `{field.path}`
    Variable(FieldPath),
    /// `{field.path=pattern}`, the value may span several path elements
    Wildcard { path: FieldPath, pattern: String },
}

impl Segment {
    /// The field path bound by this segment, if any
    pub fn field_path(&self) -> Option<&FieldPath> {
        match self {
            Segment::Literal(_) => None,
            Segment::Variable(path) | Segment::Wildcard { path, .. } => Some(path),
        }
    }
}

/// A path template compiled into ordered segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    pub(crate) fn new(source: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            source: source.into(),
            segments,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Bound field paths in template order
    pub fn variables(&self) -> impl Iterator<Item = &FieldPath> {
        self.segments.iter().filter_map(Segment::field_path)
    }

    /// The `:verb` suffix of the last path element, e.g. `hello` in `/api/{name}:hello`
    pub fn custom_verb(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Literal(text)) => {
                let last_element = &text[text.rfind('/').map_or(0, |i| i + 1)..];
                let (_, verb) = last_element.rsplit_once(':')?;
                (!verb.is_empty()).then_some(verb)
            }
            _ => None,
        }
    }

    /// Build a concrete path, asking `value` for the text of every bound field
    pub fn interpolate<F>(&self, mut value: F) -> Result<String, RenderError>
    where
        F: FnMut(&FieldPath) -> Result<String, RenderError>,
    {
        let mut path = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Variable(field) | Segment::Wildcard { path: field, .. } => {
                    path.push_str(&value(field)?)
                }
            }
        }
        Ok(path)
    }
}
