use std::collections::HashSet;

use crate::entities::{FieldPath, PathTemplate, Segment};
use crate::error::PlanError;

/// Compile an HTTP path template such as `/api/{r.name}/{path=**}:verb`
///
/// Text outside braces is kept verbatim, so repeated slashes and a trailing
/// `:verb` suffix survive as literal text. Text inside braces is a dotted
/// field path, optionally followed by `=pattern`.
pub fn compile(template: &str) -> Result<PathTemplate, PlanError> {
    let malformed = |reason: String| PlanError::MalformedTemplate {
        template: template.to_string(),
        reason,
    };

    let mut segments = Vec::new();
    let mut seen = HashSet::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(index) = rest.find(['{', '}']) {
        let (text, tail) = rest.split_at(index);
        literal.push_str(text);

        if tail.starts_with('}') {
            return Err(malformed(format!("unexpected `}}` at byte {}", template.len() - tail.len())));
        }

        let body = &tail[1..];
        let close = body
            .find(['{', '}'])
            .ok_or_else(|| malformed("unterminated `{`".to_string()))?;
        if body[close..].starts_with('{') {
            return Err(malformed("nested `{` inside a variable".to_string()));
        }

        let (name, pattern) = match body[..close].split_once('=') {
            Some((name, pattern)) => (name, Some(pattern)),
            None => (&body[..close], None),
        };
        if name.is_empty() {
            return Err(malformed("empty variable name".to_string()));
        }
        let path = FieldPath::parse(name)
            .ok_or_else(|| malformed(format!("invalid field path `{}`", name)))?;
        if !seen.insert(path.clone()) {
            return Err(malformed(format!("variable `{}` bound twice", path)));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(match pattern {
            None => Segment::Variable(path),
            Some("") => return Err(malformed(format!("empty pattern for `{}`", path))),
            Some(pattern) => Segment::Wildcard {
                path,
                pattern: pattern.to_string(),
            },
        });

        rest = &body[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(PathTemplate::new(template, segments))
}
