use serde_json::Value;
use url::form_urlencoded::byte_serialize;

use super::serialize_query::{scalar_text, serialize};
use crate::entities::{BindingPlan, BodySource, PlannedSegment, RenderedRequest};
use crate::error::RenderError;

/// Apply a binding plan to a JSON request value
///
/// Path values are percent-encoded so they cannot change the structure of
/// the path. Wildcard values keep their slashes, every element between them
/// is encoded. The body is the whole request, the selected sub-message
/// (absent when the request does not carry it) or nothing. A request setting
/// more than one member of a oneof group is rejected.
pub fn render(plan: &BindingPlan, request: &Value) -> Result<RenderedRequest, RenderError> {
    let naming = plan.naming;

    for group in &plan.oneofs {
        let populated = group.populated(request, naming);
        if populated.len() > 1 {
            return Err(RenderError::ConflictingOneof {
                group: group.name.clone(),
                fields: populated.iter().map(|chain| chain.key(naming)).collect(),
            });
        }
    }

    let mut path = String::new();
    for segment in &plan.path {
        match segment {
            PlannedSegment::Literal(text) => path.push_str(text),
            PlannedSegment::Field { chain, wildcard } => {
                let key = chain.key(naming);
                let value = chain
                    .extract(request, naming)
                    .ok_or_else(|| RenderError::MissingPathParameter(key.clone()))?;
                let text = scalar_text(value).ok_or(RenderError::InvalidPathParameter(key))?;
                if *wildcard {
                    let elements: Vec<String> = text.split('/').map(encode_path_element).collect();
                    path.push_str(&elements.join("/"));
                } else {
                    path.push_str(&encode_path_element(&text));
                }
            }
        }
    }

    let query = plan
        .query
        .iter()
        .flat_map(|parameter| {
            serialize(
                &parameter.chain,
                parameter.chain.extract(request, naming),
                parameter.omit_zero,
                naming,
            )
        })
        .collect();

    let body = match &plan.body {
        BodySource::None => None,
        BodySource::WholeRequest => Some(request.clone()),
        BodySource::Field(chain) => chain.extract(request, naming).cloned(),
    };

    Ok(RenderedRequest {
        verb: plan.verb,
        path,
        query,
        body,
    })
}

/// Percent-encode one path element, `/`, `?`, `#` and `%` included
fn encode_path_element(text: &str) -> String {
    // form encoding writes spaces as `+`, which a path would read literally
    byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
