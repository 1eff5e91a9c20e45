use serde_json::Value;

use crate::entities::{Element, FieldChain, FieldKind, NamingPolicy, ScalarKind};

/// Render one query-eligible field into `(key, value)` pairs
///
/// Scalars give `key=value`, repeated scalars one pair per element under the
/// same key and maps one `key.entry=value` pair per entry. With `omit_zero`,
/// `false`, `0` and `""` are skipped, element by element for repeated fields
/// and entry by entry for maps. Message values produce no pairs.
pub fn serialize(
    chain: &FieldChain,
    value: Option<&Value>,
    omit_zero: bool,
    naming: NamingPolicy,
) -> Vec<(String, String)> {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Vec::new();
    };
    let key = chain.key(naming);
    let keep = |item: &Value, kind: ScalarKind| !(omit_zero && is_zero(item, kind));

    match chain.leaf().kind {
        FieldKind::Scalar(kind) => scalar_text(value)
            .filter(|_| keep(value, kind))
            .map(|text| vec![(key, text)])
            .unwrap_or_default(),
        FieldKind::Repeated(Element::Scalar(kind)) => value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter(|item| keep(*item, kind))
                    .filter_map(scalar_text)
                    .map(|text| (key.clone(), text))
                    .collect()
            })
            .unwrap_or_default(),
        FieldKind::Map => value
            .as_object()
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(_, entry)| keep(*entry, ScalarKind::String))
                    .filter_map(|(entry, text)| {
                        scalar_text(text).map(|text| (format!("{}.{}", key, entry), text))
                    })
                    .collect()
            })
            .unwrap_or_default(),
        FieldKind::Message(_) | FieldKind::Repeated(Element::Message(_)) => Vec::new(),
    }
}

/// Text of a JSON scalar as it appears in a URL; `None` for arrays, objects and null
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Default-valued scalars. 64-bit integers travel as JSON strings, so a
/// numeric field also counts `"0"` as zero.
fn is_zero(value: &Value, kind: ScalarKind) -> bool {
    match value {
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) if text.is_empty() => true,
        Value::String(text) => match kind {
            ScalarKind::Number => text.parse::<f64>().is_ok_and(|n| n == 0.0),
            ScalarKind::Boolean => text == "false",
            _ => false,
        },
        _ => false,
    }
}
