use crate::grammer::ast::{AttrMap, AttrValue, Type};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// What the simplified view shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionPolicy {
    pub show_types: bool,
    /// Operation attribute keys shown inline, in this order
    pub inline_attrs: IndexSet<String>,
    /// Dotted paths kept inside `#name<...>` type payloads. Empty keeps all.
    pub inline_type_attrs: IndexSet<String>,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        ProjectionPolicy {
            show_types: true,
            inline_attrs: IndexSet::new(),
            inline_type_attrs: IndexSet::new(),
        }
    }
}

impl ProjectionPolicy {
    /// Build from comma separated lists such as `"fastmath, value"`.
    pub fn from_lists(show_types: bool, inline_attrs: &str, inline_type_attrs: &str) -> Self {
        ProjectionPolicy {
            show_types,
            inline_attrs: split_list(inline_attrs),
            inline_type_attrs: split_list(inline_type_attrs),
        }
    }

    /// Filters that suit the bundled sample model
    pub fn sample() -> Self {
        Self::from_lists(true, "fastmath, value", "bufferLoc")
    }
}

pub fn split_list(list: &str) -> IndexSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// `key = value, ...` in insertion order.
pub fn stringify_attrs(attrs: &AttrMap) -> String {
    attrs
        .iter()
        .map(|(key, value)| format!("{key} = {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render a type with its hash payloads reduced to the policy's paths.
///
/// Surviving payloads are printed without their `#name` wrapper, so
/// `tensor<2xsi32, #mhlo.TypeExt<bufferLoc = local, offset = 0 : si64>>`
/// under `{bufferLoc}` becomes `tensor<2xsi32, bufferLoc = local>`.
pub fn project_type(ty: &Type, policy: &ProjectionPolicy) -> String {
    let (base, content) = match ty {
        Type::Simple(text) => return text.clone(),
        Type::Complex { base, content } => (base, content),
    };

    let mut parts = vec![];
    if !content.text.is_empty() {
        parts.push(content.text.clone());
    }
    for hash in &content.hash_types {
        let attrs = if policy.inline_type_attrs.is_empty() {
            hash.attributes.clone()
        } else {
            filter_attrs(&hash.attributes, &policy.inline_type_attrs)
        };
        if !attrs.is_empty() {
            parts.push(stringify_attrs(&attrs));
        }
    }
    format!("{base}<{}>", parts.join(", "))
}

/// Keep only the given dotted paths, rebuilding intermediate maps.
/// Paths that do not resolve are dropped.
pub fn filter_attrs(attrs: &AttrMap, paths: &IndexSet<String>) -> AttrMap {
    let mut filtered = AttrMap::new();
    for path in paths {
        let keys: Vec<&str> = path.split('.').collect();
        if let Some(value) = get_nested(attrs, &keys) {
            set_nested(&mut filtered, &keys, value.clone());
        }
    }
    filtered
}

fn get_nested<'a>(attrs: &'a AttrMap, keys: &[&str]) -> Option<&'a AttrValue> {
    let (first, rest) = keys.split_first()?;
    let value = attrs.get(*first)?;
    if rest.is_empty() {
        return Some(value);
    }
    match value {
        AttrValue::Map(inner) => get_nested(inner, rest),
        _ => None,
    }
}

fn set_nested(attrs: &mut AttrMap, keys: &[&str], value: AttrValue) {
    let Some((first, rest)) = keys.split_first() else {
        return;
    };
    if rest.is_empty() {
        attrs.insert(first.to_string(), value);
        return;
    }
    let slot = attrs
        .entry(first.to_string())
        .or_insert_with(|| AttrValue::Map(AttrMap::new()));
    // A whole value already kept for a shorter path covers this one
    if let AttrValue::Map(inner) = slot {
        set_nested(inner, rest, value);
    }
}

/// Operation attributes selected for inline display, in policy order.
pub fn project_attrs(attrs: &AttrMap, policy: &ProjectionPolicy) -> AttrMap {
    policy
        .inline_attrs
        .iter()
        .filter_map(|key| attrs.get(key).map(|value| (key.clone(), value.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammer::ast::Scalar;

    fn num(n: &str) -> AttrValue {
        AttrValue::Scalar(Scalar::Number(n.to_string()))
    }

    #[test]
    fn split_list_trims_and_drops_empty() {
        let list = split_list(" fastmath, ,value ,");
        assert_eq!(list.into_iter().collect::<Vec<_>>(), vec!["fastmath", "value"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn nested_path_rebuilds_structure() {
        let sharding: AttrMap = [("dims".to_string(), num("2")), ("strides".to_string(), num("0"))]
            .into_iter()
            .collect();
        let attrs: AttrMap = [
            ("offset".to_string(), num("0")),
            ("sharding".to_string(), AttrValue::Map(sharding)),
        ]
        .into_iter()
        .collect();

        let paths = split_list("sharding.dims, missing.path, offset.deeper");
        let filtered = filter_attrs(&attrs, &paths);
        assert_eq!(stringify_attrs(&filtered), "sharding = <dims = 2>");
    }

    #[test]
    fn filtered_keys_follow_policy_order() {
        let attrs: AttrMap = [("a".to_string(), num("1")), ("b".to_string(), num("2"))]
            .into_iter()
            .collect();
        let filtered = filter_attrs(&attrs, &split_list("b, a"));
        assert_eq!(stringify_attrs(&filtered), "b = 2, a = 1");
    }

    #[test]
    fn shorter_path_wins_over_deeper() {
        let inner: AttrMap = [("x".to_string(), num("1")), ("y".to_string(), num("2"))]
            .into_iter()
            .collect();
        let attrs: AttrMap = [("m".to_string(), AttrValue::Map(inner))].into_iter().collect();
        let filtered = filter_attrs(&attrs, &split_list("m, m.x"));
        assert_eq!(stringify_attrs(&filtered), "m = <x = 1, y = 2>");
    }
}
