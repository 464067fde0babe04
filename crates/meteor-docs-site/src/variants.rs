//! Structural comparison of descriptor variants.
//!
//! The site has been republished under several organization names over time.
//! Variants may differ in literal values (URLs, organization) but must share
//! the same key set and shape, so they can be consolidated into one.

use serde::Serialize;
use serde_json::Value;

/// Where and why two records differ in shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("shape mismatch at `{path}`: {reason}")]
pub struct ShapeMismatch {
    pub path: String,
    pub reason: String,
}

/// Check that `a` and `b` are structurally isomorphic.
///
/// Objects must have the same keys, arrays the same length, and every value
/// the same kind. Strings, numbers and booleans may differ in value.
pub fn check_isomorphic<T: Serialize>(a: &T, b: &T) -> Result<(), ShapeMismatch> {
    let a = serde_json::to_value(a).map_err(|e| mismatch("$", e.to_string()))?;
    let b = serde_json::to_value(b).map_err(|e| mismatch("$", e.to_string()))?;
    compare(&a, &b, "$")
}

fn compare(a: &Value, b: &Value, path: &str) -> Result<(), ShapeMismatch> {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            if let Some(key) = left.keys().find(|k| !right.contains_key(*k)) {
                return Err(mismatch(path, format!("key `{}` only on the left", key)));
            }
            if let Some(key) = right.keys().find(|k| !left.contains_key(*k)) {
                return Err(mismatch(path, format!("key `{}` only on the right", key)));
            }
            for (key, value) in left {
                compare(value, &right[key], &format!("{}.{}", path, key))?;
            }
            Ok(())
        }
        (Value::Array(left), Value::Array(right)) => {
            if left.len() != right.len() {
                return Err(mismatch(
                    path,
                    format!("array length {} vs {}", left.len(), right.len()),
                ));
            }
            for (i, (l, r)) in left.iter().zip(right).enumerate() {
                compare(l, r, &format!("{}[{}]", path, i))?;
            }
            Ok(())
        }
        _ if kind(a) == kind(b) => Ok(()),
        _ => Err(mismatch(path, format!("{} vs {}", kind(a), kind(b)))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(path: &str, reason: String) -> ShapeMismatch {
    ShapeMismatch {
        path: path.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::SiteDescriptor;
    use crate::meteor::SITE_TOML;

    fn rebranded(org: &str, host: &str) -> SiteDescriptor {
        let source = SITE_TOML
            .replace("github.com/goto/", &format!("github.com/{}/", org))
            .replace("goto.github.io", host)
            .replace("organization_name = \"goto\"", &format!("organization_name = \"{}\"", org));
        SiteDescriptor::from_toml(&source).unwrap()
    }

    #[test]
    fn renamed_variants_are_isomorphic() {
        let current = SiteDescriptor::from_toml(SITE_TOML).unwrap();
        let odpf = rebranded("odpf", "odpf.github.io");
        let raystack = rebranded("raystack", "raystack.github.io");

        assert_ne!(current, odpf);
        assert_eq!(check_isomorphic(&current, &odpf), Ok(()));
        assert_eq!(check_isomorphic(&odpf, &raystack), Ok(()));
    }

    #[test]
    fn extra_footer_link_breaks_isomorphism() {
        let current = SiteDescriptor::from_toml(SITE_TOML).unwrap();
        let mut other = current.clone();
        other.footer.links[0].items.pop();

        let err = check_isomorphic(&current, &other).unwrap_err();

        assert_eq!(err.path, "$.footer.links[0].items");
        assert_eq!(err.reason, "array length 4 vs 3");
    }

    #[test]
    fn missing_optional_section_is_a_kind_mismatch() {
        let current = SiteDescriptor::from_toml(SITE_TOML).unwrap();
        let mut other = current.clone();
        other.announcement_bar = None;

        let err = check_isomorphic(&current, &other).unwrap_err();

        assert_eq!(err.path, "$.announcement_bar");
        assert_eq!(err.reason, "object vs null");
    }
}
