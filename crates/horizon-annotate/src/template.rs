//! Value templates evaluated against task data.
//!
//! A label value such as `"$category"` or `"Brand (${meta.source})"` is
//! resolved against the data object of the current task. Evaluation is
//! pluggable through [`TemplateEvaluator`]; [`DollarTemplate`] is the
//! default.
//!
//! Variable names start with an ASCII letter or `_` and continue with
//! alphanumerics, `_` and `.` (path separator). A `$` not followed by a name
//! start or `{` is kept literally, so `"$5 off"` stays as written.

use serde_json::Value;

/// Errors produced while evaluating a template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// A referenced variable is absent from the task data.
    #[error("variable '{0}' not found in task data")]
    MissingVariable(String),

    /// `${` without a closing `}`.
    #[error("unterminated '${{' at byte {0}")]
    Unterminated(usize),
}

/// Pure evaluation of a template string against a data object.
pub trait TemplateEvaluator: Send + Sync {
    /// Evaluate `template` with variables looked up in `data`.
    fn evaluate(&self, template: &str, data: &Value) -> Result<String, TemplateError>;
}

/// `$name` / `${name}` substitution with dotted paths into objects and arrays.
#[derive(Debug, Clone, Copy, Default)]
pub struct DollarTemplate;

impl TemplateEvaluator for DollarTemplate {
    fn evaluate(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;
        let mut offset = 0;

        while let Some(pos) = rest.find('$') {
            output.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
                let end = braced
                    .find('}')
                    .ok_or(TemplateError::Unterminated(offset + pos))?;
                (&braced[..end], end + 2)
            } else if after.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
                    .unwrap_or(after.len());
                // A trailing dot ends a sentence, not a path.
                let name = after[..end].trim_end_matches('.');
                (name, name.len())
            } else {
                output.push('$');
                rest = after;
                offset += pos + 1;
                continue;
            };

            let value = lookup(data, name)
                .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
            push_value(&mut output, value);

            rest = &after[consumed..];
            offset += pos + 1 + consumed;
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Follow a dotted path through objects (by key) and arrays (by index).
fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn push_value(output: &mut String, value: &Value) {
    match value {
        Value::String(s) => output.push_str(s),
        Value::Null => {}
        other => output.push_str(&other.to_string()),
    }
}

/// Evaluate an optional template, degrading to `""` when it is absent or
/// evaluation fails.
pub fn resolve(evaluator: &dyn TemplateEvaluator, template: Option<&str>, data: &Value) -> String {
    let Some(template) = template else {
        return String::new();
    };
    match evaluator.evaluate(template, data) {
        Ok(resolved) => resolved,
        Err(err) => {
            tracing::debug!(target: "horizon_annotate::template", template, %err, "template evaluation failed");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(template: &str, data: &Value) -> Result<String, TemplateError> {
        DollarTemplate.evaluate(template, data)
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(eval("Brand", &json!({})).unwrap(), "Brand");
        assert_eq!(eval("", &json!({})).unwrap(), "");
    }

    #[test]
    fn test_simple_substitution() {
        let data = json!({"category": "Product"});
        assert_eq!(eval("$category", &data).unwrap(), "Product");
        assert_eq!(eval("Is $category?", &data).unwrap(), "Is Product?");
    }

    #[test]
    fn test_braced_and_dotted_paths() {
        let data = json!({"meta": {"source": "web", "tags": ["a", "b"]}});
        assert_eq!(eval("${meta.source}s", &data).unwrap(), "webs");
        assert_eq!(eval("$meta.tags.1", &data).unwrap(), "b");
        assert_eq!(eval("from $meta.source.", &data).unwrap(), "from web.");
    }

    #[test]
    fn test_non_string_values() {
        let data = json!({"n": 3, "flag": true, "none": null});
        assert_eq!(eval("$n-$flag-$none|", &data).unwrap(), "3-true-|");
    }

    #[test]
    fn test_literal_dollar() {
        assert_eq!(eval("$5 off", &json!({})).unwrap(), "$5 off");
        assert_eq!(eval("cost: $", &json!({})).unwrap(), "cost: $");
    }

    #[test]
    fn test_missing_variable() {
        assert_eq!(
            eval("$missing", &json!({"other": 1})),
            Err(TemplateError::MissingVariable("missing".into()))
        );
    }

    #[test]
    fn test_unterminated_brace() {
        assert_eq!(eval("ab ${open", &json!({})), Err(TemplateError::Unterminated(3)));
    }

    #[test]
    fn test_resolve_degrades_to_empty() {
        let data = json!({"name": "Brand"});
        assert_eq!(resolve(&DollarTemplate, None, &data), "");
        assert_eq!(resolve(&DollarTemplate, Some("$nope"), &data), "");
        assert_eq!(resolve(&DollarTemplate, Some("$name"), &data), "Brand");
    }
}
