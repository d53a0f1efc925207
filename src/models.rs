use serde::Deserialize;
use serde_json::{Number, Value};

/// One answer from `/api/time`. Every field is optional; JSON `null` counts as absent.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TimeReading {
    #[serde(default)]
    pub dies: Option<Value>,
    #[serde(default)]
    pub milidies: Option<Value>,
    #[serde(default)]
    pub progress: Option<Value>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ExplanationPayload {
    /// Any JSON value; it is shown through [`display_value`].
    #[serde(default)]
    pub explanation: Option<Value>,
}

impl ExplanationPayload {
    /// Text the explanation renders as; empty when the field is absent.
    pub fn text(&self) -> String {
        self.explanation.as_ref().map(display_value).unwrap_or_default()
    }
}

/// Text shown for an opaque JSON value, stringified the way a browser would.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => display_number(n),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        // Elements joined by commas; nested nulls print as nothing
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// `false`, `0`, `""` and `null` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        // Integral floats print without a fractional part (55.0 -> "55")
        Some(f) if f.is_finite() && f.fract() == 0.0 => format!("{f:.0}"),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_reading_accepts_partial_bodies() {
        let reading: TimeReading = serde_json::from_str(r#"{"dies": 311}"#).unwrap();
        assert_eq!(reading.dies, Some(json!(311)));
        assert!(reading.milidies.is_none());
        assert!(reading.progress.is_none());
    }

    #[test]
    fn time_reading_treats_null_as_absent_and_ignores_extra_fields() {
        let reading: TimeReading = serde_json::from_str(
            r#"{"dies": null, "milidies": 7, "progress": 12.5, "countdown_label": "311 dies"}"#,
        )
        .unwrap();
        assert!(reading.dies.is_none());
        assert_eq!(reading.milidies, Some(json!(7)));
        assert_eq!(reading.progress, Some(json!(12.5)));
    }

    #[test]
    fn explanation_payload_without_field_is_empty() {
        let payload: ExplanationPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.explanation, None);
        assert_eq!(payload.text(), "");
    }

    #[test]
    fn non_string_explanation_still_decodes() {
        let payload: ExplanationPayload =
            serde_json::from_str(r#"{"explanation": 42}"#).unwrap();
        assert_eq!(payload.text(), "42");
    }

    #[test]
    fn arrays_and_objects_display_like_a_browser() {
        assert_eq!(display_value(&json!([1, 2])), "1,2");
        assert_eq!(display_value(&json!([1, null, [2, 3.0]])), "1,,2,3");
        assert_eq!(display_value(&json!([])), "");
        assert_eq!(display_value(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn numbers_display_like_a_browser() {
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!(55.0)), "55");
        assert_eq!(display_value(&json!(12.5)), "12.5");
        assert_eq!(display_value(&json!(-3)), "-3");
        assert_eq!(display_value(&json!("311")), "311");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn truthiness_matches_loose_semantics() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
        assert!(is_truthy(&json!(55)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
    }
}
