use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::error::PracticeError;

/// A label or id the site serializes either as a string or as a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Zero-based position into an option list; sometimes quoted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OptionIndex {
    Number(i64),
    Text(String),
}

impl OptionIndex {
    pub fn position(&self) -> Result<usize, PracticeError> {
        match self {
            OptionIndex::Number(n) => {
                usize::try_from(*n).map_err(|_| PracticeError::BadIndex(n.to_string()))
            }
            OptionIndex::Text(s) => s
                .trim()
                .parse::<usize>()
                .map_err(|_| PracticeError::BadIndex(s.clone())),
        }
    }
}

/// `correctOption` / `correctOptions`: one index or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CorrectOptions {
    One(OptionIndex),
    Many(Vec<OptionIndex>),
}

impl CorrectOptions {
    pub fn indices(&self) -> &[OptionIndex] {
        match self {
            CorrectOptions::One(i) => std::slice::from_ref(i),
            CorrectOptions::Many(v) => v,
        }
    }
}

/// Practice payload of a recognized widget; its `type` is read separately by
/// [`payload_type`].
///
/// `options` stays untyped until the activity kind is known: most kinds hold
/// plain [`PracticeOption`]s, the sub-question kinds hold [`SubQuestion`]s.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeActivity {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Vec<Value>,
    #[serde(default, alias = "correctOptions")]
    pub correct_option: Option<CorrectOptions>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PracticeOption {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub value: Option<Scalar>,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubQuestion {
    pub id: Scalar,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<PracticeOption>,
    #[serde(default, alias = "correctOptions")]
    pub correct_option: Option<CorrectOptions>,
}

impl PracticeActivity {
    /// Decode a raw payload whose `type` has already been recognized.
    pub fn from_payload(kind: &str, payload: &Value) -> Result<Self, PracticeError> {
        Self::deserialize(payload).map_err(|source| PracticeError::Shape {
            kind: kind.to_string(),
            source,
        })
    }
}

/// The payload's `type` as written, or its JSON text when it is not a string.
pub fn payload_type(payload: &Value) -> String {
    match payload.get("type") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Decode each raw option into the shape the activity kind expects.
pub fn decode_options<'a, T>(kind: &str, raw: &'a [Value]) -> Result<Vec<T>, PracticeError>
where
    T: Deserialize<'a>,
{
    raw.iter()
        .map(|v| {
            T::deserialize(v).map_err(|source| PracticeError::Shape {
                kind: kind.to_string(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quoted_and_plain_indices() {
        let a: PracticeActivity =
            serde_json::from_value(json!({"type": "tag-cloud", "correctOptions": ["0", 2]})).unwrap();
        let idx: Vec<usize> = a
            .correct_option
            .unwrap()
            .indices()
            .iter()
            .map(|i| i.position().unwrap())
            .collect();
        assert_eq!(idx, vec![0, 2]);
    }

    #[test]
    fn single_index_under_either_key() {
        let a: PracticeActivity =
            serde_json::from_value(json!({"type": "image-slider", "correctOption": 1})).unwrap();
        assert_eq!(a.correct_option.unwrap().indices().len(), 1);
        let b: PracticeActivity =
            serde_json::from_value(json!({"type": "image-slider", "correctOptions": "3"})).unwrap();
        assert_eq!(b.correct_option.unwrap().indices()[0].position().unwrap(), 3);
    }

    #[test]
    fn non_numeric_index_is_rejected() {
        let i = OptionIndex::Text("first".into());
        assert!(matches!(i.position(), Err(PracticeError::BadIndex(s)) if s == "first"));
    }

    #[test]
    fn negative_index_is_rejected() {
        let a: PracticeActivity =
            serde_json::from_value(json!({"type": "image-slider", "correctOption": -1})).unwrap();
        let binding = a.correct_option.unwrap();
        let index = &binding.indices()[0];
        assert!(matches!(index.position(), Err(PracticeError::BadIndex(s)) if s == "-1"));
    }

    #[test]
    fn mistyped_fields_are_a_shape_error() {
        let payload = json!({"type": "swipe-selector", "options": [], "unit": 5});
        let err = PracticeActivity::from_payload("swipe-selector", &payload).unwrap_err();
        assert!(matches!(err, PracticeError::Shape { kind, .. } if kind == "swipe-selector"));
    }

    #[test]
    fn type_is_read_loosely() {
        assert_eq!(payload_type(&json!({"type": "tag-cloud"})), "tag-cloud");
        assert_eq!(payload_type(&json!({"type": 7})), "7");
        assert_eq!(payload_type(&json!(["no", "object"])), "");
    }

    #[test]
    fn numeric_value_renders_plainly() {
        let o: PracticeOption = serde_json::from_value(json!({"value": 12})).unwrap();
        assert_eq!(o.value.unwrap().to_string(), "12");
    }

    #[test]
    fn wrong_shape_reports_kind() {
        let raw = vec![json!("just a string")];
        let err = decode_options::<SubQuestion>("text-drawer", &raw).unwrap_err();
        assert!(matches!(err, PracticeError::Shape { kind, .. } if kind == "text-drawer"));
    }
}
