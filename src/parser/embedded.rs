use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ChefError, Result};

static COURSES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)courses:\s*(\[.*?\}\s*\])").unwrap());
static LESSON_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)window\.lessonData\s*=\s*(\{.*?\})\s*;").unwrap());

/// One entry of the catalog's embedded course list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourseEntry {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
    pub category: String,
}

/// `window.lessonData` of a lesson or practice page.
///
/// `practice` is kept as raw JSON: its layout depends on the widget type,
/// which the classifier reads first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonData {
    #[serde(default)]
    pub practice: Option<Value>,
}

/// Cut the JSON literal captured by `re` out of `text` and decode it.
///
/// A missing marker and undecodable JSON are distinct errors; neither falls
/// back to a default.
pub fn extract_json<T: DeserializeOwned>(
    text: &str,
    re: &Regex,
    marker: &'static str,
    what: &'static str,
) -> Result<T> {
    let literal = re
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or(ChefError::MarkerNotFound { marker })?;
    serde_json::from_str(literal.as_str()).map_err(|source| ChefError::Json { what, source })
}

pub fn courses(script: &str) -> Result<Vec<CourseEntry>> {
    extract_json(script, &COURSES_RE, "courses: [", "course list")
}

pub fn lesson_data(html: &str) -> Result<LessonData> {
    extract_json(html, &LESSON_DATA_RE, "window.lessonData =", "lesson data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_list_from_script() {
        let script = r#"
            var app = { page: 1,
              courses: [{"title": "SEO", "slug": "seo", "image": "seo.png", "category": "marketing"},
                        {"title": "Ventas", "slug": "ventas", "category": "business"}],
              total: 2 };"#;
        let list = courses(script).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].slug, "seo");
        assert_eq!(list[1].image, None);
    }

    #[test]
    fn missing_marker() {
        assert!(matches!(
            courses("var nothing = 1;"),
            Err(ChefError::MarkerNotFound { marker: "courses: [" })
        ));
    }

    #[test]
    fn malformed_json_is_distinct() {
        let script = r#"courses: [{"title": "SEO", slug: "seo"}]"#;
        assert!(matches!(
            courses(script),
            Err(ChefError::Json { what: "course list", .. })
        ));
    }

    #[test]
    fn lesson_data_with_nested_practice() {
        let html = r#"<script>window.lessonData = {"title": "Uno",
            "practice": {"type": "tag-cloud", "options": [{"text": "a"}], "correctOptions": [0]}};
            var other = {};</script>"#;
        let data = lesson_data(html).unwrap();
        assert_eq!(data.practice.unwrap()["type"], "tag-cloud");
    }

    #[test]
    fn odd_practice_fields_do_not_fail_the_page() {
        let html = r#"window.lessonData = {"practice": {"type": "image-slider", "correctOption": {"left": 0}, "unit": 5}};"#;
        let practice = lesson_data(html).unwrap().practice.unwrap();
        assert_eq!(practice["unit"], 5);
    }

    #[test]
    fn lesson_data_without_practice() {
        let data = lesson_data(r#"window.lessonData = {"title": "Dos"};"#).unwrap();
        assert!(data.practice.is_none());
    }
}
