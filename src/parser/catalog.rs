use tracing::debug;

use super::dom::{self, Page};
use super::embedded::{self, CourseEntry};
use crate::error::Result;

const FILTER_LINKS: &str = "nav.course-list__filters a";
const DATA_SCRIPT: &str = "script#__data__";
/// Filter that lists every course; it has no topic of its own.
const ALL_FILTER: &str = "all";

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub key: String,
    pub title: String,
}

pub fn categories(page: &Page) -> Result<Vec<Category>> {
    // The nav itself must exist even if it has no usable filters.
    page.find("nav.course-list__filters")?;

    let mut out = Vec::new();
    for link in page.find_all(FILTER_LINKS)? {
        let key = dom::attr(link, "data-filterby", FILTER_LINKS)?;
        if key == ALL_FILTER {
            continue;
        }
        out.push(Category {
            key: key.to_string(),
            title: dom::text(link),
        });
    }
    debug!("Found {} category filters", out.len());
    Ok(out)
}

pub fn courses(page: &Page) -> Result<Vec<CourseEntry>> {
    let script = page.find(DATA_SCRIPT)?;
    let text: String = script.text().collect();
    embedded::courses(&text)
}

pub fn course_url(base: &str, slug: &str) -> String {
    format!("{}course/{}?enroll-success=1", base, slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Page {
        let html = std::fs::read_to_string("tests/fixtures/catalog.html").unwrap();
        Page::parse(&html, "catalog")
    }

    #[test]
    fn filters_skip_all() {
        let cats = categories(&fixture()).unwrap();
        let keys: Vec<&str> = cats.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["marketing", "negocio"]);
        assert_eq!(cats[0].title, "Marketing digital");
    }

    #[test]
    fn embedded_course_list() {
        let list = courses(&fixture()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].category, "marketing");
        assert_eq!(list[1].slug, "plan-de-negocio");
    }

    #[test]
    fn missing_nav_is_structural_drift() {
        let page = Page::parse("<html><body></body></html>", "catalog");
        assert!(categories(&page).is_err());
        assert!(courses(&page).is_err());
    }

    #[test]
    fn course_url_format() {
        assert_eq!(
            course_url("https://x.test/garagedigital/", "seo"),
            "https://x.test/garagedigital/course/seo?enroll-success=1"
        );
    }
}
