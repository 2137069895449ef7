use super::dom::{self, Page};
use crate::error::{ChefError, Result};
use crate::utils::resolve_url;

const LESSON_ITEMS: &str = "div.myg-topic-sidenav__accordion.accordion__item.js-accordion-item";
const LESSON_LINK: &str = "a.accordion__panel--item";

#[derive(Debug, Clone, PartialEq)]
pub struct LessonEntry {
    pub title: String,
    pub url: String,
    pub practice_url: String,
}

pub fn lessons(page: &Page, base: &str) -> Result<Vec<LessonEntry>> {
    page.find_all(LESSON_ITEMS)?
        .into_iter()
        .map(|item| -> Result<LessonEntry> {
            let heading = dom::text(dom::find(item, "h3", page.kind())?);
            let link = dom::find(item, LESSON_LINK, page.kind())?;
            let click = dom::attr(link, "ng-click", LESSON_LINK)?;
            let path = lesson_path(click).ok_or_else(|| ChefError::MissingAttribute {
                attr: "ng-click (quoted lesson path)".to_string(),
                selector: LESSON_LINK.to_string(),
            })?;
            let url = resolve_url(base, path);
            Ok(LessonEntry {
                title: lesson_title(&heading).to_string(),
                practice_url: format!("{}practice", url),
                url,
            })
        })
        .collect()
}

/// `"3. Título"` → `"Título"`; headings without a number are kept whole.
fn lesson_title(heading: &str) -> &str {
    heading.split_once(". ").map_or(heading, |(_, rest)| rest).trim()
}

/// The lesson path is the first single-quoted argument of the click handler,
/// cut at the first backslash.
fn lesson_path(ng_click: &str) -> Option<&str> {
    let quoted = ng_click.split('\'').nth(1)?;
    quoted.split('\\').next().filter(|p| !p.is_empty())
}

pub fn exam_url(module_url: &str) -> String {
    format!("{}/assessment", module_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://learndigital.withgoogle.com/garagedigital/";

    #[test]
    fn lessons_from_fixture() {
        let html = std::fs::read_to_string("tests/fixtures/module.html").unwrap();
        let entries = lessons(&Page::parse(&html, "module"), BASE).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Qué es la web");
        assert_eq!(
            entries[0].url,
            "https://learndigital.withgoogle.com/garagedigital/course/marketing-digital/module/1/lesson/1/"
        );
        assert_eq!(
            entries[0].practice_url,
            "https://learndigital.withgoogle.com/garagedigital/course/marketing-digital/module/1/lesson/1/practice"
        );
    }

    #[test]
    fn title_and_path_helpers() {
        assert_eq!(lesson_title("2. Buscadores"), "Buscadores");
        assert_eq!(lesson_title("Repaso"), "Repaso");
        assert_eq!(lesson_path(r"go('course/a/lesson/1/\#x')"), Some("course/a/lesson/1/"));
        assert_eq!(lesson_path("go()"), None);
    }

    #[test]
    fn exam_url_appends_assessment() {
        assert_eq!(exam_url("https://x.test/m/1/"), "https://x.test/m/1/assessment");
    }
}
