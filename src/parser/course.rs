use super::dom::{self, Page};
use crate::error::Result;
use crate::utils::resolve_url;

const MODULE_CARDS: &str = r#"a[data-gtm-tag="module-card module-link"]"#;
const MODULE_IMAGE: &str = "img.module-info__image";

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleCard {
    pub url: String,
    pub title: String,
    pub thumbnail: String,
}

/// Module cards of a course page, in page order.
pub fn module_cards(page: &Page, base: &str) -> Result<Vec<ModuleCard>> {
    page.find_all(MODULE_CARDS)?
        .into_iter()
        .map(|card| -> Result<ModuleCard> {
            let href = dom::attr(card, "href", MODULE_CARDS)?;
            let image = dom::find(card, MODULE_IMAGE, page.kind())?;
            Ok(ModuleCard {
                url: resolve_url(base, href),
                title: dom::attr(image, "alt", MODULE_IMAGE)?.trim().to_string(),
                thumbnail: dom::attr(image, "src", MODULE_IMAGE)?.to_string(),
            })
        })
        .collect()
}
