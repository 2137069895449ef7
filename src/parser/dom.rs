use scraper::{ElementRef, Html, Selector};

use crate::error::{ChefError, Result};

/// A parsed page, labelled with the kind of page it is for lookup errors.
pub struct Page {
    doc: Html,
    kind: &'static str,
}

impl Page {
    pub fn parse(html: &str, kind: &'static str) -> Self {
        Self {
            doc: Html::parse_document(html),
            kind,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.doc.root_element()
    }

    /// First element matching `css`; its absence means the page layout changed.
    pub fn find(&self, css: &str) -> Result<ElementRef<'_>> {
        find(self.root(), css, self.kind)
    }

    pub fn find_all(&self, css: &str) -> Result<Vec<ElementRef<'_>>> {
        find_all(self.root(), css)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ChefError::BadSelector(css.to_string()))
}

pub fn find<'a>(scope: ElementRef<'a>, css: &str, page: &'static str) -> Result<ElementRef<'a>> {
    let sel = selector(css)?;
    scope.select(&sel).next().ok_or_else(|| ChefError::MissingElement {
        selector: css.to_string(),
        page,
    })
}

pub fn find_all<'a>(scope: ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).collect())
}

/// Attribute value of `el`; `css` only labels the error.
pub fn attr<'a>(el: ElementRef<'a>, name: &str, css: &str) -> Result<&'a str> {
    el.value().attr(name).ok_or_else(|| ChefError::MissingAttribute {
        attr: name.to_string(),
        selector: css.to_string(),
    })
}

/// Concatenated text content, trimmed.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
