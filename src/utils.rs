/// Build a stable source id from a page URL or path: `"<lang>-<slug>"`.
///
/// The scheme and host are dropped, as is any query string. Fragment markers
/// (`#`, `!`) are removed, surrounding slashes trimmed, and inner slashes
/// become hyphens.
pub fn source_id(language: &str, url: &str) -> String {
    let path = url.split("://").nth(1).map_or(url, |rest| {
        rest.find('/').map_or("", |i| &rest[i..])
    });
    let path = path.split('?').next().unwrap_or_default();
    let slug: String = path.chars().filter(|c| *c != '#' && *c != '!').collect();
    let slug = slug
        .split('/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-{}", language, slug)
}

/// Resolve an `href` found on a page against the site base URL.
pub fn resolve_url(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    if href.starts_with('/') {
        return format!("{}{}", origin(base), href);
    }
    format!("{}{}", base, href)
}

fn origin(url: &str) -> &str {
    match url.find("://") {
        Some(i) => {
            let after = i + 3;
            url[after..].find('/').map_or(url, |j| &url[..after + j])
        }
        None => url.trim_end_matches('/'),
    }
}

/// Remove the paragraph wrappers the site puts around option labels.
pub fn strip_paragraph_markup(text: &str) -> String {
    text.replace("<p>", "").replace("</p>", "")
}
