use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use tracing::debug;

use crate::error::{ChefError, Result};

const USER_AGENT: &str = concat!("garage_chef/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Catalog,
    Course,
    Module,
    Lesson,
    Practice,
}

impl PageKind {
    pub fn label(self) -> &'static str {
        match self {
            PageKind::Catalog => "catalog",
            PageKind::Course => "course",
            PageKind::Module => "module",
            PageKind::Lesson => "lesson",
            PageKind::Practice => "practice",
        }
    }

    fn file_name(self) -> String {
        format!("{}.html", self.label())
    }
}

/// Where page HTML comes from.
pub trait PageSource {
    fn fetch(&self, kind: PageKind, url: &str) -> Result<String>;
}

/// Pre-saved pages, one file per page kind. The URL is only logged: every
/// course, module or lesson is served from the same file.
pub struct LocalPages {
    dir: PathBuf,
}

impl LocalPages {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PageSource for LocalPages {
    fn fetch(&self, kind: PageKind, url: &str) -> Result<String> {
        let path = self.dir.join(kind.file_name());
        debug!("Reading {} page for {} from {}", kind.label(), url, path.display());
        std::fs::read_to_string(&path).map_err(|source| ChefError::Io {
            location: path.display().to_string(),
            source,
        })
    }
}

/// Session credential for the whole run, sent as the `Cookie` header.
#[derive(Clone)]
pub struct SessionCookie(String);

impl SessionCookie {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionCookie(..)")
    }
}

/// Live pages over blocking HTTP. One request per page, no retries.
pub struct HttpPages {
    client: Client,
    cookie: Option<SessionCookie>,
}

impl HttpPages {
    pub fn new(cookie: Option<SessionCookie>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ChefError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client, cookie })
    }
}

impl PageSource for HttpPages {
    fn fetch(&self, kind: PageKind, url: &str) -> Result<String> {
        debug!("GET {} ({})", url, kind.label());
        let mut request = self.client.get(url);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie.0.as_str());
        }
        let http_err = |source: reqwest::Error| ChefError::Http {
            url: url.to_string(),
            source,
        };
        request
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?
            .text()
            .map_err(http_err)
    }
}
