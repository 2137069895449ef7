use thiserror::Error;

/// Failures of the scraping layer. Every variant is fatal for the page that
/// raised it; the pipeline does not try to recover.
#[derive(Error, Debug)]
pub enum ChefError {
    #[error("failed to read page {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid CSS selector `{0}`")]
    BadSelector(String),
    #[error("no element matching `{selector}` on {page} page")]
    MissingElement { selector: String, page: &'static str },
    #[error("element `{selector}` has no `{attr}` attribute")]
    MissingAttribute { attr: String, selector: String },
    #[error("embedded marker `{marker}` not found")]
    MarkerNotFound { marker: &'static str },
    #[error("malformed embedded JSON for {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("course `{course}` belongs to unknown category `{category}`")]
    UnknownCategory { course: String, category: String },
    #[error("invalid channel: {0}")]
    InvalidChannel(String),
}

pub type Result<T> = std::result::Result<T, ChefError>;

/// Reasons a practice payload yields no questions. None of these abort the
/// run: the exercise for that lesson is skipped.
#[derive(Error, Debug)]
pub enum PracticeError {
    #[error("unrecognized practice type `{0}`")]
    Unrecognized(String),
    #[error("`{kind}` practice does not have the expected shape: {source}")]
    Shape {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("option {index} has no text, value or answer")]
    MissingLabel { index: usize },
    #[error("correct option index `{0}` is not a number")]
    BadIndex(String),
    #[error("correct option index {index} out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no correct option given")]
    MissingCorrect,
    #[error("single-answer question lists {count} correct options")]
    AmbiguousAnswer { count: usize },
}
