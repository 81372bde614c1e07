use thiserror::Error;

/// Errors that can occur while extracting a recipe from a web page.
///
/// Every variant is terminal for a single extraction call; nothing is retried
/// internally. `InvalidUrl` and `Fetch` cover the transport boundary,
/// `MalformedDocument` the parse boundary, and `NoRecipeFound` /
/// `MissingRequiredField` the content boundary.
#[derive(Error, Debug)]
pub enum ClipError {
    /// The input could not be parsed as a URL; no network I/O was attempted
    #[error("Could not parse URL: {0}")]
    InvalidUrl(String),

    /// Network or transport failure, or an unusable (empty) response body
    #[error("Could not fetch site: {0}")]
    Fetch(String),

    /// The fetched payload is not parseable markup (empty or binary)
    #[error("Malformed HTML document")]
    MalformedDocument,

    /// Neither a linked-data block nor a microdata recipe element was found
    #[error("No recipe data found")]
    NoRecipeFound,

    /// Normalization was reached but a required field was absent or empty
    #[error("Field {0:?} is required")]
    MissingRequiredField(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<reqwest::Error> for ClipError {
    fn from(err: reqwest::Error) -> Self {
        ClipError::Fetch(err.to_string())
    }
}
