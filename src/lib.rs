//! Extracts schema.org recipes from arbitrary web pages and normalizes them
//! into one canonical, validated record.
//!
//! One URL in, one [`Recipe`] out: a single blocking fetch, a tolerant HTML
//! parse, a linked-data scan with a microdata fallback, and a normalization
//! pass that rewrites whatever shape the source used into the fixed canonical
//! field set. Each stage can fail with a typed [`ClipError`]; nothing is
//! retried.

pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod extractors;
pub mod fetch;
pub mod normalize;

pub use crate::config::ClipperConfig;
pub use crate::error::ClipError;
pub use crate::normalize::{normalize, Recipe};

use log::debug;

use crate::extractors::{Extractor, JsonLdLocator, MicrodataExtractor};
use crate::fetch::Fetcher;

/// The extraction pipeline, bundling a configured fetcher.
///
/// A `Clipper` is cheap to keep around and reuse; every extraction call is
/// independent and carries no state across calls. Callers needing concurrency
/// run independent calls on separate threads.
pub struct Clipper {
    fetcher: Fetcher,
}

impl Clipper {
    pub fn new(config: &ClipperConfig) -> Self {
        Self {
            fetcher: Fetcher::new(config),
        }
    }

    /// Build a clipper from `config.toml` / `CLIPPER__*` environment settings.
    pub fn from_env() -> Result<Self, ClipError> {
        let config = ClipperConfig::load()?;
        Ok(Self::new(&config))
    }

    /// Fetch a page and extract its recipe.
    pub fn extract(&self, url: &str) -> Result<Recipe, ClipError> {
        let html = self.fetcher.fetch(url)?;
        self.extract_from_html(&html, url)
    }

    /// Extract a recipe from already-fetched HTML.
    ///
    /// This is the network-free tail of the pipeline: parse, locate, and
    /// normalize. `url` identifies the page in diagnostics and becomes the
    /// `url` field of the result.
    pub fn extract_from_html(&self, html: &str, url: &str) -> Result<Recipe, ClipError> {
        let (document, parse_diagnostics) = document::parse_document(html)?;

        let summaries = diagnostics::summarize(&parse_diagnostics);
        diagnostics::report(url, &summaries);

        // Linked-data first, microdata attributes second; first strategy that
        // produces a candidate wins
        let locators: [&dyn Extractor; 2] = [&JsonLdLocator, &MicrodataExtractor];

        let bag = locators
            .iter()
            .find_map(|locator| locator.extract(&document))
            .ok_or(ClipError::NoRecipeFound)?;

        let mut recipe = normalize(bag)?;
        recipe.url = url.to_string();

        debug!("extracted recipe {:?} from {}", recipe.name, url);

        Ok(recipe)
    }
}

impl Default for Clipper {
    fn default() -> Self {
        Self::new(&ClipperConfig::default())
    }
}

/// Convenience wrapper: extract the recipe at `url` with default settings.
pub fn extract_recipe(url: &str) -> Result<Recipe, ClipError> {
    Clipper::default().extract(url)
}
