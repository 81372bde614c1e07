use scraper::Html;

mod json_ld;
mod microdata;

pub use self::json_ld::JsonLdLocator;
pub use self::microdata::MicrodataExtractor;

/// Loosely-typed extraction result: an open string key space mapped to values
/// of whatever shape the source markup carried (string, list, nested object).
/// The normalizer is the single chokepoint that rewrites this into the
/// canonical record.
pub type RawFieldBag = serde_json::Map<String, serde_json::Value>;

pub trait Extractor {
    /// Attempt to assemble a raw recipe field bag from the parsed document.
    /// `None` means this strategy found no recipe candidate at all.
    fn extract(&self, document: &Html) -> Option<RawFieldBag>;
}
