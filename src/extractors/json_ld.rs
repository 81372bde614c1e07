use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use super::{Extractor, RawFieldBag};

/// Locates an embedded linked-data (`application/ld+json`) recipe block.
///
/// The primary extraction path: most recipe sites ship a complete schema.org
/// Recipe object in a script block, in one of several container shapes.
pub struct JsonLdLocator;

/// Some recipes have raw newlines inside JSON string literals, which is
/// invalid per strict JSON. Collapsing every whitespace run to a single space
/// repairs the common case before decoding.
static WHITESPACE_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

fn is_recipe(value: &Value) -> bool {
    value.get("@type") == Some(&Value::String("Recipe".to_string()))
}

/// Resolve one decoded linked-data value to a recipe field bag, handling the
/// container shapes seen in the wild:
/// 1. an `@graph` aggregate whose items include a Recipe,
/// 2. a bare array whose elements include a Recipe (first match wins),
/// 3. the object itself carrying `@type: Recipe`.
fn resolve_candidate(value: Value) -> Option<RawFieldBag> {
    match value {
        Value::Object(object) => {
            if let Some(Value::Array(graph)) = object.get("@graph") {
                for item in graph {
                    if is_recipe(item) {
                        if let Value::Object(map) = item.clone() {
                            return Some(map);
                        }
                    }
                }
            }

            if object.get("@type") == Some(&Value::String("Recipe".to_string())) {
                return Some(object);
            }

            None
        }
        Value::Array(items) => items.into_iter().find_map(|item| {
            if is_recipe(&item) {
                match item {
                    Value::Object(map) => Some(map),
                    _ => None,
                }
            } else {
                None
            }
        }),
        _ => None,
    }
}

impl Extractor for JsonLdLocator {
    fn extract(&self, document: &Html) -> Option<RawFieldBag> {
        let selector =
            Selector::parse(r#"[type="application/ld+json"]"#).expect("Invalid selector");

        // First block that yields a usable object wins; document order is the
        // tie-break. A block that fails to decode is skipped, not fatal.
        for element in document.select(&selector) {
            let body = element.inner_html();
            if body.trim().is_empty() {
                continue;
            }

            let repaired = WHITESPACE_RUN_REGEX.replace_all(&body, " ");

            let value: Value = match serde_json::from_str(&repaired) {
                Ok(value) => value,
                Err(err) => {
                    debug!("skipping undecodable linked-data block: {}", err);
                    continue;
                }
            };

            if let Some(bag) = resolve_candidate(value) {
                return Some(bag);
            }
        }

        None
    }
}
