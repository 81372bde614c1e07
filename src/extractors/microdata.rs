use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use super::{Extractor, RawFieldBag};

/// Fallback extractor for pages that annotate ordinary elements with
/// schema.org microdata attributes (`itemtype`, `itemprop`) instead of
/// shipping a linked-data block.
pub struct MicrodataExtractor;

/// The fixed property set scanned off the page. Aliases collapse onto the
/// canonical raw-bag keys inside the scan loop.
const SCANNED_PROPS: [&str; 12] = [
    "name",
    "image",
    "images",
    "thumbnail",
    "recipeYield",
    "keywords",
    "recipeIngredient",
    "ingredients",
    "recipeInstructions",
    "instructions",
    "steps",
    "guide",
];

fn find_recipe_container(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("[itemtype]").expect("Invalid selector");
    document.select(&selector).find(|element| {
        element
            .value()
            .attr("itemtype")
            .is_some_and(|itemtype| itemtype.contains("schema.org/Recipe"))
    })
}

fn attr_non_empty<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|value| !value.is_empty())
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

fn push_to_list(bag: &mut RawFieldBag, key: &str, value: String) {
    match bag.get_mut(key) {
        Some(Value::Array(items)) => items.push(Value::String(value)),
        _ => {
            bag.insert(key.to_string(), Value::Array(vec![Value::String(value)]));
        }
    }
}

fn has_non_empty(bag: &RawFieldBag, key: &str) -> bool {
    matches!(bag.get(key), Some(Value::String(s)) if !s.is_empty())
}

impl Extractor for MicrodataExtractor {
    fn extract(&self, document: &Html) -> Option<RawFieldBag> {
        let container = find_recipe_container(document)?;

        debug!("no linked-data block matched, scanning microdata attributes");

        let mut bag = RawFieldBag::new();

        for prop in SCANNED_PROPS {
            let selector = Selector::parse(&format!(r#"[itemprop="{}"]"#, prop))
                .expect("Invalid selector");

            for element in document.select(&selector) {
                match prop {
                    // Image variants accumulate under one key; the source
                    // attribute outranks any embedded content attribute
                    "image" | "images" | "thumbnail" => {
                        if let Some(src) = attr_non_empty(&element, "src") {
                            push_to_list(&mut bag, "image", src.to_string());
                        } else if let Some(content) = attr_non_empty(&element, "content") {
                            push_to_list(&mut bag, "image", content.to_string());
                        }
                    }
                    "recipeIngredient" | "ingredients" => {
                        let value = attr_non_empty(&element, "content")
                            .map(str::to_string)
                            .unwrap_or_else(|| element_text(&element));
                        push_to_list(&mut bag, "recipeIngredient", value);
                    }
                    "recipeInstructions" | "instructions" | "steps" | "guide" => {
                        let value = attr_non_empty(&element, "content")
                            .map(str::to_string)
                            .unwrap_or_else(|| element_text(&element));
                        push_to_list(&mut bag, "recipeInstructions", value);
                    }
                    // Scalar properties: first non-empty value wins and is
                    // never overwritten
                    _ => {
                        if has_non_empty(&bag, prop) {
                            continue;
                        }
                        let value = attr_non_empty(&element, "content")
                            .map(str::to_string)
                            .unwrap_or_else(|| element_text(&element));
                        bag.insert(prop.to_string(), Value::String(value));
                    }
                }
            }
        }

        // Last resort: treat every paragraph under the recipe element as one
        // instruction step
        let instructions_empty = match bag.get("recipeInstructions") {
            Some(Value::Array(items)) => items.is_empty(),
            _ => true,
        };

        if instructions_empty {
            let selector = Selector::parse("p").expect("Invalid selector");
            let steps: Vec<Value> = container
                .select(&selector)
                .map(|p| element_text(&p))
                .filter(|text| !text.is_empty())
                .map(Value::String)
                .collect();
            bag.insert("recipeInstructions".to_string(), Value::Array(steps));
        }

        Some(bag)
    }
}
