use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::ClipError;
use crate::extractors::RawFieldBag;

pub const SCHEMA_CONTEXT: &str = "http://schema.org";
pub const SCHEMA_TYPE: &str = "Recipe";

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

static WHITESPACE_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

static COMMA_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:, | ,|,)+").expect("Invalid comma regex"));

static DIGIT_RUN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("Invalid digit regex"));

/// ISO-8601-like duration: optional hours and minutes groups
static ISO_DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"P.*T(?:(\d+)H)?(?:(\d+)M)?").expect("Invalid duration regex"));

/// Clock-style duration, e.g. "1:30"
static CLOCK_DURATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+)").expect("Invalid clock regex"));

/// Paragraph/list-item bodies inside a free-text instruction blob
static STEP_TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(p|li)>(.*?)</(p|li)>").expect("Invalid step tag regex"));

/// The canonical, validated recipe record.
///
/// Every field is present and type-correct after [`normalize`]; absent or
/// malformed raw values are replaced by the documented defaults. The shape is
/// a flat schema.org Recipe mapping, suitable for direct serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub schema_type: String,
    pub name: String,
    pub image: String,
    #[serde(rename = "recipeCategory")]
    pub recipe_category: String,
    #[serde(rename = "recipeYield")]
    pub recipe_yield: u32,
    pub keywords: String,
    pub tool: Vec<String>,
    #[serde(rename = "recipeIngredient")]
    pub recipe_ingredient: Vec<String>,
    #[serde(rename = "recipeInstructions")]
    pub recipe_instructions: Vec<String>,
    pub description: String,
    pub url: String,
    #[serde(rename = "prepTime")]
    pub prep_time: String,
    #[serde(rename = "cookTime")]
    pub cook_time: String,
    #[serde(rename = "totalTime")]
    pub total_time: String,
    pub nutrition: Map<String, Value>,
}

/// Rewrite a raw field bag into the canonical record.
///
/// Field policies are order-independent; each field is normalized from
/// whatever raw value is present, with a hard default when absent. The only
/// failure is a `name` that is absent or empty after cleaning.
pub fn normalize(bag: RawFieldBag) -> Result<Recipe, ClipError> {
    let name_raw = bag.get("name").and_then(Value::as_str).unwrap_or("");
    let name = cleanup_string(name_raw, false, true);
    if name.is_empty() {
        return Err(ClipError::MissingRequiredField("name"));
    }

    Ok(Recipe {
        context: SCHEMA_CONTEXT.to_string(),
        schema_type: SCHEMA_TYPE.to_string(),
        name,
        image: normalize_image(&bag),
        recipe_category: normalize_category(bag.get("recipeCategory")),
        recipe_yield: normalize_yield(bag.get("recipeYield")),
        keywords: normalize_keywords(bag.get("keywords")),
        tool: normalize_string_list(bag.get("tool")),
        recipe_ingredient: normalize_string_list(bag.get("recipeIngredient")),
        recipe_instructions: normalize_instructions(bag.get("recipeInstructions")),
        description: match bag.get("description") {
            Some(Value::String(text)) => cleanup_string(text, true, false),
            _ => String::new(),
        },
        url: normalize_url(bag.get("url")),
        prep_time: normalize_duration(bag.get("prepTime")),
        cook_time: normalize_duration(bag.get("cookTime")),
        total_time: normalize_duration(bag.get("totalTime")),
        nutrition: normalize_nutrition(bag.get("nutrition")),
    })
}

/// Strip markup and control characters from one raw string value.
///
/// Newlines survive only when `preserve_newlines` is set; forward slashes are
/// stripped only when `remove_slashes` is set (the record name doubles as a
/// path segment downstream and cannot contain them). Entity decoding happens
/// after tag stripping, so encoded tags stay inert text.
fn cleanup_string(value: &str, preserve_newlines: bool, remove_slashes: bool) -> String {
    if value.is_empty() {
        return String::new();
    }

    let mut text = TAG_REGEX.replace_all(value, "").into_owned();

    if !preserve_newlines {
        text = text.replace(['\r', '\n'], "");
    }

    if remove_slashes {
        text = text.replace(['\t', '\\', '/'], "");
    } else {
        text = text.replace(['\t', '\\'], "");
    }

    decode_html_entities(&text).into_owned()
}

/// Loose truthiness for raw JSON values: null, false, zero, empty string,
/// "0", and empty containers all count as absent.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Among several image candidates, prefer the one whose URL embeds the
/// largest sum of integer substrings ("more digits summed = higher
/// resolution"). Ties keep the earliest-seen maximum.
fn pick_largest_resolution<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut best: Option<String> = None;
    let mut best_size: u64 = 0;

    for candidate in candidates {
        let url = match candidate {
            Value::String(s) => s.as_str(),
            Value::Object(map) => match map.get("url").and_then(Value::as_str) {
                Some(url) => url,
                None => continue,
            },
            _ => continue,
        };

        if url.is_empty() {
            continue;
        }

        let size: u64 = DIGIT_RUN_REGEX
            .find_iter(url)
            .filter_map(|m| m.as_str().parse::<u64>().ok())
            .sum();

        if best.is_none() || size > best_size {
            best = Some(url.to_string());
            best_size = size;
        }
    }

    best
}

fn normalize_image(bag: &RawFieldBag) -> String {
    let mut image = match bag.get("image") {
        Some(Value::String(url)) if !url.is_empty() => url.clone(),
        Some(Value::Object(map)) => match map.get("url").and_then(Value::as_str) {
            Some(url) => url.to_string(),
            // No url sub-field: fall back to scanning the entries
            None => pick_largest_resolution(map.values()).unwrap_or_default(),
        },
        Some(Value::Array(items)) => pick_largest_resolution(items.iter()).unwrap_or_default(),
        _ => String::new(),
    };

    // Scheme-relative URL: adopt the scheme the page itself was served under
    if image.starts_with("//") {
        let https = bag
            .get("url")
            .and_then(Value::as_str)
            .is_some_and(|url| url.starts_with("https"));
        image = format!("{}{}", if https { "https:" } else { "http:" }, image);
    }

    image = image.replace('\\', "");

    // Anything that is not a bare root-relative path gets reassembled into
    // scheme://host/path?query form, defaulting the scheme to http
    if !image.is_empty() && (image.starts_with("//") || !image.starts_with('/')) {
        image = reassemble_url(&image);
    }

    image
}

/// Rebuild a URL as `<scheme>://<host><path>[?<query>]`, defaulting the
/// scheme to `http`. A value with no scheme marker is treated as a bare path.
fn reassemble_url(raw: &str) -> String {
    let (scheme, remainder) = match raw.split_once("://") {
        Some((scheme, remainder)) => (scheme, remainder),
        None => ("http", raw),
    };
    let has_authority = raw.contains("://");

    let (remainder, query) = match remainder.split_once('?') {
        Some((remainder, query)) => (remainder, Some(query)),
        None => (remainder, None),
    };

    let (host, path) = if has_authority {
        match remainder.find('/') {
            Some(idx) => (&remainder[..idx], &remainder[idx..]),
            None => (remainder, ""),
        }
    } else {
        ("", remainder)
    };

    let mut out = format!("{}://{}{}", scheme, host, path);
    if let Some(query) = query {
        out.push('?');
        out.push_str(query);
    }
    out
}

fn normalize_category(raw: Option<&Value>) -> String {
    let text = match raw {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Array(items)) => items.first().and_then(Value::as_str).unwrap_or(""),
        _ => "",
    };
    cleanup_string(text, false, true)
}

fn normalize_yield(raw: Option<&Value>) -> u32 {
    let Some(value) = raw else { return 1 };
    if is_falsy(value) {
        return 1;
    }

    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => match items.first() {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return 1,
        },
        _ => return 1,
    };

    DIGIT_RUN_REGEX
        .find(&text)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

fn normalize_keywords(raw: Option<&Value>) -> String {
    let Some(Value::String(keywords)) = raw else {
        return String::new();
    };

    let trimmed = keywords
        .trim_matches(|c: char| matches!(c, ' ' | '\0' | '\t' | '\n' | '\x0B' | '\r' | ','));
    let stripped = TAG_REGEX.replace_all(trimmed, "");
    let collapsed = WHITESPACE_RUN_REGEX.replace_all(&stripped, " ");
    let separated = COMMA_RUN_REGEX.replace_all(&collapsed, ",");

    // De-duplication is case-sensitive and happens before per-token cleaning,
    // keeping the first occurrence's position
    let mut seen: Vec<&str> = Vec::new();
    for token in separated.split(',') {
        if !seen.contains(&token) {
            seen.push(token);
        }
    }

    seen.into_iter()
        .map(|token| cleanup_string(token, false, false))
        .collect::<Vec<_>>()
        .join(",")
}

/// Shared policy for `tool` and `recipeIngredient`: clean each element, drop
/// the ones that clean to nothing, keep order.
fn normalize_string_list(raw: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(Value::as_str)
        .map(|item| cleanup_string(item, false, false))
        .filter(|item| !item.is_empty())
        .collect()
}

fn instruction_step_text(step: &Value) -> String {
    match step {
        Value::String(text) => cleanup_string(text, true, false),
        Value::Object(map) => match map.get("text").and_then(Value::as_str) {
            Some(text) => cleanup_string(text, true, false),
            None => String::new(),
        },
        _ => String::new(),
    }
}

fn normalize_instructions(raw: Option<&Value>) -> Vec<String> {
    let steps: Vec<String> = match raw {
        Some(Value::Array(items)) => items.iter().map(instruction_step_text).collect(),
        Some(Value::Object(map)) => {
            // Some sources wrap the list in an item-list container
            match map.get("itemListElement") {
                Some(Value::Array(items)) => items.iter().map(instruction_step_text).collect(),
                _ => map.values().map(instruction_step_text).collect(),
            }
        }
        Some(Value::String(blob)) => {
            let decoded = decode_html_entities(blob).into_owned();

            let extracted: Vec<String> = STEP_TAG_REGEX
                .captures_iter(&decoded)
                .filter_map(|captures| captures.get(2))
                .map(|body| cleanup_string(body.as_str(), false, false))
                .filter(|step| !step.is_empty())
                .collect();

            if !extracted.is_empty() {
                extracted
            } else {
                // Last resort: one step per line
                decoded.split('\n').map(str::to_string).collect()
            }
        }
        _ => Vec::new(),
    };

    steps
        .into_iter()
        .map(|step| step.trim().to_string())
        .filter(|step| !step.is_empty() && step != "\n" && step != "\r")
        .collect()
}

fn normalize_url(raw: Option<&Value>) -> String {
    let Some(value) = raw else {
        return String::new();
    };
    if is_falsy(value) {
        return String::new();
    }

    let sanitized = sanitize_url(value.as_str().unwrap_or(""));
    match Url::parse(&sanitized) {
        Ok(_) => sanitized,
        Err(_) => String::new(),
    }
}

/// Keep only characters legal in a URL, mirroring a sanitize-then-validate
/// pass over the raw value.
fn sanitize_url(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "$-_.+!*'(),{}|\\^~[]`<>#%\";/?:@&=".contains(*c))
        .collect()
}

fn duration_component(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .unwrap_or_else(|| n.as_f64().unwrap_or(0.0) as i64),
        Value::String(s) => {
            let digits: String = s
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap_or(0)
        }
        Value::Bool(true) => 1,
        _ => 0,
    }
}

/// Normalize one duration field to `PT<H>H<M>M`.
///
/// A two-element pair is read as (hours, minutes). Otherwise both the
/// ISO-8601-like pattern and the clock pattern are tried in full; a later
/// pattern's non-empty groups overwrite earlier ones, so a clock-style match
/// wins over an ISO match when both are present. Minutes fold into hours
/// until below 60. An absent or empty raw value yields an empty string.
fn normalize_duration(raw: Option<&Value>) -> String {
    let Some(value) = raw else {
        return String::new();
    };
    if is_falsy(value) {
        return String::new();
    }

    let mut hours: i64 = 0;
    let mut minutes: i64 = 0;

    match value {
        Value::Array(pair) if pair.len() == 2 => {
            hours = duration_component(&pair[0]);
            minutes = duration_component(&pair[1]);
        }
        Value::Array(_) => {}
        other => {
            let text = match other {
                Value::String(s) => s.clone(),
                _ => other.to_string(),
            };

            for pattern in [&*ISO_DURATION_REGEX, &*CLOCK_DURATION_REGEX] {
                if let Some(captures) = pattern.captures(&text) {
                    if let Some(h) = captures.get(1).filter(|m| !m.as_str().is_empty()) {
                        hours = h.as_str().parse().unwrap_or(0);
                    }
                    if let Some(m) = captures.get(2).filter(|m| !m.as_str().is_empty()) {
                        minutes = m.as_str().parse().unwrap_or(0);
                    }
                }
            }
        }
    }

    while minutes >= 60 {
        minutes -= 60;
        hours += 1;
    }

    format!("PT{}H{}M", hours, minutes)
}

fn normalize_nutrition(raw: Option<&Value>) -> Map<String, Value> {
    let Some(Value::Object(map)) = raw else {
        return Map::new();
    };

    map.iter()
        .filter(|(_, value)| !is_falsy(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> RawFieldBag {
        match value {
            Value::Object(map) => map,
            _ => panic!("test bag must be an object"),
        }
    }

    #[test]
    fn test_missing_name_fails() {
        let result = normalize(bag(json!({
            "recipeIngredient": ["1 cup flour"],
            "recipeInstructions": ["Mix."]
        })));
        assert!(matches!(
            result,
            Err(ClipError::MissingRequiredField("name"))
        ));
    }

    #[test]
    fn test_name_empty_after_cleaning_fails() {
        let result = normalize(bag(json!({"name": "<b></b>"})));
        assert!(matches!(
            result,
            Err(ClipError::MissingRequiredField("name"))
        ));
    }

    #[test]
    fn test_name_is_cleaned() {
        let recipe = normalize(bag(json!({"name": "<h1>Mac &amp; Cheese\t/ Deluxe</h1>"}))).unwrap();
        assert_eq!(recipe.name, "Mac & Cheese Deluxe");
    }

    #[test]
    fn test_fixed_schema_literals() {
        let recipe = normalize(bag(json!({"name": "X", "@context": "bogus", "@type": "Thing"})))
            .unwrap();
        assert_eq!(recipe.context, "http://schema.org");
        assert_eq!(recipe.schema_type, "Recipe");
    }

    #[test]
    fn test_image_resolution_heuristic() {
        let candidates = [
            json!("photo-100.jpg"),
            json!("photo-800.jpg"),
            json!("photo-50.jpg"),
        ];
        assert_eq!(
            pick_largest_resolution(candidates.iter()),
            Some("photo-800.jpg".to_string())
        );
    }

    #[test]
    fn test_image_tie_keeps_earliest_maximum() {
        let candidates = [json!("a-800.jpg"), json!("b-800.jpg")];
        assert_eq!(
            pick_largest_resolution(candidates.iter()),
            Some("a-800.jpg".to_string())
        );
    }

    #[test]
    fn test_image_list_selection_end_to_end() {
        let recipe = normalize(bag(json!({
            "name": "Pie",
            "image": [
                "https://example.com/photo-100.jpg",
                "https://example.com/photo-800.jpg",
                "https://example.com/photo-50.jpg"
            ]
        })))
        .unwrap();
        assert_eq!(recipe.image, "https://example.com/photo-800.jpg");
    }

    #[test]
    fn test_image_object_url_subfield() {
        let recipe = normalize(bag(json!({
            "name": "Pie",
            "image": {"@type": "ImageObject", "url": "https://example.com/pie.jpg"}
        })))
        .unwrap();
        assert_eq!(recipe.image, "https://example.com/pie.jpg");
    }

    #[test]
    fn test_image_scheme_relative_follows_page_scheme() {
        let recipe = normalize(bag(json!({
            "name": "Pie",
            "image": "//cdn.example.com/pie.jpg",
            "url": "https://example.com/pie"
        })))
        .unwrap();
        assert_eq!(recipe.image, "https://cdn.example.com/pie.jpg");

        let recipe = normalize(bag(json!({
            "name": "Pie",
            "image": "//cdn.example.com/pie.jpg"
        })))
        .unwrap();
        assert_eq!(recipe.image, "http://cdn.example.com/pie.jpg");
    }

    #[test]
    fn test_image_without_scheme_gets_default() {
        let recipe = normalize(bag(json!({
            "name": "Pie",
            "image": "photo-800.jpg"
        })))
        .unwrap();
        assert_eq!(recipe.image, "http://photo-800.jpg");
    }

    #[test]
    fn test_image_root_relative_path_kept() {
        let recipe = normalize(bag(json!({
            "name": "Pie",
            "image": "/images/pie.jpg"
        })))
        .unwrap();
        assert_eq!(recipe.image, "/images/pie.jpg");
    }

    #[test]
    fn test_image_query_preserved_on_reassembly() {
        let recipe = normalize(bag(json!({
            "name": "Pie",
            "image": "https://example.com/pie.jpg?w=1200"
        })))
        .unwrap();
        assert_eq!(recipe.image, "https://example.com/pie.jpg?w=1200");
    }

    #[test]
    fn test_image_non_string_becomes_empty() {
        let recipe = normalize(bag(json!({"name": "Pie", "image": 42}))).unwrap();
        assert_eq!(recipe.image, "");
    }

    #[test]
    fn test_category_array_takes_first() {
        let recipe = normalize(bag(json!({
            "name": "Pie",
            "recipeCategory": ["Dessert/Baking", "Holiday"]
        })))
        .unwrap();
        assert_eq!(recipe.recipe_category, "DessertBaking");
    }

    #[test]
    fn test_yield_digits_anywhere() {
        let recipe = normalize(bag(json!({"name": "X", "recipeYield": "Serves 4 people"}))).unwrap();
        assert_eq!(recipe.recipe_yield, 4);
    }

    #[test]
    fn test_yield_without_digits_defaults() {
        let recipe = normalize(bag(json!({"name": "X", "recipeYield": "none"}))).unwrap();
        assert_eq!(recipe.recipe_yield, 1);

        let recipe = normalize(bag(json!({"name": "X"}))).unwrap();
        assert_eq!(recipe.recipe_yield, 1);
    }

    #[test]
    fn test_yield_numeric_and_array_forms() {
        let recipe = normalize(bag(json!({"name": "X", "recipeYield": 6}))).unwrap();
        assert_eq!(recipe.recipe_yield, 6);

        let recipe = normalize(bag(json!({"name": "X", "recipeYield": ["8 slices", "4 servings"]})))
            .unwrap();
        assert_eq!(recipe.recipe_yield, 8);
    }

    #[test]
    fn test_keyword_deduplication_is_case_sensitive() {
        let recipe = normalize(bag(json!({"name": "X", "keywords": "soup, Soup,soup ,stew"})))
            .unwrap();
        assert_eq!(recipe.keywords, "soup,Soup,stew");
    }

    #[test]
    fn test_keywords_cleaned_and_trimmed() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "keywords": " ,<b>winter</b>,  comfort   food,, "
        })))
        .unwrap();
        assert_eq!(recipe.keywords, "winter,comfort food");
    }

    #[test]
    fn test_keywords_non_string_becomes_empty() {
        let recipe = normalize(bag(json!({"name": "X", "keywords": ["a", "b"]}))).unwrap();
        assert_eq!(recipe.keywords, "");
    }

    #[test]
    fn test_tool_and_ingredient_lists_cleaned() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "tool": ["<b>whisk</b>", "", "9x13 pan"],
            "recipeIngredient": ["1/2 cup sugar", "<i></i>", "2 eggs\n"]
        })))
        .unwrap();
        assert_eq!(recipe.tool, vec!["whisk", "9x13 pan"]);
        assert_eq!(recipe.recipe_ingredient, vec!["1/2 cup sugar", "2 eggs"]);
    }

    #[test]
    fn test_instructions_drop_empty_and_bare_newline_steps() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "recipeInstructions": ["Step one.\n", "", "\r", "Step two."]
        })))
        .unwrap();
        assert_eq!(recipe.recipe_instructions, vec!["Step one.", "Step two."]);
    }

    #[test]
    fn test_instructions_object_steps_use_text_field() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "recipeInstructions": [
                {"@type": "HowToStep", "text": "Preheat the oven."},
                {"@type": "HowToStep", "image": "step.jpg"},
                "Serve warm."
            ]
        })))
        .unwrap();
        assert_eq!(
            recipe.recipe_instructions,
            vec!["Preheat the oven.", "Serve warm."]
        );
    }

    #[test]
    fn test_instructions_item_list_container_unwrapped() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "recipeInstructions": {
                "@type": "ItemList",
                "itemListElement": [
                    {"text": "Chop the vegetables."},
                    {"text": "Roast them."}
                ]
            }
        })))
        .unwrap();
        assert_eq!(
            recipe.recipe_instructions,
            vec!["Chop the vegetables.", "Roast them."]
        );
    }

    #[test]
    fn test_instructions_string_extracts_paragraphs_in_order() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "recipeInstructions": "<p>First step.</p><li>Second step.</li><p></p>"
        })))
        .unwrap();
        assert_eq!(
            recipe.recipe_instructions,
            vec!["First step.", "Second step."]
        );
    }

    #[test]
    fn test_instructions_string_falls_back_to_line_split() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "recipeInstructions": "Boil water.\nAdd pasta.\n\nDrain."
        })))
        .unwrap();
        assert_eq!(
            recipe.recipe_instructions,
            vec!["Boil water.", "Add pasta.", "Drain."]
        );
    }

    #[test]
    fn test_description_preserves_newlines() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "description": "<p>Line one.</p>\nLine two."
        })))
        .unwrap();
        assert_eq!(recipe.description, "Line one.\nLine two.");
    }

    #[test]
    fn test_url_validation() {
        let recipe = normalize(bag(json!({"name": "X", "url": "https://example.com/pie"})))
            .unwrap();
        assert_eq!(recipe.url, "https://example.com/pie");

        let recipe = normalize(bag(json!({"name": "X", "url": "not a url"}))).unwrap();
        assert_eq!(recipe.url, "");

        let recipe = normalize(bag(json!({"name": "X"}))).unwrap();
        assert_eq!(recipe.url, "");
    }

    #[test]
    fn test_duration_pair_folds_minutes() {
        let recipe = normalize(bag(json!({"name": "X", "prepTime": [0, 125]}))).unwrap();
        assert_eq!(recipe.prep_time, "PT2H5M");
    }

    #[test]
    fn test_duration_iso_folds_minutes() {
        let recipe = normalize(bag(json!({"name": "X", "cookTime": "PT1H90M"}))).unwrap();
        assert_eq!(recipe.cook_time, "PT2H30M");
    }

    #[test]
    fn test_duration_clock_pattern() {
        let recipe = normalize(bag(json!({"name": "X", "totalTime": "1:30"}))).unwrap();
        assert_eq!(recipe.total_time, "PT1H30M");
    }

    #[test]
    fn test_duration_clock_overrides_iso_when_both_match() {
        // Known quirk: the clock pattern is tried after the ISO pattern and
        // its non-empty groups win
        let recipe = normalize(bag(json!({"name": "X", "totalTime": "PT2H30M or 0:45"}))).unwrap();
        assert_eq!(recipe.total_time, "PT0H45M");
    }

    #[test]
    fn test_duration_absent_stays_empty() {
        let recipe = normalize(bag(json!({"name": "X", "prepTime": ""}))).unwrap();
        assert_eq!(recipe.prep_time, "");
        assert_eq!(recipe.cook_time, "");
        assert_eq!(recipe.total_time, "");
    }

    #[test]
    fn test_duration_minutes_only_iso() {
        let recipe = normalize(bag(json!({"name": "X", "cookTime": "PT45M"}))).unwrap();
        assert_eq!(recipe.cook_time, "PT0H45M");
    }

    #[test]
    fn test_nutrition_drops_falsy_entries() {
        let recipe = normalize(bag(json!({
            "name": "X",
            "nutrition": {
                "@type": "NutritionInformation",
                "calories": "240 kcal",
                "fatContent": "",
                "sugarContent": null,
                "sodiumContent": 0
            }
        })))
        .unwrap();
        assert_eq!(recipe.nutrition.len(), 2);
        assert_eq!(
            recipe.nutrition.get("calories"),
            Some(&json!("240 kcal"))
        );
        assert!(recipe.nutrition.contains_key("@type"));
        assert!(!recipe.nutrition.contains_key("fatContent"));
    }

    #[test]
    fn test_nutrition_non_object_becomes_empty() {
        let recipe = normalize(bag(json!({"name": "X", "nutrition": "240 kcal"}))).unwrap();
        assert!(recipe.nutrition.is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let first = normalize(bag(json!({
            "name": "Lentil <b>Soup</b>",
            "image": [
                "https://example.com/soup-200.jpg",
                "https://example.com/soup-1200.jpg"
            ],
            "recipeCategory": "Dinner",
            "recipeYield": "4 bowls",
            "keywords": "soup, lentils, soup",
            "tool": ["dutch oven"],
            "recipeIngredient": ["1 cup lentils", "4 cups stock"],
            "recipeInstructions": [
                {"@type": "HowToStep", "text": "Rinse the lentils."},
                {"@type": "HowToStep", "text": "Simmer 30 minutes."}
            ],
            "description": "A weeknight staple.",
            "url": "https://example.com/lentil-soup",
            "prepTime": "PT10M",
            "cookTime": "PT1H90M",
            "nutrition": {"calories": "300 kcal", "fatContent": ""}
        })))
        .unwrap();

        let refed = match serde_json::to_value(&first).unwrap() {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let second = normalize(refed).unwrap();

        assert_eq!(first, second);
    }
}
