use d3tree::{Input, JsonSource, NormalizeOptions};
use wasm_bindgen::prelude::*;

#[cfg(feature = "size_opt")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Maximum input size in bytes (10 MB)
const MAX_INPUT_SIZE: usize = 10 * 1024 * 1024;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn check_size(s: &str) -> Result<(), String> {
    if s.len() > MAX_INPUT_SIZE {
        return Err(format!(
            "Input exceeds maximum size limit of {} bytes",
            MAX_INPUT_SIZE
        ));
    }
    Ok(())
}

/// Options JSON uses the library's camelCase keys; every key is optional.
fn parse_options(options_json: &str) -> Result<NormalizeOptions, String> {
    if options_json.trim().is_empty() {
        return Ok(NormalizeOptions::default());
    }
    serde_json::from_str(options_json).map_err(|e| format!("Invalid options: {}", e))
}

fn run(input: Input, options_json: &str) -> Result<String, String> {
    let options = parse_options(options_json)?;
    let payload = d3tree::normalize(input, &options).map_err(|e| e.to_string())?;
    payload
        .to_json_string()
        .map_err(|e| format!("JSON encoding error: {}", e))
}

/// Normalize JSON text into a d3tree payload (JSON string).
#[wasm_bindgen]
pub fn normalize_json(json_str: &str, options_json: &str) -> Result<String, String> {
    check_size(json_str)?;
    run(Input::Json(JsonSource::Text(json_str.to_string())), options_json)
}

/// Normalize a serialized treemap result container (`{"tm": [...], ...}`).
#[wasm_bindgen]
pub fn normalize_treemap(container_json: &str, options_json: &str) -> Result<String, String> {
    check_size(container_json)?;
    let value: serde_json::Value =
        serde_json::from_str(container_json).map_err(|e| format!("Invalid JSON: {}", e))?;
    let serde_json::Value::Object(container) = value else {
        return Err(String::from("Treemap container must be a JSON object"));
    };
    let agg = d3tree::Aggregation::from_container(container).map_err(|e| e.to_string())?;
    run(Input::Aggregation(agg), options_json)
}

/// Get the version of the d3tree bindings
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_json_simple() {
        let out = normalize_json(r#"{"name": ["root"]}"#, "").unwrap();
        assert_eq!(
            out,
            r#"{"data":{"name":"root"},"options":{"celltext":"name","id":"id","valueField":"size"}}"#
        );
    }

    #[test]
    fn test_normalize_treemap_with_options() {
        let container = r#"{"tm": [{"g": "a", "vSize": 2}]}"#;
        let out = normalize_treemap(container, r#"{"rootname": "Top", "clickAction": "f"}"#).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["data"]["name"], "Top");
        assert_eq!(v["data"]["children"][0]["size"], 2);
        assert_eq!(v["options"]["clickAction"], "f");
        assert_eq!(v["evals"][0], "options.clickAction");
    }

    #[test]
    fn test_invalid_options() {
        let result = normalize_json("{}", "{\"celltext\": 3}");
        assert!(result.unwrap_err().contains("Invalid options"));
    }

    #[test]
    fn test_size_limit() {
        let large_json = "x".repeat(MAX_INPUT_SIZE + 1);
        let result = normalize_json(&large_json, "");
        assert!(
            result
                .unwrap_err()
                .contains("Input exceeds maximum size limit")
        );
    }
}
