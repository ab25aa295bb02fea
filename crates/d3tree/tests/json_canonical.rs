use d3tree::canonical::{canonicalize, parse_canonical, table_columns, to_canonical_string};
use d3tree::{Input, NormalizeOptions, normalize};
use serde_json::json;

#[test]
fn one_row_table_stays_an_array() -> Result<(), Box<dyn std::error::Error>> {
    let payload = normalize(
        Input::from(r#"{"children": [{"name": "X"}]}"#),
        &NormalizeOptions::default(),
    )?;
    assert_eq!(payload.data.as_encoded(), Some(r#"{"children":[{"name":"X"}]}"#));
    Ok(())
}

#[test]
fn scalar_singletons_are_unboxed() -> Result<(), Box<dyn std::error::Error>> {
    let out = to_canonical_string(&json!({"name": ["root"], "tags": ["a", "b"], "size": [[3]]}))?;
    assert_eq!(out, r#"{"name":"root","tags":["a","b"],"size":3}"#);
    Ok(())
}

#[test]
fn table_rows_use_column_order() -> Result<(), Box<dyn std::error::Error>> {
    let out = to_canonical_string(&json!([
        {"name": "a", "size": 1},
        {"size": 2, "name": "b", "color": "red"}
    ]))?;
    assert_eq!(out, r#"[{"name":"a","size":1},{"name":"b","size":2,"color":"red"}]"#);
    Ok(())
}

#[test]
fn table_detection() {
    let rows = vec![json!({"a": 1}), json!({"b": 2, "a": 3})];
    assert_eq!(table_columns(&rows), Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(table_columns(&[json!({"a": 1}), json!(2)]), None);
    assert_eq!(table_columns(&[]), None);
}

#[test]
fn canonical_output_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let input = r#"{"name": "flare", "children": [
        {"name": "analytics", "children": [{"size": 3938, "name": "cluster", "tags": ["x"]}]},
        {"name": "util", "size": [743], "children": []}
    ]}"#;
    let canonical = parse_canonical(input)?;
    let text = serde_json::to_string(&canonical)?;
    let reparsed: serde_json::Value = serde_json::from_str(&text)?;
    assert_eq!(reparsed, canonical);
    assert_eq!(canonicalize(&reparsed), canonical);
    assert_eq!(to_canonical_string(&reparsed)?, text);
    Ok(())
}

#[test]
fn numbers_are_not_rounded() -> Result<(), Box<dyn std::error::Error>> {
    let out = to_canonical_string(&json!({"v": 1234.56789, "n": -7}))?;
    assert_eq!(out, r#"{"v":1234.56789,"n":-7}"#);
    Ok(())
}

#[test]
fn number_text_survives_beyond_native_precision() -> Result<(), Box<dyn std::error::Error>> {
    let text = r#"{"big":18446744073709551617,"d":0.10000000000000000001}"#;
    assert_eq!(to_canonical_string(&parse_canonical(text)?)?, text);

    let payload = normalize(Input::from(text), &NormalizeOptions::default())?;
    assert_eq!(payload.data.as_encoded(), Some(text));
    Ok(())
}
