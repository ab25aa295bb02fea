use d3tree::{LegendEntry, NormalizeOptions, normalize_value};
use serde_json::json;

fn container(extra: serde_json::Value) -> serde_json::Value {
    let mut c = json!({"tm": [{"g": "a", "vSize": 1, "color": "#f00"}]});
    for (k, v) in extra.as_object().unwrap() {
        c.as_object_mut().unwrap().insert(k.clone(), v.clone());
    }
    c
}

#[test]
fn numeric_palette_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let c = container(json!({"palette": ["#fee", "#f88", "#f00"], "breaks": [0, 1000, 2500.5, 10000]}));
    let payload = normalize_value(c, &NormalizeOptions::default())?;
    let legend = payload.legend.expect("legend");
    assert_eq!(
        legend.iter().map(|e| e.label.as_str()).collect::<Vec<_>>(),
        vec!["0 - 1000", "1000 - 2500.5", "2500.5 - 10000"]
    );
    assert_eq!(legend[0].color, "#fee");
    assert_eq!(legend[2].range, Some([2500.5, 10000.0]));
    Ok(())
}

#[test]
fn categorical_palette() -> Result<(), Box<dyn std::error::Error>> {
    let c = container(json!({"palette": ["red", "blue"], "labels": ["Asia", "Europe"]}));
    let payload = normalize_value(c, &NormalizeOptions::default())?;
    assert_eq!(
        payload.legend,
        Some(vec![
            LegendEntry {
                color: "red".into(),
                label: "Asia".into(),
                range: None,
                category: Some("Asia".into()),
            },
            LegendEntry {
                color: "blue".into(),
                label: "Europe".into(),
                range: None,
                category: Some("Europe".into()),
            },
        ])
    );
    Ok(())
}

#[test]
fn malformed_palette_means_no_legend() -> Result<(), Box<dyn std::error::Error>> {
    for extra in [
        json!({"palette": ["red"], "breaks": [0]}),
        json!({"palette": ["red", 3], "labels": ["a", "b"]}),
        json!({"palette": "red"}),
        json!({"palette": ["red"]}),
    ] {
        let payload = normalize_value(container(extra), &NormalizeOptions::default())?;
        assert!(payload.legend.is_none());
        assert!(payload.meta.unwrap().contains_key("palette"));
    }
    Ok(())
}

#[test]
fn non_aggregation_inputs_have_no_legend() -> Result<(), Box<dyn std::error::Error>> {
    let payload = normalize_value(json!({"palette": ["red"], "labels": ["a"]}), &NormalizeOptions::default())?;
    assert!(payload.legend.is_none());
    assert!(payload.meta.is_none());
    Ok(())
}
