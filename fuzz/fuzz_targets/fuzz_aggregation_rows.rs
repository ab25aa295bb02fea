#![no_main]
use arbitrary::Arbitrary;
use d3tree::hierarchy::from_aggregation;
use d3tree::Aggregation;
use libfuzzer_sys::fuzz_target;
use serde_json::{Map, Value};

#[derive(Arbitrary, Debug)]
struct Row {
    keys: Vec<Option<u8>>,
    size: Option<u16>,
}

fuzz_target!(|rows: Vec<Row>| {
    let index: Vec<String> = (0..4).map(|i| format!("l{}", i)).collect();
    let table: Vec<Map<String, Value>> = rows
        .iter()
        .map(|r| {
            let mut m = Map::new();
            for (col, key) in index.iter().zip(&r.keys) {
                m.insert(col.clone(), key.map(|k| Value::from(format!("k{}", k % 8))).unwrap_or(Value::Null));
            }
            if let Some(s) = r.size {
                m.insert("vSize".into(), Value::from(s));
            }
            m
        })
        .collect();
    let tree = from_aggregation(&Aggregation::new(index, table), "root");

    // Sibling names never repeat.
    fn check(node: &d3tree::HierarchyNode) {
        let mut seen = std::collections::HashSet::new();
        for c in &node.children {
            assert!(seen.insert(c.name.clone()), "duplicate child {}", c.name);
            check(c);
        }
    }
    check(&tree);
});
