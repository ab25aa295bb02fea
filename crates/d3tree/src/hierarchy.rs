//! Canonical tree built from aggregation rows.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};

use crate::input::{Aggregation, LEVEL_COLUMN, SIZE_COLUMN};

/// Key holding a node's child list; reserved for the tree structure.
pub const CHILDREN_KEY: &str = "children";

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub id: String,
    pub name: String,
    pub value: Option<Number>,
    pub children: Vec<HierarchyNode>,
    /// Columns carried through unchanged (colors, color values, ...).
    pub extra: Map<String, Value>,
}

/// Keys the label, identifier and value are written under.
#[derive(Debug, Clone, Copy)]
pub struct FieldNames<'a> {
    pub celltext: &'a str,
    pub id: &'a str,
    pub value: &'a str,
}

impl HierarchyNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: None,
            children: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&HierarchyNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(HierarchyNode::node_count).sum::<usize>()
    }

    /// Encode as a widget node. Leaves carry no `children` key. Extra fields
    /// never shadow the label, identifier, value or child list.
    ///
    /// Field names that coincide share one key; the later write wins, in the
    /// order label, identifier, value.
    pub fn to_value(&self, fields: FieldNames<'_>) -> Value {
        let mut out = Map::with_capacity(self.extra.len() + 4);
        out.insert(fields.celltext.to_string(), Value::String(self.name.clone()));
        out.insert(fields.id.to_string(), Value::String(self.id.clone()));
        if let Some(v) = &self.value {
            out.insert(fields.value.to_string(), Value::Number(v.clone()));
        }
        for (k, v) in &self.extra {
            if k != CHILDREN_KEY && !out.contains_key(k) {
                out.insert(k.clone(), v.clone());
            }
        }
        if !self.children.is_empty() {
            let kids = self.children.iter().map(|c| c.to_value(fields)).collect();
            out.insert(String::from(CHILDREN_KEY), Value::Array(kids));
        }
        Value::Object(out)
    }
}

/// Rebuild the tree under a synthetic root labelled `rootname`.
///
/// A row's path is the value of each grouping level up to the first missing
/// one. Each path prefix is one node, created when first seen and reused after
/// that; children keep first-seen order. The row's own node takes the row's
/// size and remaining columns, a later row for the same path overriding an
/// earlier one. Intermediate nodes no row describes keep no value.
pub fn from_aggregation(agg: &Aggregation, rootname: &str) -> HierarchyNode {
    let mut arena = Arena::new(rootname);

    for row in &agg.rows {
        let path: Vec<String> = agg
            .index
            .iter()
            .map_while(|col| row.get(col).and_then(level_key))
            .collect();

        let mut at = 0;
        for key in &path {
            at = arena.child(at, key);
        }

        let node = &mut arena.nodes[at].node;
        for (col, cell) in row {
            if agg.index.iter().any(|c| c == col) || col == LEVEL_COLUMN {
                continue;
            }
            if col == CHILDREN_KEY {
                tracing::warn!(column = CHILDREN_KEY, "dropping reserved aggregation column");
                continue;
            }
            if col == SIZE_COLUMN {
                if let Value::Number(n) = cell {
                    node.value = Some(n.clone());
                }
                continue;
            }
            node.extra.insert(col.clone(), cell.clone());
        }
    }

    tracing::debug!(
        rows = agg.rows.len(),
        nodes = arena.nodes.len(),
        "rebuilt aggregation hierarchy"
    );
    arena.into_tree()
}

/// Level cell as a path key; null and nested values end the path.
fn level_key(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn escape_id_segment(key: &str) -> String {
    key.replace('%', "%25").replace('/', "%2F")
}

struct Slot {
    node: HierarchyNode,
    kids: Vec<usize>,
}

struct Arena {
    nodes: Vec<Slot>,
    by_parent: HashMap<(usize, String), usize>,
}

impl Arena {
    fn new(rootname: &str) -> Self {
        Self {
            nodes: vec![Slot {
                node: HierarchyNode::new(escape_id_segment(rootname), rootname),
                kids: Vec::new(),
            }],
            by_parent: HashMap::new(),
        }
    }

    fn child(&mut self, parent: usize, key: &str) -> usize {
        if let Some(&idx) = self.by_parent.get(&(parent, key.to_string())) {
            return idx;
        }
        let id = format!("{}/{}", self.nodes[parent].node.id, escape_id_segment(key));
        let idx = self.nodes.len();
        self.nodes.push(Slot {
            node: HierarchyNode::new(id, key),
            kids: Vec::new(),
        });
        self.nodes[parent].kids.push(idx);
        self.by_parent.insert((parent, key.to_string()), idx);
        idx
    }

    fn into_tree(self) -> HierarchyNode {
        let mut slots: Vec<Option<Slot>> = self.nodes.into_iter().map(Some).collect();
        assemble(&mut slots, 0)
    }
}

fn assemble(slots: &mut [Option<Slot>], idx: usize) -> HierarchyNode {
    let Some(Slot { mut node, kids }) = slots[idx].take() else {
        return HierarchyNode::new("", "");
    };
    node.children = kids.into_iter().map(|k| assemble(slots, k)).collect();
    node
}
