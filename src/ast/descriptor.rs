use crate::ast::{FindOperator, OrderBy, Scalar};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One entry of a normalized filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereNode {
    Equals(Scalar),
    Operator(FindOperator),
    Nested(WhereTree),
}

impl Serialize for WhereNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WhereNode::Equals(v) => v.serialize(serializer),
            WhereNode::Operator(op) => op.serialize(serializer),
            WhereNode::Nested(tree) => tree.serialize(serializer),
        }
    }
}

/// Normalized filter tree, keyed by field name in selector order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereTree(Vec<(String, WhereNode)>);

impl WhereTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, node: WhereNode) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = node,
            None => self.0.push((key, node)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&WhereNode> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, n)| n)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WhereNode)> {
        self.0.iter().map(|(k, n)| (k.as_str(), n))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for WhereTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, node) in &self.0 {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

/// Relation or projection paths, serialized as `{"<path>": true, ...}`.
///
/// Dotted paths are stored whole as single keys; see
/// [`build_path_tree`](crate::transpiler::build_path_tree).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PathTree(Vec<String>);

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mark(&mut self, path: &str) {
        if !self.contains(path) {
            self.0.push(path.to_string());
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.iter().any(|p| p == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PathTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for path in &self.0 {
            map.serialize_entry(path, &true)?;
        }
        map.end()
    }
}

/// Backend-agnostic query, ready for a persistence layer's `find`.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    #[serde(rename = "where")]
    pub filter: WhereTree,
    /// Set only when the selector names the soft-delete field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_deleted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<PathTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<PathTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderBy>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_descriptor_has_only_where() {
        let json = serde_json::to_value(QueryDescriptor::default()).unwrap();
        assert_eq!(json, json!({"where": {}}));
    }

    #[test]
    fn test_path_tree_marks_once() {
        let mut tree = PathTree::new();
        tree.mark("items");
        tree.mark("items");
        tree.mark("items.variant");
        assert_eq!(tree.len(), 2);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"items": true, "items.variant": true})
        );
    }
}
