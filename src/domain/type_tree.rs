//! CED type hierarchy as a recursive tree.
//!
//! The server delivers the hierarchy as nested JSON objects: every key is a
//! type name, every value either another object (subtypes) or an empty
//! marker. `TypeNode` captures exactly that shape.

use serde_json::Value;
use termtree::Tree;
use tracing::{instrument, trace};

use crate::domain::error::DomainError;

/// A node in the type hierarchy.
///
/// Children keep the order the server sent them in, so lineage paths are
/// reproducible across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeNode {
    /// Terminal type without subtypes
    #[default]
    Leaf,
    /// Type with named subtypes
    Internal(Vec<(String, TypeNode)>),
}

/// Case-insensitive type name comparison.
pub fn same_type(a: &str, b: &str) -> bool {
    a == b || a.to_uppercase() == b.to_uppercase()
}

impl TypeNode {
    /// Build the hierarchy from a decoded type-tree document.
    ///
    /// The root must be a JSON object. Below the root, an object with at
    /// least one key is an internal node; empty objects, `null` and scalars
    /// are leaves.
    pub fn from_json(document: &Value) -> Result<Self, DomainError> {
        match document {
            Value::Object(map) => Ok(TypeNode::Internal(
                map.iter()
                    .map(|(name, value)| (name.clone(), Self::from_value(value)))
                    .collect(),
            )),
            other => Err(DomainError::MalformedTree {
                found: json_kind(other).to_string(),
            }),
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) if !map.is_empty() => TypeNode::Internal(
                map.iter()
                    .map(|(name, value)| (name.clone(), Self::from_value(value)))
                    .collect(),
            ),
            _ => TypeNode::Leaf,
        }
    }

    /// Build an internal node from `(name, child)` pairs.
    pub fn internal<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = (S, TypeNode)>,
        S: Into<String>,
    {
        TypeNode::Internal(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeNode::Leaf)
    }

    /// Direct children in server order (empty for leaves).
    pub fn children(&self) -> &[(String, TypeNode)] {
        match self {
            TypeNode::Leaf => &[],
            TypeNode::Internal(children) => children,
        }
    }

    /// Number of named types below this node.
    pub fn len(&self) -> usize {
        self.children()
            .iter()
            .map(|(_, child)| 1 + child.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// All type names below this node, depth-first in server order.
    pub fn type_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.len());
        collect_names(self, &mut names);
        names
    }

    /// Path of type names from the top of this tree down to `type_name`,
    /// inclusive.
    ///
    /// Siblings are tried in order and the first match wins; a key that
    /// matches is not descended into. Returns `None` when no node matches.
    #[instrument(level = "trace", skip(self))]
    pub fn lineage(&self, type_name: &str) -> Option<Vec<String>> {
        let mut reversed = find_reversed_path(self.children(), type_name)?;
        reversed.reverse();
        trace!("lineage of {}: {:?}", type_name, reversed);
        Some(reversed)
    }

    /// True if `ancestor` is `descendant` itself or appears above it.
    ///
    /// `ancestor` is not looked up in the tree; it is only compared against
    /// the names on the descendant's lineage.
    pub fn is_a(&self, ancestor: &str, descendant: &str) -> Result<bool, DomainError> {
        let lineage = self
            .lineage(descendant)
            .ok_or_else(|| DomainError::TypeNotFound(descendant.to_string()))?;
        Ok(lineage.iter().any(|name| same_type(name, ancestor)))
    }

    /// The node stored under `type_name`, wherever it sits in the tree.
    pub fn find(&self, type_name: &str) -> Option<&TypeNode> {
        for (name, child) in self.children() {
            if same_type(name, type_name) {
                return Some(child);
            }
            if let Some(found) = child.find(type_name) {
                return Some(found);
            }
        }
        None
    }

    /// Render for terminal display with `label` as the root line.
    pub fn to_display_tree(&self, label: impl Into<String>) -> Tree<String> {
        let leaves: Vec<Tree<String>> = self
            .children()
            .iter()
            .map(|(name, child)| child.to_display_tree(name.clone()))
            .collect();
        Tree::new(label.into()).with_leaves(leaves)
    }
}

fn find_reversed_path(children: &[(String, TypeNode)], type_name: &str) -> Option<Vec<String>> {
    for (name, child) in children {
        if same_type(name, type_name) {
            return Some(vec![name.clone()]);
        }
        if let TypeNode::Internal(grandchildren) = child {
            if let Some(mut path) = find_reversed_path(grandchildren, type_name) {
                path.push(name.clone());
                return Some(path);
            }
        }
    }
    None
}

fn collect_names(node: &TypeNode, names: &mut Vec<String>) {
    for (name, child) in node.children() {
        names.push(name.clone());
        collect_names(child, names);
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TypeNode {
        TypeNode::from_json(&json!({
            "Magnet": {"Quad": {}, "Dipole": {}},
            "IOC": {"PC104": {}}
        }))
        .expect("valid tree")
    }

    #[test]
    fn given_nested_document_when_converting_then_keeps_sibling_order() {
        let tree = sample();
        let names: Vec<&str> = tree.children().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["Magnet", "IOC"]);
        assert_eq!(
            tree.type_names(),
            vec!["Magnet", "Quad", "Dipole", "IOC", "PC104"]
        );
    }

    #[test]
    fn given_empty_object_or_scalar_value_when_converting_then_is_leaf() {
        let tree = TypeNode::from_json(&json!({"A": {}, "B": null, "C": ""})).unwrap();
        assert!(tree.children().iter().all(|(_, child)| child.is_leaf()));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn given_array_root_when_converting_then_malformed() {
        let err = TypeNode::from_json(&json!(["Magnet"])).unwrap_err();
        assert_eq!(
            err,
            DomainError::MalformedTree {
                found: "an array".to_string()
            }
        );
    }

    #[test]
    fn given_nested_type_when_lineage_then_returns_full_path() {
        assert_eq!(
            sample().lineage("Dipole"),
            Some(vec!["Magnet".to_string(), "Dipole".to_string()])
        );
    }

    #[test]
    fn given_absent_type_when_lineage_then_none() {
        assert_eq!(sample().lineage("Klystron"), None);
    }

    #[test]
    fn given_duplicate_name_when_lineage_then_first_in_order_wins() {
        let tree = TypeNode::internal([
            ("A", TypeNode::internal([("Shared", TypeNode::Leaf)])),
            ("B", TypeNode::internal([("Shared", TypeNode::Leaf)])),
        ]);
        assert_eq!(
            tree.lineage("shared"),
            Some(vec!["A".to_string(), "Shared".to_string()])
        );
    }

    #[test]
    fn given_unknown_descendant_when_is_a_then_type_not_found() {
        assert_eq!(
            sample().is_a("Magnet", "Nope"),
            Err(DomainError::TypeNotFound("Nope".to_string()))
        );
    }

    #[test]
    fn given_subtree_when_find_then_returns_node() {
        let tree = sample();
        let magnet = tree.find("magnet").expect("magnet present");
        assert_eq!(magnet.type_names(), vec!["Quad", "Dipole"]);
        assert!(tree.find("Quad").map(TypeNode::is_leaf).unwrap_or(false));
    }

    #[test]
    fn given_tree_when_rendering_then_contains_all_names() {
        let rendered = sample().to_display_tree("CED").to_string();
        for name in ["CED", "Magnet", "Quad", "Dipole", "IOC", "PC104"] {
            assert!(rendered.contains(name), "missing {name} in\n{rendered}");
        }
    }
}
