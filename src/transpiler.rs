//! Selector-to-query translation.
//!
//! Converts a [`Selector`] and a [`QueryConfig`] into a [`QueryDescriptor`].
//! Translation is a pure function of its inputs and never fails.

use crate::ast::*;

/// Soft-delete timestamp field looked for when no other name is configured.
pub const DEFAULT_SOFT_DELETE_FIELD: &str = "deleted_at";

/// Knobs for [`Translator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// A selector naming this field at the top level gets `withDeleted`.
    pub soft_delete_field: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            soft_delete_field: DEFAULT_SOFT_DELETE_FIELD.to_string(),
        }
    }
}

/// Turns selectors and query configs into query descriptors.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    options: TranslateOptions,
}

impl Translator {
    pub fn new(options: TranslateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    /// Build the descriptor for `selector` under `config`.
    ///
    /// Configuration fields left as `None` produce no descriptor key.
    pub fn translate(&self, selector: &Selector, config: &QueryConfig) -> QueryDescriptor {
        let mut query = QueryDescriptor {
            filter: build_where(selector),
            ..Default::default()
        };

        // Key presence is enough, even with an undefined value.
        if selector.contains_key(&self.options.soft_delete_field) {
            query.with_deleted = Some(true);
        }

        query.skip = config.skip;
        query.take = config.take;

        if let Some(relations) = &config.relations {
            query.relations = Some(build_path_tree(relations.as_slice()));
        }

        if let Some(select) = &config.select {
            query.select = Some(build_path_tree(select.as_slice()));
        }

        query.order = config.order.clone();

        tracing::debug!(
            "Translated selector ({} fields -> {} filters, with_deleted={})",
            selector.len(),
            query.filter.len(),
            query.with_deleted.unwrap_or(false)
        );

        query
    }
}

/// Trait for converting a selector into a query descriptor with default options.
pub trait ToQuery {
    fn to_query(&self, config: &QueryConfig) -> QueryDescriptor;
}

impl ToQuery for Selector {
    fn to_query(&self, config: &QueryConfig) -> QueryDescriptor {
        Translator::default().translate(self, config)
    }
}

/// Normalize a selector into a filter tree.
pub fn build_where(selector: &Selector) -> WhereTree {
    let mut tree = WhereTree::new();

    for (key, value) in selector.iter() {
        let node = match value {
            FilterValue::Undefined => continue,
            FilterValue::Null => WhereNode::Operator(FindOperator::IsNull),
            FilterValue::Operator(op) => WhereNode::Operator(op.clone()),
            FilterValue::List(values) => WhereNode::Operator(FindOperator::In(values.clone())),
            FilterValue::Range(op, bound) => WhereNode::Operator(op.apply(bound.clone())),
            FilterValue::Nested(inner) => match collapse_range(inner) {
                Some(op) => WhereNode::Operator(op),
                None => WhereNode::Nested(build_where(inner)),
            },
            FilterValue::Scalar(v) => match RangeOp::from_key(key) {
                Some(op) => WhereNode::Operator(op.apply(v.clone())),
                None => WhereNode::Equals(v.clone()),
            },
        };
        tree.insert(key, node);
    }

    tree
}

/// A nested selector made only of range modifiers (`{lt: 5, gte: 1}`)
/// constrains the parent field itself.
fn collapse_range(selector: &Selector) -> Option<FindOperator> {
    let mut ops = Vec::new();

    for (key, value) in selector.iter() {
        let op = RangeOp::from_key(key)?;
        match value {
            FilterValue::Scalar(bound) => ops.push(op.apply(bound.clone())),
            FilterValue::Undefined => {}
            _ => return None,
        }
    }

    match ops.len() {
        0 => None,
        1 => ops.pop(),
        _ => Some(FindOperator::And(ops)),
    }
}

/// Build a relation/select path tree.
///
/// A path without dots becomes a leaf. A dotted path is stored whole as one
/// leaf, unless every one of its segments is already a key of the tree, in
/// which case it is dropped. So `["a", "a.b"]` gives `{a, "a.b"}` while
/// `["a", "b", "a.b"]` gives `{a, b}`.
pub fn build_path_tree<S: AsRef<str>>(paths: &[S]) -> PathTree {
    let mut tree = PathTree::new();

    for path in paths {
        let path = path.as_ref();

        if !path.contains('.') {
            tree.mark(path);
            continue;
        }

        if path.split('.').all(|segment| tree.contains(segment)) {
            tracing::debug!("Dropped path '{}': all segments already present", path);
        } else {
            tree.mark(path);
        }
    }

    tree
}
