use crate::ast::{FindOperator, RangeOp, Scalar};
use chrono::{DateTime, Utc};

/// Filter value attached to one selector field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Explicitly unset; the field is left out of the filter.
    Undefined,
    /// The field must be NULL.
    Null,
    /// Equality, or a range bound when the key is a modifier (`lt`, `gte`, ...).
    Scalar(Scalar),
    /// The field must be one of these.
    List(Vec<Scalar>),
    /// Direct range comparison.
    Range(RangeOp, Scalar),
    /// Filter on a related/sub-entity.
    Nested(Selector),
    /// Pre-built comparator, passed through unchanged.
    Operator(FindOperator),
}

macro_rules! scalar_filter_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_filter_from!(Scalar, bool, i32, i64, u32, f64, &str, String, DateTime<Utc>);

impl From<FindOperator> for FilterValue {
    fn from(op: FindOperator) -> Self {
        FilterValue::Operator(op)
    }
}

impl From<Selector> for FilterValue {
    fn from(selector: Selector) -> Self {
        FilterValue::Nested(selector)
    }
}

/// Caller-supplied filter criteria keyed by field name.
///
/// Keys keep their insertion order; inserting an existing key replaces its
/// value in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    fields: Vec<(String, FilterValue)>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Builder form of [`Selector::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// `key = value`.
    pub fn equals(self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with(key, FilterValue::Scalar(value.into()))
    }

    /// `key IS NULL`.
    pub fn is_null(self, key: impl Into<String>) -> Self {
        self.with(key, FilterValue::Null)
    }

    /// `key IN (values...)`.
    pub fn one_of<I, V>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.with(key, FilterValue::List(values))
    }

    /// `key <op> bound`.
    pub fn range(self, key: impl Into<String>, op: RangeOp, bound: impl Into<Scalar>) -> Self {
        self.with(key, FilterValue::Range(op, bound.into()))
    }

    /// Equality when `value` is present, otherwise an undefined entry.
    pub fn maybe<V: Into<Scalar>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        let value = match value {
            Some(v) => FilterValue::Scalar(v.into()),
            None => FilterValue::Undefined,
        };
        self.with(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FilterValue> {
        self.fields.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// True when `key` is present, even if its value is undefined.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FilterValue)> for Selector {
    fn from_iter<I: IntoIterator<Item = (K, FilterValue)>>(iter: I) -> Self {
        let mut selector = Selector::new();
        for (key, value) in iter {
            selector.insert(key, value);
        }
        selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let selector = Selector::new()
            .equals("status", "pending")
            .equals("email", "a@b.c")
            .equals("status", "completed");

        let keys: Vec<&str> = selector.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["status", "email"]);
        assert_eq!(selector.get("status"), Some(&FilterValue::Scalar("completed".into())));
    }

    #[test]
    fn test_maybe_keeps_key_as_undefined() {
        let selector = Selector::new().maybe("display_id", None::<i64>);
        assert!(selector.contains_key("display_id"));
        assert_eq!(selector.get("display_id"), Some(&FilterValue::Undefined));
    }
}
