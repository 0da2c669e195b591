use crate::ast::SortOrder;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered `field -> direction` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderBy(Vec<(String, SortOrder)>);

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `field`, or replace its direction if already present.
    pub fn push(&mut self, field: impl Into<String>, order: SortOrder) {
        let field = field.into();
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some((_, slot)) => *slot = order,
            None => self.0.push((field, order)),
        }
    }

    pub fn then(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.push(field, order);
        self
    }

    pub fn get(&self, field: &str) -> Option<SortOrder> {
        self.0.iter().find(|(f, _)| f == field).map(|(_, o)| *o)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SortOrder)> {
        self.0.iter().map(|(f, o)| (f.as_str(), *o))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, SortOrder)> for OrderBy {
    fn from_iter<I: IntoIterator<Item = (K, SortOrder)>>(iter: I) -> Self {
        let mut order = OrderBy::new();
        for (field, dir) in iter {
            order.push(field, dir);
        }
        order
    }
}

impl Serialize for OrderBy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, order) in &self.0 {
            map.serialize_entry(field, order)?;
        }
        map.end()
    }
}

/// Pagination, projection and ordering options accompanying a selector.
///
/// `None` means the caller did not supply the option; the translator never
/// emits a descriptor key for it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryConfig {
    pub skip: Option<u64>,
    pub take: Option<u64>,
    /// Dot-delimited relation paths to eager-load.
    pub relations: Option<Vec<String>>,
    /// Field or dot-delimited relation paths to project.
    pub select: Option<Vec<String>>,
    pub order: Option<OrderBy>,
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn take(mut self, take: u64) -> Self {
        self.take = Some(take);
        self
    }

    pub fn relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations = Some(relations.into_iter().map(Into::into).collect());
        self
    }

    pub fn select<I, S>(mut self, select: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(select.into_iter().map(Into::into).collect());
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_serializes_in_insertion_order() {
        let order = OrderBy::new()
            .then("created_at", SortOrder::Desc)
            .then("display_id", SortOrder::Asc);
        let text = serde_json::to_string(&order).unwrap();
        assert_eq!(text, r#"{"created_at":"DESC","display_id":"ASC"}"#);
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({"created_at": "DESC", "display_id": "ASC"})
        );
    }

    #[test]
    fn test_order_push_replaces_direction() {
        let order = OrderBy::new()
            .then("created_at", SortOrder::Desc)
            .then("created_at", SortOrder::Asc);
        assert_eq!(order.len(), 1);
        assert_eq!(order.get("created_at"), Some(SortOrder::Asc));
    }
}
