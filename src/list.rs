//! List and retrieve request resolution.
//!
//! A resource declares which fields and relations it returns by default and
//! which ones a caller may ask for. [`ListRules`] applies those rules to the
//! parsed query string ([`ListParams`]) and produces the [`QueryConfig`] that
//! goes to the translator alongside [`ListParams::selector`].

use serde::Deserialize;

use crate::ast::*;
use crate::error::{QueryError, QueryResult};
use crate::parser::list_params::parse_order;

/// A parsed list/retrieve query string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
    pub fields: Option<Vec<String>>,
    pub expand: Option<Vec<String>>,
    pub order: Option<OrderBy>,
    /// Every non-reserved key, as selector entries.
    pub filters: Selector,
}

impl ListParams {
    /// The selector built from the filter keys.
    pub fn selector(&self) -> &Selector {
        &self.filters
    }
}

/// Per-resource defaults and allow lists.
///
/// An empty allow list accepts anything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ListRules {
    pub default_fields: Vec<String>,
    pub default_relations: Vec<String>,
    pub allowed_fields: Vec<String>,
    pub allowed_relations: Vec<String>,
    pub default_limit: Option<u64>,
    /// Written like the `order` query parameter, e.g. `-created_at`.
    pub default_order: Option<String>,
}

impl ListRules {
    /// Config for a paginated list request.
    ///
    /// `skip` is always set (offset or 0); `take` falls back to
    /// `default_limit`; `order` falls back to `default_order`.
    pub fn resolve_list(&self, params: &ListParams) -> QueryResult<QueryConfig> {
        let mut config = self.resolve_retrieve(params)?;

        config.skip = Some(params.offset.unwrap_or(0));
        config.take = params.limit.or(self.default_limit);

        config.order = match &params.order {
            Some(order) => {
                if !self.allowed_fields.is_empty() {
                    let fields: Vec<String> = order.iter().map(|(f, _)| f.to_string()).collect();
                    check_allowed(&self.allowed_fields, &fields, "Order fields")?;
                }
                Some(order.clone())
            }
            None => self.default_order()?,
        };

        Ok(config)
    }

    /// Config for a single-record request: projection and relations only.
    pub fn resolve_retrieve(&self, params: &ListParams) -> QueryResult<QueryConfig> {
        let mut config = QueryConfig::default();

        config.select = match &params.fields {
            Some(fields) => {
                check_allowed(&self.allowed_fields, fields, "Fields")?;
                Some(fields.clone())
            }
            None => non_empty(&self.default_fields),
        };

        config.relations = match &params.expand {
            Some(relations) => {
                check_allowed(&self.allowed_relations, relations, "Relations")?;
                Some(relations.clone())
            }
            None => non_empty(&self.default_relations),
        };

        Ok(config)
    }

    fn default_order(&self) -> QueryResult<Option<OrderBy>> {
        match &self.default_order {
            Some(text) => parse_order(text)
                .map(Some)
                .map_err(|message| QueryError::Settings(format!("default_order: {}", message))),
            None => Ok(None),
        }
    }
}

fn non_empty(items: &[String]) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items.to_vec())
    }
}

fn check_allowed(allowed: &[String], requested: &[String], kind: &'static str) -> QueryResult<()> {
    if allowed.is_empty() {
        return Ok(());
    }
    let rejected: Vec<String> = requested
        .iter()
        .filter(|name| !allowed.contains(*name))
        .cloned()
        .collect();
    if rejected.is_empty() {
        Ok(())
    } else {
        Err(QueryError::not_allowed(kind, &rejected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_list_params;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn variant_rules() -> ListRules {
        ListRules {
            default_fields: strings(&["id", "title", "sku"]),
            default_relations: strings(&["product", "prices", "options"]),
            allowed_fields: strings(&["id", "title", "sku", "created_at"]),
            allowed_relations: strings(&["product", "prices", "options"]),
            default_limit: Some(20),
            default_order: Some("-created_at".to_string()),
        }
    }

    #[test]
    fn test_defaults_apply() {
        let config = variant_rules()
            .resolve_list(&ListParams::default())
            .unwrap();
        assert_eq!(config.skip, Some(0));
        assert_eq!(config.take, Some(20));
        assert_eq!(config.select, Some(strings(&["id", "title", "sku"])));
        assert_eq!(config.relations, Some(strings(&["product", "prices", "options"])));
        assert_eq!(
            config.order,
            Some(OrderBy::new().then("created_at", SortOrder::Desc))
        );
    }

    #[test]
    fn test_requested_values_override_defaults() {
        let params = parse_list_params("offset=40&limit=10&fields=id&expand=prices&order=title").unwrap();
        let config = variant_rules().resolve_list(&params).unwrap();
        assert_eq!(config.skip, Some(40));
        assert_eq!(config.take, Some(10));
        assert_eq!(config.select, Some(strings(&["id"])));
        assert_eq!(config.relations, Some(strings(&["prices"])));
        assert_eq!(config.order, Some(OrderBy::new().then("title", SortOrder::Asc)));
    }

    #[test]
    fn test_disallowed_fields_are_rejected() {
        let params = parse_list_params("fields=id,ean,upc").unwrap();
        let err = variant_rules().resolve_list(&params).unwrap_err();
        assert_eq!(err.to_string(), "Fields not allowed: ean, upc");
    }

    #[test]
    fn test_disallowed_relations_are_rejected() {
        let params = parse_list_params("expand=product.collection").unwrap();
        let err = variant_rules().resolve_retrieve(&params).unwrap_err();
        assert!(matches!(err, QueryError::NotAllowed { kind: "Relations", .. }));
    }

    #[test]
    fn test_disallowed_order_field() {
        let params = parse_list_params("order=-inventory_quantity").unwrap();
        let err = variant_rules().resolve_list(&params).unwrap_err();
        assert!(matches!(err, QueryError::NotAllowed { kind: "Order fields", .. }));
    }

    #[test]
    fn test_retrieve_has_no_pagination() {
        let config = variant_rules()
            .resolve_retrieve(&ListParams::default())
            .unwrap();
        assert_eq!(config.skip, None);
        assert_eq!(config.take, None);
        assert_eq!(config.order, None);
    }

    #[test]
    fn test_permissive_rules() {
        let params = parse_list_params("fields=anything&expand=a.b").unwrap();
        let config = ListRules::default().resolve_list(&params).unwrap();
        assert_eq!(config.select, Some(strings(&["anything"])));
        assert_eq!(config.relations, Some(strings(&["a.b"])));
        assert_eq!(config.take, None);
        assert_eq!(config.order, None);
    }

    #[test]
    fn test_bad_default_order() {
        let rules = ListRules {
            default_order: Some("--".to_string()),
            ..ListRules::default()
        };
        assert!(matches!(
            rules.resolve_list(&ListParams::default()),
            Err(QueryError::Settings(_))
        ));
    }
}
