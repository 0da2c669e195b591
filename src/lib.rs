//! # findquery: Selector-to-Query Translator
//!
//! Turns a caller-supplied filter object (a *selector*) and a query
//! configuration (pagination, relations, projection, ordering) into a
//! normalized, backend-agnostic *query descriptor* ready for a persistence
//! layer's `find`.
//!
//! ## Quick Example
//!
//! ```
//! use findquery::prelude::*;
//!
//! let selector = Selector::new()
//!     .equals("email", "jane@example.com")
//!     .one_of("status", ["pending", "completed"])
//!     .is_null("canceled_at");
//! let config = QueryConfig::new().take(10).relations(["items", "items.variant"]);
//!
//! let query = findquery::translate(&selector, &config);
//! assert_eq!(query.take, Some(10));
//! assert!(query.relations.unwrap().contains("items.variant"));
//! ```
//!
//! ## Selector values
//!
//! | Value                      | Descriptor entry         |
//! |----------------------------|--------------------------|
//! | undefined                  | omitted                  |
//! | `null`                     | `isNull`                 |
//! | sequence                   | `in`                     |
//! | `lt` / `gt` / `lte` / `gte`| `lessThan` / `moreThan`… |
//! | nested mapping             | nested filter tree       |
//! | pre-built operator         | passed through           |
//! | anything else              | equality                 |

pub mod ast;
pub mod error;
pub mod list;
pub mod parser;
pub mod settings;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::list::{ListParams, ListRules};
    pub use crate::parser::{config_from_json, parse_list_params, selector_from_json};
    pub use crate::settings::Settings;
    pub use crate::transpiler::{ToQuery, TranslateOptions, Translator};
}

use ast::{QueryConfig, QueryDescriptor, Selector};
use error::QueryResult;

/// Translate a selector and config with default options.
pub fn translate(selector: &Selector, config: &QueryConfig) -> QueryDescriptor {
    transpiler::Translator::default().translate(selector, config)
}

/// Translate a JSON selector and JSON config with default options.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let query = findquery::translate_json(
///     &json!({"price": {"lt": 5}, "deleted_at": null}),
///     &json!({"skip": 0, "take": 20}),
/// )
/// .unwrap();
///
/// assert_eq!(
///     serde_json::to_value(&query).unwrap(),
///     json!({
///         "where": {
///             "price": {"$op": "lessThan", "value": 5},
///             "deleted_at": {"$op": "isNull"}
///         },
///         "withDeleted": true,
///         "skip": 0,
///         "take": 20
///     })
/// );
/// ```
pub fn translate_json(
    selector: &serde_json::Value,
    config: &serde_json::Value,
) -> QueryResult<QueryDescriptor> {
    let selector = parser::selector_from_json(selector)?;
    let config = parser::config_from_json(config)?;
    Ok(translate(&selector, &config))
}
