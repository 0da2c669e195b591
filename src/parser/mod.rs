//! Untyped input boundaries.
//!
//! - [`json`]: selectors and query configs arriving as JSON.
//! - [`list_params`]: list/retrieve request query strings, parsed with nom.

pub mod json;
pub mod list_params;

pub use self::json::{config_from_json, selector_from_json};
pub use self::list_params::parse_list_params;
