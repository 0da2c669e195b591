//! List request query-string parser using nom.
//!
//! # Syntax Overview
//!
//! ```text
//! offset=0&limit=20&fields=id,title&expand=product,prices&order=-created_at&status[]=draft
//! ──┬───── ───┬──── ──────┬──────── ───────────┬───────── ────────┬──────── ───────┬───────
//!   │         │           │                    │                  │                └── Filter (brackets nest / append)
//!   │         │           │                    │                  └── Order (`-` = descending)
//!   │         │           │                    └── Relations to expand
//!   │         │           └── Fields to select
//!   │         └── Page size
//!   └── Page offset
//! ```
//!
//! Keys and values are form-urlencoded (`%40`, `+` for a space) and are
//! decoded before parsing. Empty pairs (`limit=1&`) are skipped.

use nom::{
    IResult, Offset,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1},
    combinator::{all_consuming, map, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, pair, tuple},
};
use url::form_urlencoded;

use crate::ast::*;
use crate::error::{QueryError, QueryResult};
use crate::list::ListParams;

/// A decoded `key[sub][...]` as written.
struct RawKey<'a> {
    name: &'a str,
    brackets: Vec<&'a str>,
}

/// Parse a complete list/retrieve query string.
///
/// A leading `?` is ignored. An empty string yields empty params.
pub fn parse_list_params(input: &str) -> QueryResult<ListParams> {
    let input = input.trim();
    let input = input.strip_prefix('?').unwrap_or(input);

    let mut params = ListParams::default();
    for segment in input.split('&').filter(|segment| !segment.is_empty()) {
        let position = input.offset(segment);
        let Some((key, value)) = form_urlencoded::parse(segment.as_bytes()).next() else {
            continue;
        };
        parse_key(&key)
            .and_then(|raw| apply_pair(&mut params, &raw, &value))
            .map_err(|message| QueryError::parse(position, message))?;
    }
    Ok(params)
}

fn apply_pair(params: &mut ListParams, raw: &RawKey<'_>, value: &str) -> Result<(), String> {
    let reserved = raw.brackets.is_empty();
    match raw.name {
        "offset" if reserved => params.offset = Some(parse_count(value)?),
        "limit" if reserved => params.limit = Some(parse_count(value)?),
        "fields" if reserved => params.fields = Some(parse_path_list(value)?),
        "expand" if reserved => params.expand = Some(parse_path_list(value)?),
        "order" if reserved => params.order = Some(parse_order(value)?),
        _ => assign_filter(
            &mut params.filters,
            raw.name,
            &raw.brackets,
            filter_value(value),
        )?,
    }
    Ok(())
}

/// Parse a whole decoded key.
fn parse_key(key: &str) -> Result<RawKey<'_>, String> {
    all_consuming(key_parts)(key)
        .map(|(_, raw)| raw)
        .map_err(|_| format!("invalid key '{}'", key))
}

/// `name` followed by any number of `[sub]` suffixes; `sub` is anything but `]`.
fn key_parts(input: &str) -> IResult<&str, RawKey<'_>> {
    let (input, name) = parse_identifier(input)?;
    let (input, brackets) = many0(delimited(
        char('['),
        take_while(|c: char| c != ']'),
        char(']'),
    ))(input)?;

    Ok((input, RawKey { name, brackets }))
}

/// Parse an identifier (field, relation or key name).
fn parse_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Parse a dotted path (`items.variant.product`).
fn parse_path(input: &str) -> IResult<&str, &str> {
    recognize(separated_list1(char('.'), parse_identifier))(input)
}

fn parse_count(value: &str) -> Result<u64, String> {
    let (_, digits) = all_consuming(digit1::<&str, nom::error::Error<&str>>)(value)
        .map_err(|_| format!("expected a non-negative integer, got '{}'", value))?;
    digits
        .parse()
        .map_err(|_| format!("number out of range: '{}'", digits))
}

/// Parse `a,b.c,d`. An empty value is an empty list.
fn parse_path_list(value: &str) -> Result<Vec<String>, String> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    all_consuming(separated_list1(char(','), parse_path))(value)
        .map(|(_, paths)| paths.into_iter().map(str::to_string).collect())
        .map_err(|_| format!("expected comma-separated paths, got '{}'", value))
}

/// Parse `-created_at,display_id` into an ordered mapping.
pub(crate) fn parse_order(value: &str) -> Result<OrderBy, String> {
    let entry = map(pair(opt(char('-')), parse_path), |(desc, path)| {
        let order = if desc.is_some() {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        };
        (path, order)
    });

    all_consuming(separated_list1(char(','), entry))(value)
        .map(|(_, entries)| entries.into_iter().collect())
        .map_err(|_| format!("expected [-]field[,...] for order, got '{}'", value))
}

/// Infer a filter value from its raw text.
fn filter_value(value: &str) -> FilterValue {
    match value {
        "null" => FilterValue::Null,
        "true" => FilterValue::Scalar(Scalar::Bool(true)),
        "false" => FilterValue::Scalar(Scalar::Bool(false)),
        _ => FilterValue::Scalar(parse_number(value).unwrap_or_else(|| value.into())),
    }
}

/// Parse a number (integer or float), requiring the whole value.
///
/// Only text that prints back unchanged counts: `007`, `1.50` and `-0`
/// stay strings.
fn parse_number(value: &str) -> Option<Scalar> {
    let (_, text) = all_consuming(number)(value).ok()?;

    let scalar = if text.contains('.') {
        Scalar::Float(text.parse().ok()?)
    } else {
        Scalar::Int(text.parse().ok()?)
    };
    (scalar.to_string() == text).then_some(scalar)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

/// Place `value` at `name[brackets...]` inside `selector`.
///
/// `[sub]` descends into a nested selector; a trailing `[]` appends to a list.
fn assign_filter(
    selector: &mut Selector,
    name: &str,
    brackets: &[&str],
    value: FilterValue,
) -> Result<(), String> {
    match brackets.split_first() {
        None => {
            selector.insert(name, value);
            Ok(())
        }
        Some((&"", rest)) => {
            if !rest.is_empty() {
                return Err(format!("'[]' must be the last suffix of '{}'", name));
            }
            let FilterValue::Scalar(item) = value else {
                return Err(format!("list '{}' only holds scalar values", name));
            };
            if !selector.contains_key(name) {
                selector.insert(name, FilterValue::List(Vec::new()));
            }
            match selector.get_mut(name) {
                Some(FilterValue::List(items)) => {
                    items.push(item);
                    Ok(())
                }
                _ => Err(format!("'{}' is already set to a non-list value", name)),
            }
        }
        Some((sub, rest)) => {
            if !selector.contains_key(name) {
                selector.insert(name, Selector::new());
            }
            match selector.get_mut(name) {
                Some(FilterValue::Nested(inner)) => assign_filter(inner, sub, rest, value),
                _ => Err(format!("'{}' is already set to a non-nested value", name)),
            }
        }
    }
}
