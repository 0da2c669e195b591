use crate::ast::Scalar;
use serde::{Deserialize, Serialize};

/// Range modifier recognized as a selector key (`lt`, `gt`, `lte`, `gte`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeOp {
    Lt,
    Gt,
    Lte,
    Gte,
}

/// Single lookup table for modifier keys. Matching ignores ASCII case.
const MODIFIERS: [(&str, RangeOp); 4] = [
    ("lt", RangeOp::Lt),
    ("gt", RangeOp::Gt),
    ("lte", RangeOp::Lte),
    ("gte", RangeOp::Gte),
];

impl RangeOp {
    /// Look up a selector key in the modifier table.
    pub fn from_key(key: &str) -> Option<Self> {
        MODIFIERS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, op)| *op)
    }

    /// All modifiers, in table order.
    pub fn all() -> impl Iterator<Item = RangeOp> {
        MODIFIERS.iter().map(|(_, op)| *op)
    }

    /// Canonical (lowercase) selector key.
    pub fn key(&self) -> &'static str {
        match self {
            RangeOp::Lt => "lt",
            RangeOp::Gt => "gt",
            RangeOp::Lte => "lte",
            RangeOp::Gte => "gte",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            RangeOp::Lt => "<",
            RangeOp::Gt => ">",
            RangeOp::Lte => "<=",
            RangeOp::Gte => ">=",
        }
    }

    /// Wrap `bound` in the matching comparator marker.
    pub fn apply(self, bound: Scalar) -> FindOperator {
        match self {
            RangeOp::Lt => FindOperator::LessThan(bound),
            RangeOp::Gt => FindOperator::MoreThan(bound),
            RangeOp::Lte => FindOperator::LessThanOrEqual(bound),
            RangeOp::Gte => FindOperator::MoreThanOrEqual(bound),
        }
    }
}

impl std::fmt::Display for RangeOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Comparator marker understood by the persistence layer.
///
/// The translator emits these for `null`, sequences and range modifiers;
/// callers may also build them directly and they pass through untouched.
/// On the wire a marker is `{"$op": "<name>", "value": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$op", content = "value", rename_all = "camelCase")]
pub enum FindOperator {
    Equal(Scalar),
    Not(Box<FindOperator>),
    LessThan(Scalar),
    LessThanOrEqual(Scalar),
    MoreThan(Scalar),
    MoreThanOrEqual(Scalar),
    In(Vec<Scalar>),
    IsNull,
    Like(String),
    ILike(String),
    Between(Scalar, Scalar),
    /// Conjunction of markers on the same field.
    And(Vec<FindOperator>),
}

impl FindOperator {
    pub fn name(&self) -> &'static str {
        match self {
            FindOperator::Equal(_) => "equal",
            FindOperator::Not(_) => "not",
            FindOperator::LessThan(_) => "lessThan",
            FindOperator::LessThanOrEqual(_) => "lessThanOrEqual",
            FindOperator::MoreThan(_) => "moreThan",
            FindOperator::MoreThanOrEqual(_) => "moreThanOrEqual",
            FindOperator::In(_) => "in",
            FindOperator::IsNull => "isNull",
            FindOperator::Like(_) => "like",
            FindOperator::ILike(_) => "iLike",
            FindOperator::Between(_, _) => "between",
            FindOperator::And(_) => "and",
        }
    }

    /// SQL-flavoured symbol, used when explaining a descriptor.
    pub fn symbol(&self) -> &'static str {
        match self {
            FindOperator::Equal(_) => "=",
            FindOperator::Not(_) => "NOT",
            FindOperator::LessThan(_) => "<",
            FindOperator::LessThanOrEqual(_) => "<=",
            FindOperator::MoreThan(_) => ">",
            FindOperator::MoreThanOrEqual(_) => ">=",
            FindOperator::In(_) => "IN",
            FindOperator::IsNull => "IS NULL",
            FindOperator::Like(_) => "LIKE",
            FindOperator::ILike(_) => "ILIKE",
            FindOperator::Between(_, _) => "BETWEEN",
            FindOperator::And(_) => "AND",
        }
    }
}

impl std::fmt::Display for FindOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindOperator::Equal(v)
            | FindOperator::LessThan(v)
            | FindOperator::LessThanOrEqual(v)
            | FindOperator::MoreThan(v)
            | FindOperator::MoreThanOrEqual(v) => write!(f, "{} {}", self.symbol(), v),
            FindOperator::Not(inner) => write!(f, "NOT ({})", inner),
            FindOperator::In(values) => {
                write!(f, "IN (")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
            FindOperator::IsNull => write!(f, "IS NULL"),
            FindOperator::Like(p) => write!(f, "LIKE '{}'", p),
            FindOperator::ILike(p) => write!(f, "ILIKE '{}'", p),
            FindOperator::Between(lo, hi) => write!(f, "BETWEEN {} AND {}", lo, hi),
            FindOperator::And(ops) => {
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        write!(f, " AND ")?;
                    }
                    write!(f, "{}", op)?;
                }
                Ok(())
            }
        }
    }
}

/// Sort direction for an `order` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") || s == "1" {
            Ok(SortOrder::Asc)
        } else if s.eq_ignore_ascii_case("desc") || s == "-1" {
            Ok(SortOrder::Desc)
        } else {
            Err(format!("unknown sort direction '{}'", s))
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}
