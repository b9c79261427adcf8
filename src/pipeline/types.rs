use bson::Bson;
use serde::{Deserialize, Serialize};

// Safety limits applied at the parse boundary
pub(crate) const MAX_SORT_FIELDS: usize = 8;
pub(crate) const MAX_FILTERS: usize = 64;
pub(crate) const MAX_PATH_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    /// Sort-stage direction: ascending is `1`, descending is `-1`.
    #[must_use]
    pub(crate) const fn direction(self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOp {
    #[default]
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
}

impl FilterOp {
    #[must_use]
    pub(crate) const fn mongo_key(self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Ne => "$ne",
            Self::Gt => "$gt",
            Self::Lt => "$lt",
            Self::Gte => "$gte",
            Self::Lte => "$lte",
        }
    }
}

/// Filter operand: string, number, or boolean only. The untagged serde
/// shape rejects JSON objects and arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Num(f64),
    Str(String),
}

impl FilterValue {
    #[must_use]
    pub(crate) fn to_bson(&self) -> Bson {
        match self {
            Self::Bool(b) => Bson::Boolean(*b),
            Self::Num(n) => Bson::Double(*n),
            Self::Str(s) => Bson::String(s.clone()),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub field: String,
    pub value: FilterValue,
    #[serde(default)]
    pub operator: FilterOp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub skip: Option<u64>,
}

/// Declarative read options for one request. Constructed per request,
/// discarded after the pipeline is built; owns nothing long-lived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryOptions {
    pub pagination: Option<Pagination>,
    pub sort: Option<Vec<SortSpec>>,
    pub filters: Option<Vec<FilterSpec>>,
}
