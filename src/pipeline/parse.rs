use crate::errors::GatherlyError;
use serde::{Deserialize, Serialize};

use super::types::{
    FilterSpec, MAX_FILTERS, MAX_PATH_DEPTH, MAX_SORT_FIELDS, Pagination, QueryOptions, SortSpec,
};

// Serde-facing structure for safe JSON parsing of request options. The wire
// shape mirrors the GraphQL input object: lowercase `asc`/`desc` orders,
// lowercase operators with `eq` as the default.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct QueryOptionsSerde {
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub sort: Option<Vec<SortSpec>>,
    #[serde(default)]
    pub filters: Option<Vec<FilterSpec>>,
}

impl TryFrom<QueryOptionsSerde> for QueryOptions {
    type Error = GatherlyError;
    fn try_from(qs: QueryOptionsSerde) -> Result<Self, Self::Error> {
        let sort = qs.sort.map(|mut sort| {
            if sort.len() > MAX_SORT_FIELDS {
                log::warn!("sort spec too long: {}", sort.len());
                sort.truncate(MAX_SORT_FIELDS);
            }
            sort
        });
        let filters = match qs.filters {
            Some(mut filters) => {
                if filters.len() > MAX_FILTERS {
                    log::warn!("filter list too long: {}", filters.len());
                    filters.truncate(MAX_FILTERS);
                }
                for f in &filters {
                    if f.field.is_empty() {
                        return Err(GatherlyError::Query("empty filter field".into()));
                    }
                    if f.field.split('.').count() > MAX_PATH_DEPTH {
                        return Err(GatherlyError::Query(format!(
                            "filter path too deep: {}",
                            f.field
                        )));
                    }
                }
                Some(filters)
            }
            None => None,
        };
        Ok(Self { pagination: qs.pagination, sort, filters })
    }
}

/// # Errors
/// Returns an error if the JSON string cannot be parsed into query options,
/// or if a filter field is empty or nested beyond the depth limit.
pub fn parse_options_json(json: &str) -> Result<QueryOptions, GatherlyError> {
    let qs: QueryOptionsSerde = serde_json::from_str(json)?;
    QueryOptions::try_from(qs)
}
