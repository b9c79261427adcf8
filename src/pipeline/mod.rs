// Submodules for separation of concerns
mod compile;
mod filter;
mod lookup;
mod parse;
mod stages;
mod types;

// Public API re-exports
pub use compile::build_pipeline;
pub use filter::filter_stages;
pub use lookup::lookup_stages;
pub use parse::{QueryOptionsSerde, parse_options_json};
pub use stages::{pagination_stages, sort_stage};
pub use types::{FilterOp, FilterSpec, FilterValue, Order, Pagination, QueryOptions, SortSpec};
