// Telemetry is a submodule of query
pub mod telemetry;

// Submodules for separation of concerns
mod eval;
mod exec;

// Public API re-exports
pub use eval::{compare_bson, get_path, values_equal};
pub use exec::run_pipeline;
