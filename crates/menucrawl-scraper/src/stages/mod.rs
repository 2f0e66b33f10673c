//! The four pipeline stages, in the order they run.

pub mod detail;
pub mod listing;
pub mod location;
pub mod query;

pub use detail::{extract_menu, CandidateOutcome};
pub use listing::extract_candidates;
pub use location::resolve_location;
pub use query::apply_query_filter;
