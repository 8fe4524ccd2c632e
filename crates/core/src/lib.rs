//! Pure domain logic for the Solardesk operations backend.
//!
//! Zero internal deps so it can be used by both the API/repository layer
//! and any future CLI or worker tooling. Contains the duplicate detection
//! workflow (scoring, grouping, merge planning), the merge wizard state
//! machine, pagination helpers, and the shared error type.

pub mod dedup;
pub mod error;
pub mod merge_flow;
pub mod pagination;
pub mod types;
