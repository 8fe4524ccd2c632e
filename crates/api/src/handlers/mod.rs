//! Request handlers.
//!
//! Each entity submodule provides async CRUD handler functions (create,
//! list, get_by_id, update, delete) that delegate to the corresponding
//! repository in `solardesk_db` and map errors via
//! [`AppError`](crate::error::AppError). The duplicate detection and merge
//! endpoints live in [`duplicates`].

pub mod contacts;
pub mod duplicates;
pub mod orders;
pub mod products;
