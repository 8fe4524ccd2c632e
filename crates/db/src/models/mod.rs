//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - A conversion into [`solardesk_core::dedup::DedupRecord`] for scans

pub mod contact;
pub mod order;
pub mod order_item;
pub mod product;
