//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Merge execution (the only
//! multi-statement mutation) lives in [`merge_repo`].

pub mod contact_repo;
pub mod merge_repo;
pub mod order_item_repo;
pub mod order_repo;
pub mod product_repo;

pub use contact_repo::ContactRepo;
pub use merge_repo::{MergeError, MergeRepo};
pub use order_item_repo::OrderItemRepo;
pub use order_repo::OrderRepo;
pub use product_repo::ProductRepo;
