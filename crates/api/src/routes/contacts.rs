//! Route definitions for the `/contacts` resource.
//!
//! ```text
//! /contacts                    list, create (GET, POST)
//! /contacts/{id}               get, update, delete
//! /contacts/duplicates         scan all contacts (GET)
//! /contacts/duplicates/bulk    scan a selection (POST)
//! /contacts/merge              merge one pair (POST)
//! /contacts/merge/bulk         merge several pairs (POST)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{contacts, duplicates};
use crate::state::AppState;

/// Contact routes, nested at `/contacts`.
///
/// Static segments are registered before `/{id}` so `duplicates` and
/// `merge` are never captured as path parameters.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(contacts::list).post(contacts::create))
        .route("/duplicates", get(duplicates::scan_contacts))
        .route("/duplicates/bulk", post(duplicates::bulk_scan_contacts))
        .route("/merge", post(duplicates::merge_contacts))
        .route("/merge/bulk", post(duplicates::bulk_merge_contacts))
        .route(
            "/{id}",
            get(contacts::get_by_id)
                .put(contacts::update)
                .delete(contacts::delete),
        )
}
