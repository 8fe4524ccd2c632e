//! Route definitions for the `/products` resource.
//!
//! ```text
//! /products                    list, create (GET, POST)
//! /products/{id}               get, update, delete
//! /products/duplicates         scan all products (GET)
//! /products/duplicates/bulk    scan a selection (POST)
//! /products/merge              merge one pair (POST)
//! /products/merge/bulk         merge several pairs (POST)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{duplicates, products};
use crate::state::AppState;

/// Product routes, nested at `/products`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route("/duplicates", get(duplicates::scan_products))
        .route("/duplicates/bulk", post(duplicates::bulk_scan_products))
        .route("/merge", post(duplicates::merge_products))
        .route("/merge/bulk", post(duplicates::bulk_merge_products))
        .route(
            "/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
}
