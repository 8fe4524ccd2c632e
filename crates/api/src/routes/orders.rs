//! Route definitions for the `/orders` resource.
//!
//! ```text
//! /orders                      list, create (GET, POST)
//! /orders/{id}                 get, update, delete
//! /orders/{id}/items           list line items (GET)
//! /orders/duplicates           scan all orders (GET)
//! /orders/duplicates/bulk      scan a selection (POST)
//! /orders/merge                merge one pair (POST)
//! /orders/merge/bulk           merge several pairs (POST)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{duplicates, orders};
use crate::state::AppState;

/// Order routes, nested at `/orders`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/duplicates", get(duplicates::scan_orders))
        .route("/duplicates/bulk", post(duplicates::bulk_scan_orders))
        .route("/merge", post(duplicates::merge_orders))
        .route("/merge/bulk", post(duplicates::bulk_merge_orders))
        .route(
            "/{id}",
            get(orders::get_by_id)
                .put(orders::update)
                .delete(orders::delete),
        )
        .route("/{id}/items", get(orders::list_items))
}
