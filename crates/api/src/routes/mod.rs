pub mod contacts;
pub mod health;
pub mod orders;
pub mod products;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /contacts                          list, create
/// /contacts/{id}                     get, update, delete
/// /contacts/duplicates               scan all contacts (GET, ?threshold)
/// /contacts/duplicates/bulk          scan a selection (POST)
/// /contacts/merge                    merge one pair (POST)
/// /contacts/merge/bulk               merge several pairs (POST)
///
/// /orders                            list, create
/// /orders/{id}                       get, update, delete
/// /orders/{id}/items                 list line items
/// /orders/duplicates                 scan all orders (GET, ?threshold)
/// /orders/duplicates/bulk            scan a selection (POST)
/// /orders/merge                      merge one pair (POST)
/// /orders/merge/bulk                 merge several pairs (POST)
///
/// /products                          list, create
/// /products/{id}                     get, update, delete
/// /products/duplicates               scan all products (GET, ?threshold)
/// /products/duplicates/bulk          scan a selection (POST)
/// /products/merge                    merge one pair (POST)
/// /products/merge/bulk               merge several pairs (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Contact CRUD plus duplicate detection and merge.
        .nest("/contacts", contacts::router())
        // Order CRUD, line items, duplicate detection and merge.
        .nest("/orders", orders::router())
        // Product CRUD plus duplicate detection and merge.
        .nest("/products", products::router())
}
