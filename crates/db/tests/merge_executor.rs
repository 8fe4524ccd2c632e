//! Integration tests for the transactional merge executor.
//!
//! Covers the executor's invariants: dependents are re-pointed before the
//! duplicate is deleted (no dangling references), failures roll back all
//! partial writes, and concurrent/stale merges are rejected rather than
//! double-applied.

use solardesk_core::dedup::grouping::find_duplicate_groups;
use solardesk_core::dedup::DedupRecord;
use solardesk_db::models::contact::{ContactMergeData, CreateContact};
use solardesk_db::models::order::{CreateOrder, OrderMergeData};
use solardesk_db::models::order_item::CreateOrderItem;
use solardesk_db::models::product::{CreateProduct, ProductMergeData};
use solardesk_db::repositories::{
    ContactRepo, MergeError, MergeRepo, OrderItemRepo, OrderRepo, ProductRepo,
};
use sqlx::PgPool;

async fn seed_contact(pool: &PgPool, name: &str, email: Option<&str>) -> i64 {
    ContactRepo::create(
        pool,
        &CreateContact {
            name: name.to_string(),
            email: email.map(String::from),
            phone: None,
            address: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_order(pool: &PgPool, contact_id: i64, total_cents: i64) -> i64 {
    OrderRepo::create(
        pool,
        &CreateOrder {
            contact_id,
            status: None,
            total_cents: Some(total_cents),
            ordered_on: "2026-03-01".parse().unwrap(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn seed_product(pool: &PgPool, name: &str, sku: Option<&str>) -> i64 {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: name.to_string(),
            sku: sku.map(String::from),
            description: None,
            price_cents: Some(10_000),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Contact merges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn contact_merge_repoints_orders_and_deletes_duplicate(pool: PgPool) {
    let primary = seed_contact(&pool, "Alice Adams", Some("a@x.com")).await;
    let duplicate = seed_contact(&pool, "A. Adams", Some("a@x.com")).await;
    let order = seed_order(&pool, duplicate, 12_000).await;

    let merged = ContactMergeData {
        name: Some("Alice Adams".to_string()),
        email: Some("a@x.com".to_string()),
        ..Default::default()
    };
    let result = MergeRepo::merge_contacts(&pool, primary, duplicate, &merged)
        .await
        .unwrap();
    assert_eq!(result, primary);

    // The duplicate is gone.
    assert!(ContactRepo::find_by_id(&pool, duplicate)
        .await
        .unwrap()
        .is_none());

    // No dangling references: the order now points at the primary.
    let reloaded = OrderRepo::find_by_id(&pool, order).await.unwrap().unwrap();
    assert_eq!(reloaded.contact_id, primary);
    assert!(OrderRepo::list_by_contact(&pool, duplicate)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn merged_duplicate_never_reappears_in_scans(pool: PgPool) {
    let primary = seed_contact(&pool, "Alice Adams", Some("a@x.com")).await;
    let duplicate = seed_contact(&pool, "Alice A.", Some("a@x.com")).await;
    seed_contact(&pool, "Carol Clark", Some("c@y.com")).await;

    MergeRepo::merge_contacts(&pool, primary, duplicate, &ContactMergeData::default())
        .await
        .unwrap();

    let records: Vec<DedupRecord> = ContactRepo::list_all(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(Into::into)
        .collect();
    let groups = find_duplicate_groups(&records, 70.0).unwrap();

    assert!(groups.is_empty());
    assert!(records.iter().all(|r| r.id != duplicate));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn self_merge_is_rejected(pool: PgPool) {
    let id = seed_contact(&pool, "Alice", None).await;
    let err = MergeRepo::merge_contacts(&pool, id, id, &ContactMergeData::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MergeError::InvalidMerge(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_primary_is_not_found(pool: PgPool) {
    let duplicate = seed_contact(&pool, "Alice", None).await;
    let err = MergeRepo::merge_contacts(&pool, 9999, duplicate, &ContactMergeData::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MergeError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn already_merged_duplicate_is_stale(pool: PgPool) {
    let primary = seed_contact(&pool, "Alice Adams", Some("a@x.com")).await;
    let duplicate = seed_contact(&pool, "Alice A.", Some("a@x.com")).await;

    MergeRepo::merge_contacts(&pool, primary, duplicate, &ContactMergeData::default())
        .await
        .unwrap();

    // A second merge naming the same duplicate must fail, not double-apply.
    let err = MergeRepo::merge_contacts(&pool, primary, duplicate, &ContactMergeData::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MergeError::StaleRecord { .. }));
}

// ---------------------------------------------------------------------------
// Rollback atomicity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_merge_leaves_all_rows_untouched(pool: PgPool) {
    let contact = seed_contact(&pool, "Alice", None).await;
    let primary = seed_order(&pool, contact, 12_000).await;
    let duplicate = seed_order(&pool, contact, 12_500).await;
    let product = seed_product(&pool, "Panel", Some("SP-300")).await;
    let item = OrderItemRepo::create(
        &pool,
        &CreateOrderItem {
            order_id: duplicate,
            product_id: product,
            quantity: None,
            unit_price_cents: None,
        },
    )
    .await
    .unwrap();

    // Force a mid-transaction failure: the merged contact reference
    // violates the foreign key constraint.
    let bad = OrderMergeData {
        contact_id: Some(424242),
        ..Default::default()
    };
    let err = MergeRepo::merge_orders(&pool, primary, duplicate, &bad)
        .await
        .unwrap_err();
    assert!(matches!(err, MergeError::Execution(_)));

    // Everything is exactly as it was: primary unchanged, duplicate still
    // present, line item still pointing at the duplicate.
    let p = OrderRepo::find_by_id(&pool, primary).await.unwrap().unwrap();
    assert_eq!(p.total_cents, 12_000);
    assert_eq!(p.contact_id, contact);
    assert!(OrderRepo::find_by_id(&pool, duplicate)
        .await
        .unwrap()
        .is_some());
    let items = OrderItemRepo::list_by_order(&pool, duplicate).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, item.id);
}

// ---------------------------------------------------------------------------
// Order and product merges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn order_merge_repoints_line_items(pool: PgPool) {
    let contact = seed_contact(&pool, "Alice", None).await;
    let primary = seed_order(&pool, contact, 12_000).await;
    let duplicate = seed_order(&pool, contact, 12_500).await;
    let product = seed_product(&pool, "Panel", Some("SP-300")).await;
    OrderItemRepo::create(
        &pool,
        &CreateOrderItem {
            order_id: duplicate,
            product_id: product,
            quantity: Some(2),
            unit_price_cents: Some(6_250),
        },
    )
    .await
    .unwrap();

    let merged = OrderMergeData {
        total_cents: Some(12_500),
        ..Default::default()
    };
    MergeRepo::merge_orders(&pool, primary, duplicate, &merged)
        .await
        .unwrap();

    let p = OrderRepo::find_by_id(&pool, primary).await.unwrap().unwrap();
    assert_eq!(p.total_cents, 12_500);
    assert!(OrderRepo::find_by_id(&pool, duplicate)
        .await
        .unwrap()
        .is_none());
    let items = OrderItemRepo::list_by_order(&pool, primary).await.unwrap();
    assert_eq!(items.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn product_merge_repoints_line_items(pool: PgPool) {
    let contact = seed_contact(&pool, "Alice", None).await;
    let order = seed_order(&pool, contact, 12_000).await;
    let primary = seed_product(&pool, "Solar Panel 300W", Some("SP-300")).await;
    let duplicate = seed_product(&pool, "Solar Panel 300w", None).await;
    OrderItemRepo::create(
        &pool,
        &CreateOrderItem {
            order_id: order,
            product_id: duplicate,
            quantity: None,
            unit_price_cents: None,
        },
    )
    .await
    .unwrap();

    MergeRepo::merge_products(&pool, primary, duplicate, &ProductMergeData::default())
        .await
        .unwrap();

    assert!(ProductRepo::find_by_id(&pool, duplicate)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        OrderItemRepo::count_by_product(&pool, primary).await.unwrap(),
        1
    );
    assert_eq!(
        OrderItemRepo::count_by_product(&pool, duplicate)
            .await
            .unwrap(),
        0
    );
}
