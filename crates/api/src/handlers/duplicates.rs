//! Handlers for duplicate detection and merge endpoints.
//!
//! Each entity kind exposes the same four operations: a full scan, a bulk
//! scan over an explicit selection (with manual pairing fallback), a
//! single merge, and a sequential bulk merge that reports per-pair
//! outcomes. Scans are read-only; merges go through the transactional
//! executor in `solardesk_db`.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use solardesk_core::dedup::grouping::{find_duplicate_groups, synthesize_manual_groups};
use solardesk_core::dedup::merge::{plan_merge, MergePolicy};
use solardesk_core::dedup::{validate_threshold, DedupRecord, DuplicateGroup, DEFAULT_THRESHOLD};
use solardesk_core::error::CoreError;
use solardesk_core::types::DbId;
use solardesk_db::models::contact::ContactMergeData;
use solardesk_db::models::order::OrderMergeData;
use solardesk_db::models::product::ProductMergeData;
use solardesk_db::repositories::{ContactRepo, MergeError, MergeRepo, OrderRepo, ProductRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    pub threshold: Option<f64>,
}

/// Result of a duplicate scan.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub duplicate_groups: Vec<DuplicateGroup>,
    pub total_groups: usize,
    pub total_duplicate_records: usize,
}

impl ScanResponse {
    fn from_groups(duplicate_groups: Vec<DuplicateGroup>) -> Self {
        let total_groups = duplicate_groups.len();
        let total_duplicate_records = duplicate_groups.iter().map(|g| g.records.len()).sum();
        Self {
            duplicate_groups,
            total_groups,
            total_duplicate_records,
        }
    }
}

/// Request body for a bulk scan over an explicit selection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkScanRequest {
    pub record_ids: Vec<DbId>,
    pub threshold: Option<f64>,
}

/// Request body for a single merge. When `merged_data` is omitted, the
/// default field resolution policy is applied.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest<T> {
    pub primary_id: DbId,
    pub duplicate_id: DbId,
    pub merged_data: Option<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResponse {
    pub primary_id: DbId,
}

/// One primary/duplicate pair in a bulk merge.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePair {
    pub primary_id: DbId,
    pub duplicate_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct BulkMergeRequest {
    pub pairs: Vec<MergePair>,
}

/// Outcome of one pair in a bulk merge. Failed pairs carry the error
/// message so the caller can retry exactly the failed subset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub primary_id: DbId,
    pub duplicate_id: DbId,
    pub merged: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BulkMergeResponse {
    pub outcomes: Vec<MergeOutcome>,
}

fn require_selection(record_ids: &[DbId]) -> Result<(), CoreError> {
    if record_ids.len() < 2 {
        return Err(CoreError::Validation(
            "Bulk scan requires at least two record ids".to_string(),
        ));
    }
    Ok(())
}

fn require_pairs(pairs: &[MergePair]) -> Result<(), CoreError> {
    if pairs.is_empty() {
        return Err(CoreError::Validation(
            "Bulk merge requires at least one pair".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// GET /api/v1/contacts/duplicates
pub async fn scan_contacts(
    State(state): State<AppState>,
    Query(params): Query<ScanQuery>,
) -> AppResult<Json<ScanResponse>> {
    let threshold = params.threshold.unwrap_or(DEFAULT_THRESHOLD);
    let records: Vec<DedupRecord> = ContactRepo::list_all(&state.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let groups = find_duplicate_groups(&records, threshold)?;
    Ok(Json(ScanResponse::from_groups(groups)))
}

/// POST /api/v1/contacts/duplicates/bulk
pub async fn bulk_scan_contacts(
    State(state): State<AppState>,
    Json(body): Json<BulkScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    let threshold = body.threshold.unwrap_or(DEFAULT_THRESHOLD);
    validate_threshold(threshold)?;
    require_selection(&body.record_ids)?;

    let records: Vec<DedupRecord> = ContactRepo::list_by_ids(&state.pool, &body.record_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let mut groups = find_duplicate_groups(&records, threshold)?;
    if groups.is_empty() {
        groups = synthesize_manual_groups(&records);
    }
    Ok(Json(ScanResponse::from_groups(groups)))
}

/// POST /api/v1/contacts/merge
pub async fn merge_contacts(
    State(state): State<AppState>,
    Json(body): Json<MergeRequest<ContactMergeData>>,
) -> AppResult<Json<MergeResponse>> {
    let merged = match body.merged_data {
        Some(data) => data,
        None => plan_contact_merge(&state, body.primary_id, body.duplicate_id).await?,
    };
    let primary_id =
        MergeRepo::merge_contacts(&state.pool, body.primary_id, body.duplicate_id, &merged).await?;
    Ok(Json(MergeResponse { primary_id }))
}

/// POST /api/v1/contacts/merge/bulk
pub async fn bulk_merge_contacts(
    State(state): State<AppState>,
    Json(body): Json<BulkMergeRequest>,
) -> AppResult<Json<BulkMergeResponse>> {
    require_pairs(&body.pairs)?;

    // Sequential on purpose: a failure partway leaves completed merges
    // intact and is reported per pair.
    let mut outcomes = Vec::with_capacity(body.pairs.len());
    for pair in &body.pairs {
        let result = merge_one_contact(&state, pair.primary_id, pair.duplicate_id).await;
        outcomes.push(outcome(pair, result));
    }
    Ok(Json(BulkMergeResponse { outcomes }))
}

async fn merge_one_contact(
    state: &AppState,
    primary_id: DbId,
    duplicate_id: DbId,
) -> Result<DbId, AppError> {
    let merged = plan_contact_merge(state, primary_id, duplicate_id).await?;
    let id = MergeRepo::merge_contacts(&state.pool, primary_id, duplicate_id, &merged).await?;
    Ok(id)
}

/// Resolve the default merged field set for a contact pair.
async fn plan_contact_merge(
    state: &AppState,
    primary_id: DbId,
    duplicate_id: DbId,
) -> Result<ContactMergeData, AppError> {
    let primary: DedupRecord = ContactRepo::find_by_id(&state.pool, primary_id)
        .await?
        .ok_or(AppError::Merge(MergeError::NotFound {
            entity: "Contact",
            id: primary_id,
        }))?
        .into();
    let duplicate: DedupRecord = ContactRepo::find_by_id(&state.pool, duplicate_id)
        .await?
        .ok_or(AppError::Merge(MergeError::StaleRecord {
            entity: "Contact",
            id: duplicate_id,
        }))?
        .into();
    let plan = plan_merge(&primary, &duplicate, MergePolicy::default())?;
    Ok(ContactMergeData::from_plan(&plan.merged))
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

/// GET /api/v1/orders/duplicates
pub async fn scan_orders(
    State(state): State<AppState>,
    Query(params): Query<ScanQuery>,
) -> AppResult<Json<ScanResponse>> {
    let threshold = params.threshold.unwrap_or(DEFAULT_THRESHOLD);
    let records: Vec<DedupRecord> = OrderRepo::list_all(&state.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let groups = find_duplicate_groups(&records, threshold)?;
    Ok(Json(ScanResponse::from_groups(groups)))
}

/// POST /api/v1/orders/duplicates/bulk
pub async fn bulk_scan_orders(
    State(state): State<AppState>,
    Json(body): Json<BulkScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    let threshold = body.threshold.unwrap_or(DEFAULT_THRESHOLD);
    validate_threshold(threshold)?;
    require_selection(&body.record_ids)?;

    let records: Vec<DedupRecord> = OrderRepo::list_by_ids(&state.pool, &body.record_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let mut groups = find_duplicate_groups(&records, threshold)?;
    if groups.is_empty() {
        groups = synthesize_manual_groups(&records);
    }
    Ok(Json(ScanResponse::from_groups(groups)))
}

/// POST /api/v1/orders/merge
pub async fn merge_orders(
    State(state): State<AppState>,
    Json(body): Json<MergeRequest<OrderMergeData>>,
) -> AppResult<Json<MergeResponse>> {
    let merged = match body.merged_data {
        Some(data) => data,
        None => plan_order_merge(&state, body.primary_id, body.duplicate_id).await?,
    };
    let primary_id =
        MergeRepo::merge_orders(&state.pool, body.primary_id, body.duplicate_id, &merged).await?;
    Ok(Json(MergeResponse { primary_id }))
}

/// POST /api/v1/orders/merge/bulk
pub async fn bulk_merge_orders(
    State(state): State<AppState>,
    Json(body): Json<BulkMergeRequest>,
) -> AppResult<Json<BulkMergeResponse>> {
    require_pairs(&body.pairs)?;

    let mut outcomes = Vec::with_capacity(body.pairs.len());
    for pair in &body.pairs {
        let result = merge_one_order(&state, pair.primary_id, pair.duplicate_id).await;
        outcomes.push(outcome(pair, result));
    }
    Ok(Json(BulkMergeResponse { outcomes }))
}

async fn merge_one_order(
    state: &AppState,
    primary_id: DbId,
    duplicate_id: DbId,
) -> Result<DbId, AppError> {
    let merged = plan_order_merge(state, primary_id, duplicate_id).await?;
    let id = MergeRepo::merge_orders(&state.pool, primary_id, duplicate_id, &merged).await?;
    Ok(id)
}

/// Resolve the default merged field set for an order pair.
async fn plan_order_merge(
    state: &AppState,
    primary_id: DbId,
    duplicate_id: DbId,
) -> Result<OrderMergeData, AppError> {
    let primary: DedupRecord = OrderRepo::find_by_id(&state.pool, primary_id)
        .await?
        .ok_or(AppError::Merge(MergeError::NotFound {
            entity: "Order",
            id: primary_id,
        }))?
        .into();
    let duplicate: DedupRecord = OrderRepo::find_by_id(&state.pool, duplicate_id)
        .await?
        .ok_or(AppError::Merge(MergeError::StaleRecord {
            entity: "Order",
            id: duplicate_id,
        }))?
        .into();
    let plan = plan_merge(&primary, &duplicate, MergePolicy::default())?;
    Ok(OrderMergeData::from_plan(&plan.merged))
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// GET /api/v1/products/duplicates
pub async fn scan_products(
    State(state): State<AppState>,
    Query(params): Query<ScanQuery>,
) -> AppResult<Json<ScanResponse>> {
    let threshold = params.threshold.unwrap_or(DEFAULT_THRESHOLD);
    let records: Vec<DedupRecord> = ProductRepo::list_all(&state.pool)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let groups = find_duplicate_groups(&records, threshold)?;
    Ok(Json(ScanResponse::from_groups(groups)))
}

/// POST /api/v1/products/duplicates/bulk
pub async fn bulk_scan_products(
    State(state): State<AppState>,
    Json(body): Json<BulkScanRequest>,
) -> AppResult<Json<ScanResponse>> {
    let threshold = body.threshold.unwrap_or(DEFAULT_THRESHOLD);
    validate_threshold(threshold)?;
    require_selection(&body.record_ids)?;

    let records: Vec<DedupRecord> = ProductRepo::list_by_ids(&state.pool, &body.record_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let mut groups = find_duplicate_groups(&records, threshold)?;
    if groups.is_empty() {
        groups = synthesize_manual_groups(&records);
    }
    Ok(Json(ScanResponse::from_groups(groups)))
}

/// POST /api/v1/products/merge
pub async fn merge_products(
    State(state): State<AppState>,
    Json(body): Json<MergeRequest<ProductMergeData>>,
) -> AppResult<Json<MergeResponse>> {
    let merged = match body.merged_data {
        Some(data) => data,
        None => plan_product_merge(&state, body.primary_id, body.duplicate_id).await?,
    };
    let primary_id =
        MergeRepo::merge_products(&state.pool, body.primary_id, body.duplicate_id, &merged).await?;
    Ok(Json(MergeResponse { primary_id }))
}

/// POST /api/v1/products/merge/bulk
pub async fn bulk_merge_products(
    State(state): State<AppState>,
    Json(body): Json<BulkMergeRequest>,
) -> AppResult<Json<BulkMergeResponse>> {
    require_pairs(&body.pairs)?;

    let mut outcomes = Vec::with_capacity(body.pairs.len());
    for pair in &body.pairs {
        let result = merge_one_product(&state, pair.primary_id, pair.duplicate_id).await;
        outcomes.push(outcome(pair, result));
    }
    Ok(Json(BulkMergeResponse { outcomes }))
}

async fn merge_one_product(
    state: &AppState,
    primary_id: DbId,
    duplicate_id: DbId,
) -> Result<DbId, AppError> {
    let merged = plan_product_merge(state, primary_id, duplicate_id).await?;
    let id = MergeRepo::merge_products(&state.pool, primary_id, duplicate_id, &merged).await?;
    Ok(id)
}

/// Resolve the default merged field set for a product pair.
async fn plan_product_merge(
    state: &AppState,
    primary_id: DbId,
    duplicate_id: DbId,
) -> Result<ProductMergeData, AppError> {
    let primary: DedupRecord = ProductRepo::find_by_id(&state.pool, primary_id)
        .await?
        .ok_or(AppError::Merge(MergeError::NotFound {
            entity: "Product",
            id: primary_id,
        }))?
        .into();
    let duplicate: DedupRecord = ProductRepo::find_by_id(&state.pool, duplicate_id)
        .await?
        .ok_or(AppError::Merge(MergeError::StaleRecord {
            entity: "Product",
            id: duplicate_id,
        }))?
        .into();
    let plan = plan_merge(&primary, &duplicate, MergePolicy::default())?;
    Ok(ProductMergeData::from_plan(&plan.merged))
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn outcome(pair: &MergePair, result: Result<DbId, AppError>) -> MergeOutcome {
    match result {
        Ok(primary_id) => MergeOutcome {
            primary_id,
            duplicate_id: pair.duplicate_id,
            merged: true,
            error: None,
        },
        Err(err) => {
            tracing::warn!(
                primary_id = pair.primary_id,
                duplicate_id = pair.duplicate_id,
                error = %err,
                "Bulk merge pair failed"
            );
            MergeOutcome {
                primary_id: pair.primary_id,
                duplicate_id: pair.duplicate_id,
                merged: false,
                error: Some(err.to_string()),
            }
        }
    }
}
