use crate::{
    api::{error::ApiError, response::with_total_count},
    models::{CurrentBlockResponse, SubscribeRequest, SubscribeResponse, Transaction},
    service::Parser,
    state::AppState,
    validation::{validate_address, validate_hash, ValidationError},
};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

// GET /transactions query parameters
#[derive(Deserialize)]
pub struct TransactionsQuery {
    address: Option<String>,
}

// GET /transaction query parameters
#[derive(Deserialize)]
pub struct TransactionQuery {
    hash: Option<String>,
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/currentBlock", get(current_block))
        .route("/subscribe", post(subscribe))
        .route("/transactions", get(get_transactions))
        .route("/transaction", get(get_transaction))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

// GET /currentBlock handler
async fn current_block(State(state): State<Arc<AppState>>) -> Json<CurrentBlockResponse> {
    let current_block = state.parser.current_block();
    info!("Current block requested: {}", current_block);
    Json(CurrentBlockResponse { current_block })
}

// POST /subscribe handler
async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ValidationError::InvalidBody(rejection.body_text()))?;
    let address = validate_address(Some(request.address.as_str()))?;

    let subscribed = state.parser.subscribe(address);
    Ok(Json(SubscribeResponse { subscribed }))
}

// GET /transactions handler
async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionsQuery>,
) -> Result<Response, ApiError> {
    let address = validate_address(params.address.as_deref())?;

    let transactions = state.parser.get_transactions(address);
    info!(
        "Transactions returned for address {}: {}",
        address,
        transactions.len()
    );

    let count = transactions.len();
    Ok(with_total_count(transactions, count))
}

// GET /transaction handler
async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<Transaction>, ApiError> {
    let hash = validate_hash(params.hash.as_deref())?;

    if let Some(cached) = state.lookup_cache.get(hash).await {
        return Ok(Json(cached));
    }

    let transaction = state.parser.transaction_by_hash(hash).await.map_err(|e| {
        error!("Error fetching transaction {}: {}", hash, e);
        ApiError::from(e)
    })?;

    state.lookup_cache.insert(transaction.clone()).await;
    Ok(Json(transaction))
}
