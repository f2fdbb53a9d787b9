/*
 * Responsibility
 * - /orders 系 handler
 * - POST はカートから注文を作り、カートを空にする (store 側で 1 操作)
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::{
        dto::{ExpandQuery, orders::OrderResponse},
        extractors::ApiQuery,
    },
    error::GatewayError,
    repos::models::Stamped,
    services::checkout,
    state::AppState,
};

pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExpandQuery>,
) -> Result<Json<Vec<OrderResponse>>, GatewayError> {
    let orders = state.store.list_orders().await?;
    let catalog = if query.wants("products") {
        Some(state.store.list_products().await?)
    } else {
        None
    };

    let res = orders
        .into_iter()
        .map(|order| OrderResponse::new(order, catalog.as_deref()))
        .collect();

    Ok(Json(res))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    ApiQuery(query): ApiQuery<ExpandQuery>,
) -> Result<Json<OrderResponse>, GatewayError> {
    let order = state
        .store
        .find_order(&order_id)
        .await?
        .ok_or_else(|| GatewayError::unhandled("Order not found"))?;

    let catalog = if query.wants("products") {
        Some(state.store.list_products().await?)
    } else {
        None
    };

    Ok(Json(OrderResponse::new(order, catalog.as_deref())))
}

pub async fn create_order(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<OrderResponse>), GatewayError> {
    let cart: Vec<_> = state
        .store
        .list_cart_items()
        .await?
        .into_iter()
        .map(|c| c.record)
        .collect();
    let products: Vec<_> = unstamp(state.store.list_products().await?);
    let options: Vec<_> = unstamp(state.store.list_delivery_options().await?);

    let now = Utc::now();
    let order = checkout::build_order(Uuid::new_v4().to_string(), &cart, &products, &options, now)?;
    let placed = state.store.place_order(order, now).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::new(placed, None))))
}

fn unstamp<T>(rows: Vec<Stamped<T>>) -> Vec<T> {
    rows.into_iter().map(|r| r.record).collect()
}
