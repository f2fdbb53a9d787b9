/*
 * Responsibility
 * - /cart-items 系 handler
 * - 1 商品 = 1 行 (同じ商品の追加は数量を加算)
 * - 商品・配送オプションの存在確認はここで行う
 */
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    api::{
        dto::{
            ExpandQuery,
            cart_items::{AddCartItemRequest, CartItemResponse, UpdateCartItemRequest},
        },
        extractors::{ApiJson, ApiQuery},
    },
    error::GatewayError,
    repos::models::{CartItem, Stamped},
    state::AppState,
};

const DEFAULT_DELIVERY_OPTION_ID: &str = "1";

fn plain(item: Stamped<CartItem>) -> Json<CartItemResponse> {
    Json(CartItemResponse {
        item,
        product: None,
    })
}

pub async fn list_cart_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExpandQuery>,
) -> Result<Json<Vec<CartItemResponse>>, GatewayError> {
    let items = state.store.list_cart_items().await?;

    let products = if query.wants("product") {
        Some(state.store.list_products().await?)
    } else {
        None
    };

    let res = items
        .into_iter()
        .map(|item| {
            let product = products.as_ref().and_then(|ps| {
                ps.iter()
                    .find(|p| p.record.id == item.record.product_id)
                    .cloned()
            });
            CartItemResponse { item, product }
        })
        .collect();

    Ok(Json(res))
}

pub async fn add_cart_item(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddCartItemRequest>,
) -> Result<Json<CartItemResponse>, GatewayError> {
    req.validate().map_err(GatewayError::unhandled)?;

    state
        .store
        .find_product(&req.product_id)
        .await?
        .ok_or_else(|| GatewayError::unhandled("Product not found"))?;

    let item = match state.store.find_cart_item(&req.product_id).await? {
        Some(existing) => CartItem {
            quantity: existing
                .record
                .quantity
                .checked_add(req.quantity)
                .ok_or_else(|| GatewayError::unhandled("Quantity is too large"))?,
            ..existing.record
        },
        None => CartItem {
            product_id: req.product_id,
            quantity: req.quantity,
            delivery_option_id: DEFAULT_DELIVERY_OPTION_ID.to_string(),
        },
    };

    let saved = state.store.save_cart_item(item, Utc::now()).await?;
    Ok(plain(saved))
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ApiJson(req): ApiJson<UpdateCartItemRequest>,
) -> Result<Json<CartItemResponse>, GatewayError> {
    req.validate().map_err(GatewayError::unhandled)?;

    let existing = state
        .store
        .find_cart_item(&product_id)
        .await?
        .ok_or_else(|| GatewayError::unhandled("Cart item not found"))?;

    if let Some(id) = &req.delivery_option_id {
        state
            .store
            .find_delivery_option(id)
            .await?
            .ok_or_else(|| GatewayError::unhandled("Delivery option not found"))?;
    }

    let item = CartItem {
        quantity: req.quantity.unwrap_or(existing.record.quantity),
        delivery_option_id: req
            .delivery_option_id
            .unwrap_or(existing.record.delivery_option_id),
        product_id: existing.record.product_id,
    };

    let saved = state.store.save_cart_item(item, Utc::now()).await?;
    Ok(plain(saved))
}

pub async fn delete_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, GatewayError> {
    if state.store.delete_cart_item(&product_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(GatewayError::unhandled("Cart item not found"))
    }
}
