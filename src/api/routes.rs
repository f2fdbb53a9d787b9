/*
 * Responsibility
 * - /api の URL 構造を定義
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use crate::api::handlers::{
    cart_items::{add_cart_item, delete_cart_item, list_cart_items, update_cart_item},
    delivery_options::list_delivery_options,
    health::health,
    orders::{create_order, get_order, list_orders},
    payment_summary::payment_summary,
    products::list_products,
    reset::reset,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(list_products))
        .route("/delivery-options", get(list_delivery_options))
        .route("/cart-items", get(list_cart_items).post(add_cart_item))
        .route(
            "/cart-items/{product_id}",
            put(update_cart_item).delete(delete_cart_item),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{order_id}", get(get_order))
        .route("/payment-summary", get(payment_summary))
        .route("/reset", post(reset))
}
