use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::repos::models::{Order, OrderProduct, Product, Stamped};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProductResponse {
    #[serde(flatten)]
    pub line: OrderProduct,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Stamped<Product>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: String,
    pub order_time_ms: i64,
    pub total_cost_cents: i64,
    pub products: Vec<OrderProductResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderResponse {
    /// `catalog` is only consulted when expanding; unknown ids expand to nothing.
    pub fn new(order: Stamped<Order>, catalog: Option<&[Stamped<Product>]>) -> Self {
        let products = order
            .record
            .products
            .into_iter()
            .map(|line| {
                let product = catalog.and_then(|c| {
                    c.iter()
                        .find(|p| p.record.id == line.product_id)
                        .cloned()
                });
                OrderProductResponse { line, product }
            })
            .collect();

        Self {
            id: order.record.id,
            order_time_ms: order.record.order_time_ms,
            total_cost_cents: order.record.total_cost_cents,
            products,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
