/*
 * Responsibility
 * - cart-items の request/response DTO
 * - validate() で形式チェック (数量の範囲など)
 */
use serde::{Deserialize, Serialize};

use crate::repos::models::{CartItem, Product, Stamped};

pub const MAX_QUANTITY: i64 = 10;

const QUANTITY_RANGE_MESSAGE: &str = "Quantity must be a number between 1 and 10";

fn one() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub product_id: String,
    #[serde(default = "one")]
    pub quantity: i64,
}

impl AddCartItemRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.product_id.trim().is_empty() {
            return Err("productId is required");
        }
        if !(1..=MAX_QUANTITY).contains(&self.quantity) {
            return Err(QUANTITY_RANGE_MESSAGE);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub quantity: Option<i64>,
    pub delivery_option_id: Option<String>,
}

impl UpdateCartItemRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(quantity) = self.quantity
            && !(1..=MAX_QUANTITY).contains(&quantity)
        {
            return Err(QUANTITY_RANGE_MESSAGE);
        }
        if let Some(id) = &self.delivery_option_id
            && id.trim().is_empty()
        {
            return Err("deliveryOptionId cannot be empty");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    #[serde(flatten)]
    pub item: Stamped<CartItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Stamped<Product>>,
}
