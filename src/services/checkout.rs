/*
 * Responsibility
 * - カートから支払いサマリ (商品代・送料・税) を計算
 * - カートから Order を組み立てる (合計・配送予定日時)
 * - store には触れない (handler 側で読み込んだ値を渡す)
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::repos::models::{CartItem, DeliveryOption, Order, OrderProduct, Product};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Product not found: {0}")]
    UnknownProduct(String),
    #[error("Delivery option not found: {0}")]
    UnknownDeliveryOption(String),
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Cart total is too large")]
    TotalOverflow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_items: i64,
    pub product_cost_cents: i64,
    pub shipping_cost_cents: i64,
    pub total_cost_before_tax_cents: i64,
    pub tax_cents: i64,
    pub total_cost_cents: i64,
}

fn add(a: i64, b: i64) -> Result<i64, CheckoutError> {
    a.checked_add(b).ok_or(CheckoutError::TotalOverflow)
}

/// 10%, rounded half up to the cent.
fn tax_cents(before_tax: i64) -> Result<i64, CheckoutError> {
    Ok(add(before_tax, 5)? / 10)
}

fn lookup<'a>(
    item: &CartItem,
    products: &'a [Product],
    options: &'a [DeliveryOption],
) -> Result<(&'a Product, &'a DeliveryOption), CheckoutError> {
    let product = products
        .iter()
        .find(|p| p.id == item.product_id)
        .ok_or_else(|| CheckoutError::UnknownProduct(item.product_id.clone()))?;
    let option = options
        .iter()
        .find(|o| o.id == item.delivery_option_id)
        .ok_or_else(|| CheckoutError::UnknownDeliveryOption(item.delivery_option_id.clone()))?;
    Ok((product, option))
}

pub fn summarize(
    cart: &[CartItem],
    products: &[Product],
    options: &[DeliveryOption],
) -> Result<PaymentSummary, CheckoutError> {
    let mut summary = PaymentSummary::default();

    for item in cart {
        let (product, option) = lookup(item, products, options)?;
        let line_cents = product
            .price_cents
            .checked_mul(item.quantity)
            .ok_or(CheckoutError::TotalOverflow)?;

        summary.total_items = add(summary.total_items, item.quantity)?;
        summary.product_cost_cents = add(summary.product_cost_cents, line_cents)?;
        summary.shipping_cost_cents = add(summary.shipping_cost_cents, option.price_cents)?;
    }

    summary.total_cost_before_tax_cents =
        add(summary.product_cost_cents, summary.shipping_cost_cents)?;
    summary.tax_cents = tax_cents(summary.total_cost_before_tax_cents)?;
    summary.total_cost_cents = add(summary.total_cost_before_tax_cents, summary.tax_cents)?;

    Ok(summary)
}

pub fn build_order(
    id: String,
    cart: &[CartItem],
    products: &[Product],
    options: &[DeliveryOption],
    now: DateTime<Utc>,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let summary = summarize(cart, products, options)?;
    let mut lines = Vec::with_capacity(cart.len());
    for item in cart {
        let (_, option) = lookup(item, products, options)?;
        lines.push(OrderProduct {
            product_id: item.product_id.clone(),
            quantity: item.quantity,
            estimated_delivery_time_ms: option.estimated_delivery_time(now).timestamp_millis(),
        });
    }

    Ok(Order {
        id,
        order_time_ms: now.timestamp_millis(),
        total_cost_cents: summary.total_cost_cents,
        products: lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::DefaultData;

    #[test]
    fn default_cart_summary() {
        let data = DefaultData::load().unwrap();

        let summary = summarize(&data.cart_items, &data.products, &data.delivery_options).unwrap();

        // 2 x 1090 socks (standard, free) + 1 x 2095 basketball (3 day, 499)
        assert_eq!(
            summary,
            PaymentSummary {
                total_items: 3,
                product_cost_cents: 4275,
                shipping_cost_cents: 499,
                total_cost_before_tax_cents: 4774,
                tax_cents: 477,
                total_cost_cents: 5251,
            }
        );
    }

    #[test]
    fn empty_cart_summary_is_zero() {
        let summary = summarize(&[], &[], &[]).unwrap();
        assert_eq!(summary, PaymentSummary::default());
    }

    #[test]
    fn tax_rounds_half_up() {
        assert_eq!(tax_cents(4774), Ok(477));
        assert_eq!(tax_cents(4775), Ok(478));
        assert_eq!(tax_cents(0), Ok(0));
    }

    #[test]
    fn oversized_cart_is_an_error_not_a_wrapped_total() {
        let data = DefaultData::load().unwrap();
        let huge = CartItem {
            product_id: data.products[0].id.clone(),
            quantity: i64::MAX,
            delivery_option_id: "1".into(),
        };

        assert_eq!(
            summarize(&[huge.clone()], &data.products, &data.delivery_options),
            Err(CheckoutError::TotalOverflow)
        );
        assert_eq!(
            build_order(
                "o".into(),
                &[huge],
                &data.products,
                &data.delivery_options,
                Utc::now()
            ),
            Err(CheckoutError::TotalOverflow)
        );
    }

    #[test]
    fn order_lines_carry_delivery_estimates() {
        let data = DefaultData::load().unwrap();
        let now = DateTime::from_timestamp_millis(1_000_000_000_000).unwrap();

        let order = build_order(
            "o-1".into(),
            &data.cart_items,
            &data.products,
            &data.delivery_options,
            now,
        )
        .unwrap();

        assert_eq!(order.order_time_ms, 1_000_000_000_000);
        assert_eq!(order.total_cost_cents, 5251);
        assert_eq!(
            order.products[0].estimated_delivery_time_ms,
            1_000_000_000_000 + 7 * 86_400_000
        );
        assert_eq!(
            order.products[1].estimated_delivery_time_ms,
            1_000_000_000_000 + 3 * 86_400_000
        );
    }

    #[test]
    fn unknown_references_and_empty_cart_are_rejected() {
        let data = DefaultData::load().unwrap();
        let stray = CartItem {
            product_id: "missing".into(),
            quantity: 1,
            delivery_option_id: "1".into(),
        };

        assert_eq!(
            summarize(&[stray], &data.products, &data.delivery_options),
            Err(CheckoutError::UnknownProduct("missing".into()))
        );
        assert_eq!(
            build_order("o".into(), &[], &data.products, &data.delivery_options, Utc::now()),
            Err(CheckoutError::EmptyCart)
        );
    }
}
