/*
 * Responsibility
 * - 出荷時の初期データ (products / delivery options / cart / orders)
 * - JSON をバイナリに埋め込み、起動時に一度だけ parse する
 */
use serde::de::DeserializeOwned;

use crate::repos::models::{CartItem, DeliveryOption, Order, Product};

const PRODUCTS_JSON: &str = include_str!("data/products.json");
const DELIVERY_OPTIONS_JSON: &str = include_str!("data/delivery_options.json");
const CART_JSON: &str = include_str!("data/cart.json");
const ORDERS_JSON: &str = include_str!("data/orders.json");

#[derive(Debug, thiserror::Error)]
#[error("default dataset `{dataset}` is malformed: {source}")]
pub struct DatasetError {
    pub dataset: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// The four default datasets, in seeding order.
#[derive(Debug, Clone)]
pub struct DefaultData {
    pub products: Vec<Product>,
    pub delivery_options: Vec<DeliveryOption>,
    pub cart_items: Vec<CartItem>,
    pub orders: Vec<Order>,
}

fn parse<T: DeserializeOwned>(dataset: &'static str, raw: &str) -> Result<Vec<T>, DatasetError> {
    serde_json::from_str(raw).map_err(|source| DatasetError { dataset, source })
}

impl DefaultData {
    pub fn load() -> Result<Self, DatasetError> {
        Ok(Self {
            products: parse("products", PRODUCTS_JSON)?,
            delivery_options: parse("delivery_options", DELIVERY_OPTIONS_JSON)?,
            cart_items: parse("cart", CART_JSON)?,
            orders: parse("orders", ORDERS_JSON)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_datasets_parse() {
        let data = DefaultData::load().unwrap();

        assert_eq!(data.products.len(), 10);
        assert_eq!(data.delivery_options.len(), 3);
        assert_eq!(data.cart_items.len(), 2);
        assert_eq!(data.orders.len(), 2);
    }

    // cart and orders must only point at shipped products / options
    #[test]
    fn bundled_references_resolve() {
        let data = DefaultData::load().unwrap();
        let has_product = |id: &str| data.products.iter().any(|p| p.id == id);

        for item in &data.cart_items {
            assert!(has_product(&item.product_id), "{}", item.product_id);
            assert!(
                data.delivery_options
                    .iter()
                    .any(|o| o.id == item.delivery_option_id)
            );
        }
        for order in &data.orders {
            assert!(order.products.iter().all(|p| has_product(&p.product_id)));
        }
    }

    #[test]
    fn malformed_dataset_names_itself() {
        let err = parse::<Product>("products", "[{\"id\": 1}]").unwrap_err();
        assert_eq!(err.dataset, "products");
    }
}
