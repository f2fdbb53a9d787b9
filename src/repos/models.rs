/*
 * Responsibility
 * - store に永続化されるエンティティ (Product / DeliveryOption / CartItem / Order)
 * - createdAt / updatedAt を付与した Stamped<T>
 * - JSON 表現は camelCase (seed ファイル・レスポンス共通)
 */
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub stars: f64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub image: String,
    pub name: String,
    pub rating: Rating,
    pub price_cents: i64,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_chart_link: Option<String>,
}

impl Product {
    /// Case-insensitive match against the name or any keyword.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self
                .keywords
                .iter()
                .any(|k| k.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOption {
    pub id: String,
    pub delivery_days: i64,
    pub price_cents: i64,
}

impl DeliveryOption {
    pub fn estimated_delivery_time(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        from + Duration::days(self.delivery_days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub quantity: i64,
    pub delivery_option_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    pub product_id: String,
    pub quantity: i64,
    pub estimated_delivery_time_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_time_ms: i64,
    pub total_cost_cents: i64,
    pub products: Vec<OrderProduct>,
}

/// A record together with the application-assigned row timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamped<T> {
    #[serde(flatten)]
    pub record: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Stamped<T> {
    pub fn at(record: T, at: DateTime<Utc>) -> Self {
        Self {
            record,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Stamps a batch so that row `i` gets `base + i` milliseconds.
///
/// Keeps a strict, collision-free order inside one bulk insert even when the clock
/// is coarser than the batch.
pub fn stamp_sequence<T>(records: Vec<T>, base: DateTime<Utc>) -> Vec<Stamped<T>> {
    records
        .into_iter()
        .zip(0_i64..)
        .map(|(record, index)| Stamped::at(record, base + Duration::milliseconds(index)))
        .collect()
}

/// One stamped copy of every collection, written together by `Store::replace_all`.
#[derive(Debug, Clone, Default)]
pub struct DatasetRows {
    pub products: Vec<Stamped<Product>>,
    pub delivery_options: Vec<Stamped<DeliveryOption>>,
    pub cart_items: Vec<Stamped<CartItem>>,
    pub orders: Vec<Stamped<Order>>,
}
