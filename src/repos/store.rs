//! Store interface used by the startup lifecycle and the resource handlers.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::repos::error::RepoResult;
use crate::repos::models::{CartItem, DeliveryOption, DatasetRows, Order, Product, Stamped};

/// Persistent store for the four storefront collections.
///
/// Notes:
/// - Every `insert_*` call is one atomic bulk insert: either all rows land or none do.
/// - Listings come back in `createdAt` order (orders: newest first).
/// - Implementations must be shareable across requests (`Arc<dyn Store>`).
#[async_trait]
pub trait Store: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Create every collection if absent. Never drops existing rows.
    async fn sync_schema(&self) -> RepoResult<()>;

    async fn count_products(&self) -> RepoResult<i64>;

    async fn insert_products(&self, rows: Vec<Stamped<Product>>) -> RepoResult<u64>;
    async fn insert_delivery_options(&self, rows: Vec<Stamped<DeliveryOption>>)
    -> RepoResult<u64>;
    async fn insert_cart_items(&self, rows: Vec<Stamped<CartItem>>) -> RepoResult<u64>;
    async fn insert_orders(&self, rows: Vec<Stamped<Order>>) -> RepoResult<u64>;

    async fn list_products(&self) -> RepoResult<Vec<Stamped<Product>>>;
    async fn find_product(&self, id: &str) -> RepoResult<Option<Stamped<Product>>>;

    async fn list_delivery_options(&self) -> RepoResult<Vec<Stamped<DeliveryOption>>>;
    async fn find_delivery_option(&self, id: &str) -> RepoResult<Option<Stamped<DeliveryOption>>>;

    async fn list_cart_items(&self) -> RepoResult<Vec<Stamped<CartItem>>>;
    async fn find_cart_item(&self, product_id: &str) -> RepoResult<Option<Stamped<CartItem>>>;
    // Insert or replace the row for `item.product_id`. `createdAt` survives a replace.
    async fn save_cart_item(&self, item: CartItem, now: DateTime<Utc>)
    -> RepoResult<Stamped<CartItem>>;
    // Returns false when there was no such row.
    async fn delete_cart_item(&self, product_id: &str) -> RepoResult<bool>;

    async fn list_orders(&self) -> RepoResult<Vec<Stamped<Order>>>;
    async fn find_order(&self, id: &str) -> RepoResult<Option<Stamped<Order>>>;
    // Store the order and empty the cart in one step.
    async fn place_order(&self, order: Order, now: DateTime<Utc>) -> RepoResult<Stamped<Order>>;

    // Swap every collection for `rows` in one step. On failure the old rows stay.
    async fn replace_all(&self, rows: DatasetRows) -> RepoResult<()>;
}
