//! Test doubles for the store seam.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::models::{CartItem, DeliveryOption, DatasetRows, Order, Product, Stamped};
use crate::repos::store::Store;

/// Every call fails as if the database were down.
pub struct UnreachableStore;

#[async_trait]
impl Store for UnreachableStore {
    fn backend_name(&self) -> &'static str {
        "unreachable"
    }

    async fn sync_schema(&self) -> RepoResult<()> {
        Err(RepoError::Unavailable)
    }

    async fn count_products(&self) -> RepoResult<i64> {
        Err(RepoError::Unavailable)
    }

    async fn insert_products(&self, _: Vec<Stamped<Product>>) -> RepoResult<u64> {
        Err(RepoError::Unavailable)
    }

    async fn insert_delivery_options(&self, _: Vec<Stamped<DeliveryOption>>) -> RepoResult<u64> {
        Err(RepoError::Unavailable)
    }

    async fn insert_cart_items(&self, _: Vec<Stamped<CartItem>>) -> RepoResult<u64> {
        Err(RepoError::Unavailable)
    }

    async fn insert_orders(&self, _: Vec<Stamped<Order>>) -> RepoResult<u64> {
        Err(RepoError::Unavailable)
    }

    async fn list_products(&self) -> RepoResult<Vec<Stamped<Product>>> {
        Err(RepoError::Unavailable)
    }

    async fn find_product(&self, _: &str) -> RepoResult<Option<Stamped<Product>>> {
        Err(RepoError::Unavailable)
    }

    async fn list_delivery_options(&self) -> RepoResult<Vec<Stamped<DeliveryOption>>> {
        Err(RepoError::Unavailable)
    }

    async fn find_delivery_option(&self, _: &str) -> RepoResult<Option<Stamped<DeliveryOption>>> {
        Err(RepoError::Unavailable)
    }

    async fn list_cart_items(&self) -> RepoResult<Vec<Stamped<CartItem>>> {
        Err(RepoError::Unavailable)
    }

    async fn find_cart_item(&self, _: &str) -> RepoResult<Option<Stamped<CartItem>>> {
        Err(RepoError::Unavailable)
    }

    async fn save_cart_item(&self, _: CartItem, _: DateTime<Utc>) -> RepoResult<Stamped<CartItem>> {
        Err(RepoError::Unavailable)
    }

    async fn delete_cart_item(&self, _: &str) -> RepoResult<bool> {
        Err(RepoError::Unavailable)
    }

    async fn list_orders(&self) -> RepoResult<Vec<Stamped<Order>>> {
        Err(RepoError::Unavailable)
    }

    async fn find_order(&self, _: &str) -> RepoResult<Option<Stamped<Order>>> {
        Err(RepoError::Unavailable)
    }

    async fn place_order(&self, _: Order, _: DateTime<Utc>) -> RepoResult<Stamped<Order>> {
        Err(RepoError::Unavailable)
    }

    async fn replace_all(&self, _: DatasetRows) -> RepoResult<()> {
        Err(RepoError::Unavailable)
    }
}

/// Schema sync never completes, as with a database that accepts the connection and
/// then hangs. Everything else fails like `UnreachableStore`.
pub struct StalledStore;

#[async_trait]
impl Store for StalledStore {
    fn backend_name(&self) -> &'static str {
        "stalled"
    }

    async fn sync_schema(&self) -> RepoResult<()> {
        std::future::pending().await
    }

    async fn count_products(&self) -> RepoResult<i64> {
        UnreachableStore.count_products().await
    }

    async fn insert_products(&self, rows: Vec<Stamped<Product>>) -> RepoResult<u64> {
        UnreachableStore.insert_products(rows).await
    }

    async fn insert_delivery_options(&self, rows: Vec<Stamped<DeliveryOption>>) -> RepoResult<u64> {
        UnreachableStore.insert_delivery_options(rows).await
    }

    async fn insert_cart_items(&self, rows: Vec<Stamped<CartItem>>) -> RepoResult<u64> {
        UnreachableStore.insert_cart_items(rows).await
    }

    async fn insert_orders(&self, rows: Vec<Stamped<Order>>) -> RepoResult<u64> {
        UnreachableStore.insert_orders(rows).await
    }

    async fn list_products(&self) -> RepoResult<Vec<Stamped<Product>>> {
        UnreachableStore.list_products().await
    }

    async fn find_product(&self, id: &str) -> RepoResult<Option<Stamped<Product>>> {
        UnreachableStore.find_product(id).await
    }

    async fn list_delivery_options(&self) -> RepoResult<Vec<Stamped<DeliveryOption>>> {
        UnreachableStore.list_delivery_options().await
    }

    async fn find_delivery_option(&self, id: &str) -> RepoResult<Option<Stamped<DeliveryOption>>> {
        UnreachableStore.find_delivery_option(id).await
    }

    async fn list_cart_items(&self) -> RepoResult<Vec<Stamped<CartItem>>> {
        UnreachableStore.list_cart_items().await
    }

    async fn find_cart_item(&self, product_id: &str) -> RepoResult<Option<Stamped<CartItem>>> {
        UnreachableStore.find_cart_item(product_id).await
    }

    async fn save_cart_item(
        &self,
        item: CartItem,
        now: DateTime<Utc>,
    ) -> RepoResult<Stamped<CartItem>> {
        UnreachableStore.save_cart_item(item, now).await
    }

    async fn delete_cart_item(&self, product_id: &str) -> RepoResult<bool> {
        UnreachableStore.delete_cart_item(product_id).await
    }

    async fn list_orders(&self) -> RepoResult<Vec<Stamped<Order>>> {
        UnreachableStore.list_orders().await
    }

    async fn find_order(&self, id: &str) -> RepoResult<Option<Stamped<Order>>> {
        UnreachableStore.find_order(id).await
    }

    async fn place_order(&self, order: Order, now: DateTime<Utc>) -> RepoResult<Stamped<Order>> {
        UnreachableStore.place_order(order, now).await
    }

    async fn replace_all(&self, rows: DatasetRows) -> RepoResult<()> {
        UnreachableStore.replace_all(rows).await
    }
}
