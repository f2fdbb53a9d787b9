//! In-process store (`DATABASE_URL=memory`), also the store used by the tests.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::repos::error::{RepoError, RepoResult};
use crate::repos::models::{CartItem, DeliveryOption, DatasetRows, Order, Product, Stamped};
use crate::repos::store::Store;

#[derive(Debug, Default)]
struct Tables {
    products: Vec<Stamped<Product>>,
    delivery_options: Vec<Stamped<DeliveryOption>>,
    cart_items: Vec<Stamped<CartItem>>,
    orders: Vec<Stamped<Order>>,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// All-or-nothing: the batch is checked against the table and itself before anything is pushed.
fn insert_all<T>(
    table: &mut Vec<Stamped<T>>,
    rows: Vec<Stamped<T>>,
    key: fn(&T) -> &str,
) -> RepoResult<u64> {
    for (i, row) in rows.iter().enumerate() {
        let k = key(&row.record);
        let clashes_table = table.iter().any(|r| key(&r.record) == k);
        let clashes_batch = rows[..i].iter().any(|r| key(&r.record) == k);
        if clashes_table || clashes_batch {
            return Err(RepoError::Duplicate(k.to_string()));
        }
    }

    let n = rows.len() as u64;
    table.extend(rows);
    Ok(n)
}

fn by_created_at<T: Clone>(table: &[Stamped<T>]) -> Vec<Stamped<T>> {
    let mut rows = table.to_vec();
    rows.sort_by_key(|r| r.created_at);
    rows
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn sync_schema(&self) -> RepoResult<()> {
        Ok(())
    }

    async fn count_products(&self) -> RepoResult<i64> {
        Ok(self.tables.read().await.products.len() as i64)
    }

    async fn insert_products(&self, rows: Vec<Stamped<Product>>) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        insert_all(&mut tables.products, rows, |p| p.id.as_str())
    }

    async fn insert_delivery_options(
        &self,
        rows: Vec<Stamped<DeliveryOption>>,
    ) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        insert_all(&mut tables.delivery_options, rows, |o| o.id.as_str())
    }

    async fn insert_cart_items(&self, rows: Vec<Stamped<CartItem>>) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        insert_all(&mut tables.cart_items, rows, |c| c.product_id.as_str())
    }

    async fn insert_orders(&self, rows: Vec<Stamped<Order>>) -> RepoResult<u64> {
        let mut tables = self.tables.write().await;
        insert_all(&mut tables.orders, rows, |o| o.id.as_str())
    }

    async fn list_products(&self) -> RepoResult<Vec<Stamped<Product>>> {
        Ok(by_created_at(&self.tables.read().await.products))
    }

    async fn find_product(&self, id: &str) -> RepoResult<Option<Stamped<Product>>> {
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.record.id == id).cloned())
    }

    async fn list_delivery_options(&self) -> RepoResult<Vec<Stamped<DeliveryOption>>> {
        Ok(by_created_at(&self.tables.read().await.delivery_options))
    }

    async fn find_delivery_option(&self, id: &str) -> RepoResult<Option<Stamped<DeliveryOption>>> {
        let tables = self.tables.read().await;
        Ok(tables
            .delivery_options
            .iter()
            .find(|o| o.record.id == id)
            .cloned())
    }

    async fn list_cart_items(&self) -> RepoResult<Vec<Stamped<CartItem>>> {
        Ok(by_created_at(&self.tables.read().await.cart_items))
    }

    async fn find_cart_item(&self, product_id: &str) -> RepoResult<Option<Stamped<CartItem>>> {
        let tables = self.tables.read().await;
        Ok(tables
            .cart_items
            .iter()
            .find(|c| c.record.product_id == product_id)
            .cloned())
    }

    async fn save_cart_item(
        &self,
        item: CartItem,
        now: DateTime<Utc>,
    ) -> RepoResult<Stamped<CartItem>> {
        let mut tables = self.tables.write().await;

        if let Some(row) = tables
            .cart_items
            .iter_mut()
            .find(|c| c.record.product_id == item.product_id)
        {
            row.record = item;
            row.updated_at = now;
            return Ok(row.clone());
        }

        let row = Stamped::at(item, now);
        tables.cart_items.push(row.clone());
        Ok(row)
    }

    async fn delete_cart_item(&self, product_id: &str) -> RepoResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.cart_items.len();
        tables.cart_items.retain(|c| c.record.product_id != product_id);
        Ok(tables.cart_items.len() < before)
    }

    async fn list_orders(&self) -> RepoResult<Vec<Stamped<Order>>> {
        let mut rows = by_created_at(&self.tables.read().await.orders);
        rows.reverse();
        Ok(rows)
    }

    async fn find_order(&self, id: &str) -> RepoResult<Option<Stamped<Order>>> {
        let tables = self.tables.read().await;
        Ok(tables.orders.iter().find(|o| o.record.id == id).cloned())
    }

    async fn place_order(&self, order: Order, now: DateTime<Utc>) -> RepoResult<Stamped<Order>> {
        let mut tables = self.tables.write().await;
        let row = Stamped::at(order, now);
        insert_all(&mut tables.orders, vec![row.clone()], |o| o.id.as_str())?;
        tables.cart_items.clear();
        Ok(row)
    }

    async fn replace_all(&self, rows: DatasetRows) -> RepoResult<()> {
        let mut fresh = Tables::default();
        insert_all(&mut fresh.products, rows.products, |p| p.id.as_str())?;
        insert_all(&mut fresh.delivery_options, rows.delivery_options, |o| {
            o.id.as_str()
        })?;
        insert_all(&mut fresh.cart_items, rows.cart_items, |c| {
            c.product_id.as_str()
        })?;
        insert_all(&mut fresh.orders, rows.orders, |o| o.id.as_str())?;

        *self.tables.write().await = fresh;
        Ok(())
    }
}
