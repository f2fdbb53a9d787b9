//! Store lifecycle: schema sync, then the one-time seed check.
//!
//! `Uninitialized -> SchemaSynced -> SeedChecked -> Ready`
//!
//! - Runs once per process, before the listener binds.
//! - Seeding happens only when the product collection is empty. That count is the only
//!   signal, so a restart against a non-empty store never seeds again.
//! - Any failure leaves the lifecycle short of `Ready`; the caller must not serve.
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::repos::models::{DatasetRows, stamp_sequence};
use crate::repos::store::Store;
use crate::seed::{DatasetError, DefaultData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    SchemaSynced,
    SeedChecked,
    Ready,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
    pub products: u64,
    pub delivery_options: u64,
    pub cart_items: u64,
    pub orders: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Skipped { existing_products: i64 },
    Seeded(SeedCounts),
}

#[derive(Debug, Error)]
#[error("bulk insert of `{dataset}` failed")]
pub struct SeedError {
    pub dataset: &'static str,
    #[source]
    pub source: RepoError,
}

/// Fatal startup failures. None of these are retried.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("schema sync failed")]
    SchemaSync(#[source] RepoError),
    #[error("seed check failed")]
    SeedCheck(#[source] RepoError),
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("store connection failed")]
    Connect(#[source] RepoError),
    #[error("startup did not finish within {0:?}")]
    Timeout(Duration),
}

/// Stamps every dataset from one `base`; each restarts its own index at 0.
pub fn stamp_dataset(data: &DefaultData, base: DateTime<Utc>) -> DatasetRows {
    DatasetRows {
        products: stamp_sequence(data.products.clone(), base),
        delivery_options: stamp_sequence(data.delivery_options.clone(), base),
        cart_items: stamp_sequence(data.cart_items.clone(), base),
        orders: stamp_sequence(data.orders.clone(), base),
    }
}

impl From<&DatasetRows> for SeedCounts {
    fn from(rows: &DatasetRows) -> Self {
        Self {
            products: rows.products.len() as u64,
            delivery_options: rows.delivery_options.len() as u64,
            cart_items: rows.cart_items.len() as u64,
            orders: rows.orders.len() as u64,
        }
    }
}

/// Bulk-inserts the four datasets in order (products, delivery options, cart, orders).
pub async fn seed_all(
    store: &dyn Store,
    data: &DefaultData,
    base: DateTime<Utc>,
) -> Result<SeedCounts, SeedError> {
    let rows = stamp_dataset(data, base);

    let products = store
        .insert_products(rows.products)
        .await
        .map_err(|source| SeedError {
            dataset: "products",
            source,
        })?;
    let delivery_options = store
        .insert_delivery_options(rows.delivery_options)
        .await
        .map_err(|source| SeedError {
            dataset: "delivery_options",
            source,
        })?;
    let cart_items = store
        .insert_cart_items(rows.cart_items)
        .await
        .map_err(|source| SeedError {
            dataset: "cart_items",
            source,
        })?;
    let orders = store
        .insert_orders(rows.orders)
        .await
        .map_err(|source| SeedError {
            dataset: "orders",
            source,
        })?;

    Ok(SeedCounts {
        products,
        delivery_options,
        cart_items,
        orders,
    })
}

pub struct Lifecycle<'a> {
    store: &'a dyn Store,
    data: &'a DefaultData,
    phase: Phase,
}

impl<'a> Lifecycle<'a> {
    pub fn new(store: &'a dyn Store, data: &'a DefaultData) -> Self {
        Self {
            store,
            data,
            phase: Phase::Uninitialized,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub async fn run(&mut self) -> Result<SeedOutcome, StartupError> {
        self.store
            .sync_schema()
            .await
            .map_err(StartupError::SchemaSync)?;
        self.phase = Phase::SchemaSynced;
        tracing::info!(backend = self.store.backend_name(), "schema synchronized");

        let existing_products = self
            .store
            .count_products()
            .await
            .map_err(StartupError::SeedCheck)?;
        self.phase = Phase::SeedChecked;

        let outcome = if existing_products == 0 {
            let base = Utc::now();
            let counts = seed_all(self.store, self.data, base).await?;
            tracing::info!(
                products = counts.products,
                delivery_options = counts.delivery_options,
                cart_items = counts.cart_items,
                orders = counts.orders,
                "default data added to the database"
            );
            SeedOutcome::Seeded(counts)
        } else {
            tracing::info!(existing_products, "store already populated, skipping seed");
            SeedOutcome::Skipped { existing_products }
        };

        self.phase = Phase::Ready;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::memory::MemoryStore;
    use crate::repos::models::{DeliveryOption, Stamped};
    use crate::repos::testing::UnreachableStore;

    fn data() -> DefaultData {
        DefaultData::load().unwrap()
    }

    #[tokio::test]
    async fn empty_store_is_seeded_with_every_dataset() {
        let store = MemoryStore::new();
        let data = data();
        let mut lifecycle = Lifecycle::new(&store, &data);

        let outcome = lifecycle.run().await.unwrap();

        assert_eq!(lifecycle.phase(), Phase::Ready);
        assert_eq!(
            outcome,
            SeedOutcome::Seeded(SeedCounts {
                products: data.products.len() as u64,
                delivery_options: data.delivery_options.len() as u64,
                cart_items: data.cart_items.len() as u64,
                orders: data.orders.len() as u64,
            })
        );
        assert_eq!(store.list_products().await.unwrap().len(), data.products.len());
        assert_eq!(
            store.list_delivery_options().await.unwrap().len(),
            data.delivery_options.len()
        );
        assert_eq!(store.list_cart_items().await.unwrap().len(), data.cart_items.len());
        assert_eq!(store.list_orders().await.unwrap().len(), data.orders.len());
    }

    #[tokio::test]
    async fn rerun_never_duplicates_seed_rows() {
        let store = MemoryStore::new();
        let data = data();

        Lifecycle::new(&store, &data).run().await.unwrap();
        let outcome = Lifecycle::new(&store, &data).run().await.unwrap();

        assert_eq!(
            outcome,
            SeedOutcome::Skipped {
                existing_products: data.products.len() as i64
            }
        );
        assert_eq!(store.list_products().await.unwrap().len(), data.products.len());
        assert_eq!(store.list_orders().await.unwrap().len(), data.orders.len());
    }

    // products is the only gate: an empty cart next to a product does not trigger seeding
    #[tokio::test]
    async fn populated_products_skip_every_collection() {
        let store = MemoryStore::new();
        let data = data();
        store
            .insert_products(stamp_sequence(data.products[..1].to_vec(), Utc::now()))
            .await
            .unwrap();

        let outcome = Lifecycle::new(&store, &data).run().await.unwrap();

        assert_eq!(outcome, SeedOutcome::Skipped { existing_products: 1 });
        assert!(store.list_delivery_options().await.unwrap().is_empty());
        assert!(store.list_cart_items().await.unwrap().is_empty());
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_timestamps_are_base_plus_index_per_dataset() {
        let store = MemoryStore::new();
        let data = data();
        let base = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();

        seed_all(&store, &data, base).await.unwrap();

        let products: Vec<i64> = store
            .list_products()
            .await
            .unwrap()
            .iter()
            .map(|p| p.created_at.timestamp_millis())
            .collect();
        let expected: Vec<i64> = (0..data.products.len() as i64)
            .map(|i| 1_700_000_000_000 + i)
            .collect();
        assert_eq!(products, expected);

        // each dataset restarts at base + 0
        let options = store.list_delivery_options().await.unwrap();
        assert_eq!(options[0].created_at, base);
        assert_eq!(options[2].updated_at.timestamp_millis(), 1_700_000_000_002);
    }

    #[tokio::test]
    async fn failed_bulk_insert_is_fatal_and_never_ready() {
        let store = MemoryStore::new();
        let data = data();
        // a leftover delivery option with a clashing id, but no products
        store
            .insert_delivery_options(vec![Stamped::at(
                DeliveryOption {
                    id: "1".into(),
                    delivery_days: 5,
                    price_cents: 100,
                },
                Utc::now(),
            )])
            .await
            .unwrap();
        let mut lifecycle = Lifecycle::new(&store, &data);

        let err = lifecycle.run().await.unwrap_err();

        assert!(matches!(
            err,
            StartupError::Seed(SeedError {
                dataset: "delivery_options",
                ..
            })
        ));
        assert_eq!(lifecycle.phase(), Phase::SeedChecked);
        // products went in, the failing dataset left nothing behind, later ones never ran
        assert_eq!(store.list_products().await.unwrap().len(), data.products.len());
        assert_eq!(store.list_delivery_options().await.unwrap().len(), 1);
        assert!(store.list_cart_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_store_fails_schema_sync() {
        let data = data();
        let mut lifecycle = Lifecycle::new(&UnreachableStore, &data);

        let err = lifecycle.run().await.unwrap_err();

        assert!(matches!(err, StartupError::SchemaSync(RepoError::Unavailable)));
        assert_eq!(lifecycle.phase(), Phase::Uninitialized);
    }
}
