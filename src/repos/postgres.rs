/*
 * Responsibility
 * - Store trait の Postgres 実装 (SQLx)
 * - スキーマは CREATE TABLE IF NOT EXISTS (既存データを壊さない)
 * - bulk insert は 1 dataset = 1 transaction
 * - replace_all (reset) は削除と再投入を 1 transaction で行う
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    FromRow, PgConnection, PgPool, Postgres, QueryBuilder, postgres::PgPoolOptions, types::Json,
};

use crate::repos::error::RepoResult;
use crate::repos::models::{
    CartItem, DatasetRows, DeliveryOption, Order, OrderProduct, Product, Rating, Stamped,
};
use crate::repos::store::Store;

/// Applied in order; later tables reference earlier ones.
const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id TEXT PRIMARY KEY,
        image TEXT NOT NULL,
        name TEXT NOT NULL,
        "ratingStars" DOUBLE PRECISION NOT NULL,
        "ratingCount" BIGINT NOT NULL,
        "priceCents" BIGINT NOT NULL,
        keywords TEXT[] NOT NULL DEFAULT '{}',
        type TEXT,
        "sizeChartLink" TEXT,
        "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
        "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS delivery_options (
        id TEXT PRIMARY KEY,
        "deliveryDays" BIGINT NOT NULL,
        "priceCents" BIGINT NOT NULL,
        "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
        "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cart_items (
        "productId" TEXT PRIMARY KEY REFERENCES products (id) ON DELETE CASCADE,
        quantity BIGINT NOT NULL,
        "deliveryOptionId" TEXT NOT NULL REFERENCES delivery_options (id),
        "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
        "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id TEXT PRIMARY KEY,
        "orderTimeMs" BIGINT NOT NULL,
        "totalCostCents" BIGINT NOT NULL,
        products JSONB NOT NULL,
        "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
        "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

const PRODUCT_COLUMNS: &str = r#"
    id, image, name, "ratingStars", "ratingCount", "priceCents", keywords, type,
    "sizeChartLink", "createdAt", "updatedAt"
"#;

#[derive(Debug, FromRow)]
struct ProductRow {
    id: String,
    image: String,
    name: String,
    #[sqlx(rename = "ratingStars")]
    rating_stars: f64,
    #[sqlx(rename = "ratingCount")]
    rating_count: i64,
    #[sqlx(rename = "priceCents")]
    price_cents: i64,
    keywords: Vec<String>,
    #[sqlx(rename = "type")]
    kind: Option<String>,
    #[sqlx(rename = "sizeChartLink")]
    size_chart_link: Option<String>,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Stamped<Product> {
    fn from(row: ProductRow) -> Self {
        Stamped {
            record: Product {
                id: row.id,
                image: row.image,
                name: row.name,
                rating: Rating {
                    stars: row.rating_stars,
                    count: row.rating_count,
                },
                price_cents: row.price_cents,
                keywords: row.keywords,
                kind: row.kind,
                size_chart_link: row.size_chart_link,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct DeliveryOptionRow {
    id: String,
    #[sqlx(rename = "deliveryDays")]
    delivery_days: i64,
    #[sqlx(rename = "priceCents")]
    price_cents: i64,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl From<DeliveryOptionRow> for Stamped<DeliveryOption> {
    fn from(row: DeliveryOptionRow) -> Self {
        Stamped {
            record: DeliveryOption {
                id: row.id,
                delivery_days: row.delivery_days,
                price_cents: row.price_cents,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CartItemRow {
    #[sqlx(rename = "productId")]
    product_id: String,
    quantity: i64,
    #[sqlx(rename = "deliveryOptionId")]
    delivery_option_id: String,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl From<CartItemRow> for Stamped<CartItem> {
    fn from(row: CartItemRow) -> Self {
        Stamped {
            record: CartItem {
                product_id: row.product_id,
                quantity: row.quantity,
                delivery_option_id: row.delivery_option_id,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: String,
    #[sqlx(rename = "orderTimeMs")]
    order_time_ms: i64,
    #[sqlx(rename = "totalCostCents")]
    total_cost_cents: i64,
    products: Json<Vec<OrderProduct>>,
    #[sqlx(rename = "createdAt")]
    created_at: DateTime<Utc>,
    #[sqlx(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Stamped<Order> {
    fn from(row: OrderRow) -> Self {
        Stamped {
            record: Order {
                id: row.id,
                order_time_ms: row.order_time_ms,
                total_cost_cents: row.total_cost_cents,
                products: row.products.0,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

async fn write_products(conn: &mut PgConnection, rows: Vec<Stamped<Product>>) -> RepoResult<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"INSERT INTO products (id, image, name, "ratingStars", "ratingCount", "priceCents", keywords, type, "sizeChartLink", "createdAt", "updatedAt") "#,
    );
    qb.push_values(rows, |mut b, row| {
        let p = row.record;
        b.push_bind(p.id)
            .push_bind(p.image)
            .push_bind(p.name)
            .push_bind(p.rating.stars)
            .push_bind(p.rating.count)
            .push_bind(p.price_cents)
            .push_bind(p.keywords)
            .push_bind(p.kind)
            .push_bind(p.size_chart_link)
            .push_bind(row.created_at)
            .push_bind(row.updated_at);
    });

    let done = qb.build().execute(&mut *conn).await?;
    Ok(done.rows_affected())
}

async fn write_delivery_options(
    conn: &mut PgConnection,
    rows: Vec<Stamped<DeliveryOption>>,
) -> RepoResult<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"INSERT INTO delivery_options (id, "deliveryDays", "priceCents", "createdAt", "updatedAt") "#,
    );
    qb.push_values(rows, |mut b, row| {
        b.push_bind(row.record.id)
            .push_bind(row.record.delivery_days)
            .push_bind(row.record.price_cents)
            .push_bind(row.created_at)
            .push_bind(row.updated_at);
    });

    let done = qb.build().execute(&mut *conn).await?;
    Ok(done.rows_affected())
}

async fn write_cart_items(conn: &mut PgConnection, rows: Vec<Stamped<CartItem>>) -> RepoResult<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"INSERT INTO cart_items ("productId", quantity, "deliveryOptionId", "createdAt", "updatedAt") "#,
    );
    qb.push_values(rows, |mut b, row| {
        b.push_bind(row.record.product_id)
            .push_bind(row.record.quantity)
            .push_bind(row.record.delivery_option_id)
            .push_bind(row.created_at)
            .push_bind(row.updated_at);
    });

    let done = qb.build().execute(&mut *conn).await?;
    Ok(done.rows_affected())
}

async fn write_orders(conn: &mut PgConnection, rows: Vec<Stamped<Order>>) -> RepoResult<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"INSERT INTO orders (id, "orderTimeMs", "totalCostCents", products, "createdAt", "updatedAt") "#,
    );
    qb.push_values(rows, |mut b, row| {
        b.push_bind(row.record.id)
            .push_bind(row.record.order_time_ms)
            .push_bind(row.record.total_cost_cents)
            .push_bind(Json(row.record.products))
            .push_bind(row.created_at)
            .push_bind(row.updated_at);
    });

    let done = qb.build().execute(&mut *conn).await?;
    Ok(done.rows_affected())
}

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> RepoResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn sync_schema(&self) -> RepoResult<()> {
        for ddl in SCHEMA {
            sqlx::query(ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn count_products(&self) -> RepoResult<i64> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    async fn insert_products(&self, rows: Vec<Stamped<Product>>) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await?;
        let n = write_products(&mut *tx, rows).await?;
        tx.commit().await?;
        Ok(n)
    }

    async fn insert_delivery_options(
        &self,
        rows: Vec<Stamped<DeliveryOption>>,
    ) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await?;
        let n = write_delivery_options(&mut *tx, rows).await?;
        tx.commit().await?;
        Ok(n)
    }

    async fn insert_cart_items(&self, rows: Vec<Stamped<CartItem>>) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await?;
        let n = write_cart_items(&mut *tx, rows).await?;
        tx.commit().await?;
        Ok(n)
    }

    async fn insert_orders(&self, rows: Vec<Stamped<Order>>) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await?;
        let n = write_orders(&mut *tx, rows).await?;
        tx.commit().await?;
        Ok(n)
    }

    async fn list_products(&self) -> RepoResult<Vec<Stamped<Product>>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM products ORDER BY "createdAt" ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_product(&self, id: &str) -> RepoResult<Option<Stamped<Product>>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_delivery_options(&self) -> RepoResult<Vec<Stamped<DeliveryOption>>> {
        let rows = sqlx::query_as::<_, DeliveryOptionRow>(
            r#"
            SELECT id, "deliveryDays", "priceCents", "createdAt", "updatedAt"
            FROM delivery_options
            ORDER BY "createdAt" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_delivery_option(&self, id: &str) -> RepoResult<Option<Stamped<DeliveryOption>>> {
        let row = sqlx::query_as::<_, DeliveryOptionRow>(
            r#"
            SELECT id, "deliveryDays", "priceCents", "createdAt", "updatedAt"
            FROM delivery_options
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_cart_items(&self) -> RepoResult<Vec<Stamped<CartItem>>> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT "productId", quantity, "deliveryOptionId", "createdAt", "updatedAt"
            FROM cart_items
            ORDER BY "createdAt" ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_cart_item(&self, product_id: &str) -> RepoResult<Option<Stamped<CartItem>>> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT "productId", quantity, "deliveryOptionId", "createdAt", "updatedAt"
            FROM cart_items
            WHERE "productId" = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn save_cart_item(
        &self,
        item: CartItem,
        now: DateTime<Utc>,
    ) -> RepoResult<Stamped<CartItem>> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r#"
            INSERT INTO cart_items ("productId", quantity, "deliveryOptionId", "createdAt", "updatedAt")
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT ("productId") DO UPDATE
            SET
                quantity = EXCLUDED.quantity,
                "deliveryOptionId" = EXCLUDED."deliveryOptionId",
                "updatedAt" = EXCLUDED."updatedAt"
            RETURNING "productId", quantity, "deliveryOptionId", "createdAt", "updatedAt"
            "#,
        )
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.delivery_option_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete_cart_item(&self, product_id: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM cart_items
            WHERE "productId" = $1
            "#,
        )
        .bind(product_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_orders(&self) -> RepoResult<Vec<Stamped<Order>>> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, "orderTimeMs", "totalCostCents", products, "createdAt", "updatedAt"
            FROM orders
            ORDER BY "createdAt" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_order(&self, id: &str) -> RepoResult<Option<Stamped<Order>>> {
        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT id, "orderTimeMs", "totalCostCents", products, "createdAt", "updatedAt"
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn place_order(&self, order: Order, now: DateTime<Utc>) -> RepoResult<Stamped<Order>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (id, "orderTimeMs", "totalCostCents", products, "createdAt", "updatedAt")
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, "orderTimeMs", "totalCostCents", products, "createdAt", "updatedAt"
            "#,
        )
        .bind(order.id)
        .bind(order.order_time_ms)
        .bind(order.total_cost_cents)
        .bind(Json(order.products))
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cart_items")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    async fn replace_all(&self, rows: DatasetRows) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        // children first (FK)
        for table in ["cart_items", "orders", "delivery_options", "products"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        write_products(&mut *tx, rows.products).await?;
        write_delivery_options(&mut *tx, rows.delivery_options).await?;
        write_cart_items(&mut *tx, rows.cart_items).await?;
        write_orders(&mut *tx, rows.orders).await?;
        tx.commit().await?;
        Ok(())
    }
}
