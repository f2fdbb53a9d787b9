/*
 * Responsibility
 * - 永続化レイヤの公開インターフェース
 * - Store trait と実装 (Postgres / in-memory)
 */
pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;
#[cfg(test)]
pub mod testing;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::Store;
