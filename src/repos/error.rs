/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("store unavailable")]
    Unavailable,
}

pub type RepoResult<T> = Result<T, RepoError>;
