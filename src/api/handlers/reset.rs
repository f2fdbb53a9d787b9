/*
 * Responsibility
 * - POST /api/reset: 全コレクションを初期データで置き換える
 * - 削除と再投入は store 側で 1 操作 (途中の空状態は外から見えない)
 */
use axum::{extract::State, http::StatusCode};
use chrono::Utc;

use crate::{
    error::GatewayError,
    services::lifecycle::{SeedCounts, stamp_dataset},
    state::AppState,
};

pub async fn reset(State(state): State<AppState>) -> Result<StatusCode, GatewayError> {
    let rows = stamp_dataset(&state.default_data, Utc::now());
    let counts = SeedCounts::from(&rows);

    state.store.replace_all(rows).await?;
    tracing::info!(?counts, "store reset to default data");

    Ok(StatusCode::NO_CONTENT)
}
