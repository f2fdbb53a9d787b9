/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - store: Arc<dyn Store>, default_data: 初期データ (reset で再投入)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::Store;
use crate::seed::DefaultData;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub default_data: Arc<DefaultData>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, default_data: Arc<DefaultData>) -> Self {
        Self {
            store,
            default_data,
        }
    }
}
