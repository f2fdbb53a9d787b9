use axum::{Json, extract::State};
use chrono::Utc;

use crate::{
    api::{
        dto::{ExpandQuery, delivery_options::DeliveryOptionResponse},
        extractors::ApiQuery,
    },
    error::GatewayError,
    state::AppState,
};

pub async fn list_delivery_options(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ExpandQuery>,
) -> Result<Json<Vec<DeliveryOptionResponse>>, GatewayError> {
    let options = state.store.list_delivery_options().await?;
    let now = Utc::now();
    let expand = query.wants("estimatedDeliveryTime");

    let res = options
        .into_iter()
        .map(|option| {
            let estimated_delivery_time_ms = expand.then(|| {
                option
                    .record
                    .estimated_delivery_time(now)
                    .timestamp_millis()
            });
            DeliveryOptionResponse {
                option,
                estimated_delivery_time_ms,
            }
        })
        .collect();

    Ok(Json(res))
}
