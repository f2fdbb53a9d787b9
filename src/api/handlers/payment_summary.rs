use axum::{Json, extract::State};

use crate::{
    error::GatewayError,
    services::checkout::{self, PaymentSummary},
    state::AppState,
};

pub async fn payment_summary(
    State(state): State<AppState>,
) -> Result<Json<PaymentSummary>, GatewayError> {
    let cart: Vec<_> = state
        .store
        .list_cart_items()
        .await?
        .into_iter()
        .map(|c| c.record)
        .collect();
    let products: Vec<_> = state
        .store
        .list_products()
        .await?
        .into_iter()
        .map(|p| p.record)
        .collect();
    let options: Vec<_> = state
        .store
        .list_delivery_options()
        .await?
        .into_iter()
        .map(|o| o.record)
        .collect();

    Ok(Json(checkout::summarize(&cart, &products, &options)?))
}
