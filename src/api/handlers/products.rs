use axum::{Json, extract::State};

use crate::{
    api::{dto::products::ProductsQuery, extractors::ApiQuery},
    error::GatewayError,
    repos::models::{Product, Stamped},
    state::AppState,
};

pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductsQuery>,
) -> Result<Json<Vec<Stamped<Product>>>, GatewayError> {
    let mut products = state.store.list_products().await?;

    if let Some(search) = query.search.as_deref().map(str::trim)
        && !search.is_empty()
    {
        products.retain(|p| p.record.matches(search));
    }

    Ok(Json(products))
}
