use serde::Serialize;

use crate::repos::models::{DeliveryOption, Stamped};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOptionResponse {
    #[serde(flatten)]
    pub option: Stamped<DeliveryOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_time_ms: Option<i64>,
}
