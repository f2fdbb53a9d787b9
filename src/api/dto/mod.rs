pub mod cart_items;
pub mod delivery_options;
pub mod orders;
pub mod products;

use serde::Deserialize;

/// `?expand=<what>` shared by several listings.
#[derive(Debug, Default, Deserialize)]
pub struct ExpandQuery {
    pub expand: Option<String>,
}

impl ExpandQuery {
    pub fn wants(&self, what: &str) -> bool {
        self.expand.as_deref() == Some(what)
    }
}
