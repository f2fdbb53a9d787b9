pub mod cart_items;
pub mod delivery_options;
pub mod health;
pub mod orders;
pub mod payment_summary;
pub mod products;
pub mod reset;
