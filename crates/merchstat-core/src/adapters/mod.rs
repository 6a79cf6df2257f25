//! Order-source adapters.

mod shopify;

pub use shopify::ShopifyOrderSource;
