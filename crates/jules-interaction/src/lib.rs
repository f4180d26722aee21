//! HTTP implementation of the Jules resource client.

pub mod client;
pub mod http_client;

pub use client::JulesClient;
pub use http_client::JulesHttpClient;
