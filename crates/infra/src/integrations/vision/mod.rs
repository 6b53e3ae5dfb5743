//! Google Cloud Vision text detection

pub mod client;
pub mod types;

pub use client::GoogleVisionClient;
