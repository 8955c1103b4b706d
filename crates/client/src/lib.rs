//! Thrift Client - Resilient API client for the thrift storefront backend.
//!
//! Issues requests against an ordered list of backend hosts with retries,
//! and degrades to local cached or built-in data when the backend cannot be
//! reached.
//!
//! # Architecture
//!
//! - [`ApiClient::request`] is the transport primitive. It never falls back.
//! - The helpers in [`services`] wrap it per resource and decide whether a
//!   failure propagates or resolves from local data.
//! - All local state goes through an injected [`KeyValueStore`]
//!   ([`MemoryStore`] or [`FileStore`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use thrift_client::{ApiClient, ClientConfig, MemoryStore};
//! use thrift_core::ProductFilters;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ClientConfig::from_env()?, Arc::new(MemoryStore::new()))?;
//! let products = client.products(&ProductFilters::default()).await?;
//! println!("{} products", products.len());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod services;
pub mod session;
pub mod storage;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Result};
pub use request::{Ack, ApiResponse, RequestOptions};
pub use services::{
    AppStatus, AuthResponse, FlushReport, SettingsAck, TicketReceipt, default_faqs,
    default_stores, mock_products,
};
pub use session::{Session, SessionStore};
pub use storage::{FileStore, KeyValueStore, KeyValueStoreExt, MemoryStore, StorageError};
