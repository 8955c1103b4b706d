//! Thrift Core - Shared domain types for the thrift storefront client.
//!
//! This crate provides the value records exchanged with the storefront
//! backend and mirrored into local storage by `thrift-client`.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows UI code to depend on
//! it without pulling in the network stack.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, emails, users, products, settings and reference data

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
